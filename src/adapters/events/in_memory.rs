//! In-memory event bus.
//!
//! Synchronous, deterministic delivery: `publish` returns only after
//! every subscribed handler has run. This is the production bus for a
//! single-process deployment and doubles as the test bus.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::events::{EventKind, EventRecord};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{EventHandler, EventPublisher, EventSubscriber};

/// In-memory event bus keyed by event kind.
///
/// # Panics
///
/// Methods panic if the internal locks are poisoned; a poisoned lock
/// means a handler panicked while registered, which is unrecoverable.
pub struct InMemoryEventBus {
    handlers: RwLock<HashMap<EventKind, Vec<Arc<dyn EventHandler>>>>,
    published: RwLock<Vec<EventRecord>>,
    record_history: bool,
}

impl InMemoryEventBus {
    /// Production bus: delivers to handlers and keeps no history.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            published: RwLock::new(Vec::new()),
            record_history: false,
        }
    }

    /// Bus that additionally retains every published record, for test
    /// assertions. Never use in a long-running process; the history is
    /// unbounded.
    pub fn recording() -> Self {
        Self {
            record_history: true,
            ..Self::new()
        }
    }

    // === Test Helpers (recording bus only) ===

    /// Returns all retained records; empty unless built with
    /// [`InMemoryEventBus::recording`].
    pub fn published_events(&self) -> Vec<EventRecord> {
        self.published
            .read()
            .expect("InMemoryEventBus: published lock poisoned")
            .clone()
    }

    /// Returns records of a specific kind.
    pub fn events_of_kind(&self, kind: EventKind) -> Vec<EventRecord> {
        self.published_events()
            .into_iter()
            .filter(|e| e.kind() == kind)
            .collect()
    }

    /// Clears all published records (for test isolation).
    pub fn clear(&self) {
        self.published
            .write()
            .expect("InMemoryEventBus: published write lock poisoned")
            .clear();
    }

    /// Returns count of published records.
    pub fn event_count(&self) -> usize {
        self.published
            .read()
            .expect("InMemoryEventBus: published lock poisoned")
            .len()
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventRecord) -> Result<(), DomainError> {
        if self.record_history {
            self.published
                .write()
                .expect("InMemoryEventBus: published write lock poisoned")
                .push(event.clone());
        }

        // Clone handlers to release the lock before await points
        let kind_handlers: Vec<Arc<dyn EventHandler>> = {
            let handlers = self
                .handlers
                .read()
                .expect("InMemoryEventBus: handlers lock poisoned");
            handlers.get(&event.kind()).cloned().unwrap_or_default()
        };

        let mut errors = Vec::new();
        for handler in kind_handlers {
            if let Err(e) = handler.handle(event.clone()).await {
                errors.push(format!("{}: {}", handler.name(), e));
            }
        }

        if !errors.is_empty() {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Handler errors: {}", errors.join(", ")),
            ));
        }

        Ok(())
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, kind: EventKind, handler: Arc<dyn EventHandler>) {
        let mut handlers = self
            .handlers
            .write()
            .expect("InMemoryEventBus: handlers write lock poisoned");
        handlers.entry(kind).or_default().push(handler);
    }

    fn subscribe_all(&self, kinds: &[EventKind], handler: Arc<dyn EventHandler>) {
        let mut handlers = self
            .handlers
            .write()
            .expect("InMemoryEventBus: handlers write lock poisoned");
        for kind in kinds {
            handlers.entry(*kind).or_default().push(Arc::clone(&handler));
        }
    }
}

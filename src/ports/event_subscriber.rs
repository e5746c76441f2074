//! EventSubscriber port - Interface for subscribing to domain events.
//!
//! Handlers register interest in event kinds and are invoked when
//! matching records are published.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::events::{EventKind, EventRecord};
use crate::domain::foundation::DomainError;

/// Handler for processing domain events.
///
/// Implementations should be:
/// - **Idempotent** - Safe to call multiple times with the same event
/// - **Quick** - Long operations should be queued for async processing
/// - **Isolated** - Errors don't affect other handlers
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process an event record.
    async fn handle(&self, event: EventRecord) -> Result<(), DomainError>;

    /// Handler name for logging and idempotency tracking.
    fn name(&self) -> &'static str;
}

/// Port for subscribing to domain events.
pub trait EventSubscriber: Send + Sync {
    /// Subscribe a handler to a specific event kind.
    fn subscribe(&self, kind: EventKind, handler: Arc<dyn EventHandler>);

    /// Subscribe the same handler instance to several kinds.
    fn subscribe_all(&self, kinds: &[EventKind], handler: Arc<dyn EventHandler>);
}

/// Combined trait for event bus implementations.
pub trait EventBus: super::EventPublisher + EventSubscriber {}

// Blanket implementation - any type that implements both traits is an EventBus
impl<T: super::EventPublisher + EventSubscriber> EventBus for T {}

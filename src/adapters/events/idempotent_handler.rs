//! IdempotentHandler - Wrapper for at-most-once event processing.
//!
//! Wraps any `EventHandler` and consults a `ProcessedEventStore` so
//! redelivered events are skipped. If the inner handler fails, the
//! event is NOT marked processed and the next delivery retries it.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::events::EventRecord;
use crate::domain::foundation::DomainError;
use crate::ports::{EventHandler, ProcessedEventStore};

/// Decorates an `EventHandler` with idempotency tracking, keyed by the
/// event id and the handler's `name()`.
pub struct IdempotentHandler<H: EventHandler> {
    inner: H,
    processed_events: Arc<dyn ProcessedEventStore>,
}

impl<H: EventHandler> IdempotentHandler<H> {
    pub fn new(inner: H, processed_events: Arc<dyn ProcessedEventStore>) -> Self {
        Self {
            inner,
            processed_events,
        }
    }
}

#[async_trait]
impl<H: EventHandler + 'static> EventHandler for IdempotentHandler<H> {
    async fn handle(&self, event: EventRecord) -> Result<(), DomainError> {
        let handler_name = self.inner.name();

        if self
            .processed_events
            .contains(&event.id, handler_name)
            .await?
        {
            tracing::debug!(
                event_id = %event.id,
                handler = handler_name,
                "skipping duplicate event"
            );
            return Ok(());
        }

        self.inner.handle(event.clone()).await?;

        // Mark only after successful handling
        self.processed_events
            .mark_processed(&event.id, handler_name)
            .await?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

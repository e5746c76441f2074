//! EventPublisher port - Interface for publishing domain events.
//!
//! This port defines how write paths publish events without knowing
//! about the underlying transport (in-memory bus, broker, etc.).

use async_trait::async_trait;

use crate::domain::events::EventRecord;
use crate::domain::foundation::DomainError;

/// Port for publishing domain events.
///
/// Implementations must ensure:
/// - Events are delivered at-least-once (handlers may receive duplicates)
/// - Errors are propagated to the caller; the caller decides whether a
///   failed publish is fatal
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event record to all interested handlers.
    async fn publish(&self, event: EventRecord) -> Result<(), DomainError>;
}

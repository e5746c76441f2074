//! EventProducer - The single emission point for broadcast events.
//!
//! Services call [`EventProducer::emit`] exactly once per durable
//! write, after the store has accepted it. A failed publish is logged
//! and swallowed: clients recover through resync on reconnect, and a
//! broadcast hiccup must never turn a committed write into an HTTP
//! error.

use std::sync::Arc;

use crate::domain::events::{Envelope, EventRecord, Verb};
use crate::ports::EventPublisher;

#[derive(Clone)]
pub struct EventProducer {
    publisher: Arc<dyn EventPublisher>,
}

impl EventProducer {
    pub fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        Self { publisher }
    }

    /// Wraps the envelope in a fresh record and publishes it.
    ///
    /// Infallible by contract; the error path ends here.
    pub async fn emit(&self, verb: Verb, envelope: Envelope) {
        let record = EventRecord::new(verb, envelope);
        let kind = record.kind();
        if let Err(err) = self.publisher.publish(record).await {
            tracing::warn!(
                kind = %kind,
                error = %err,
                "event publish failed; clients will catch up on resync"
            );
        }
    }
}

//! Event bus adapters.

mod idempotent_handler;
mod in_memory;
mod processed;

pub use idempotent_handler::IdempotentHandler;
pub use in_memory::InMemoryEventBus;
pub use processed::InMemoryProcessedEventStore;

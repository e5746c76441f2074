//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application core and the outside world. Adapters implement them.
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events
//! - `EventSubscriber` - Port for subscribing to domain events
//! - `EventHandler` - Handler that processes incoming events
//! - `ProcessedEventStore` - Idempotency tracking for event handlers
//!
//! ## Storage Ports
//!
//! - One repository trait per resource family, plus the shop singleton
//!
//! ## Delivery Ports
//!
//! - `Mailer` - Outbound transactional email

mod event_publisher;
mod event_subscriber;
mod mailer;
mod processed_event_store;
mod repositories;

pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use mailer::{EmailMessage, Mailer};
pub use processed_event_store::ProcessedEventStore;
pub use repositories::{
    AppointmentRepository, InventoryRepository, SaleRepository, ServiceRepository, ShopRepository,
    UserRepository,
};

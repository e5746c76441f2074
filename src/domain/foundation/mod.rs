//! Foundation value objects shared across the domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AppointmentId, InventoryItemId, SaleId, ServiceId, UserId};
pub use timestamp::Timestamp;

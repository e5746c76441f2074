//! Domain model: the six broadcastable resources, the event envelope,
//! and the foundation value objects they share.

pub mod appointment;
pub mod events;
pub mod foundation;
pub mod inventory;
pub mod sale;
pub mod service;
pub mod shop;
pub mod user;

pub use appointment::{Appointment, AppointmentDraft, AppointmentStatus, ServiceSnapshot};
pub use events::{Envelope, EventId, EventKind, EventRecord, ResourceKind, UnknownKind, Verb};
pub use foundation::{
    AppointmentId, DomainError, ErrorCode, InventoryItemId, SaleId, ServiceId, Timestamp, UserId,
    ValidationError,
};
pub use inventory::{InventoryDraft, InventoryItem, StockStatus};
pub use sale::Sale;
pub use service::{ServiceDraft, ServiceOffering};
pub use shop::{ShopState, ShopStatus};
pub use user::{Role, User, UserDraft, UserStatus};

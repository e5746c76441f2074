//! Application layer - One service per resource family plus the
//! producer that turns durable writes into broadcast events.
//!
//! Every write path follows the same shape: validate, persist, then
//! emit exactly one envelope per changed record through
//! [`EventProducer`]. Failed writes emit nothing.

mod appointments;
mod catalog;
mod inventory;
mod producer;
mod sales;
mod shop;
mod users;

pub use appointments::AppointmentService;
pub use catalog::CatalogService;
pub use inventory::InventoryService;
pub use producer::EventProducer;
pub use sales::{SaleOutcome, SalesService};
pub use shop::ShopService;
pub use users::UserService;

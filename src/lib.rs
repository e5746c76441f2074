//! Barberflow - Barbershop booking and shop management backend.
//!
//! Standard CRUD endpoints for appointments, barbers, services, inventory,
//! and sales, plus a real-time layer that mirrors every committed write to
//! connected WebSocket clients.

pub mod adapters;
pub mod application;
pub mod client;
pub mod config;
pub mod domain;
pub mod ports;

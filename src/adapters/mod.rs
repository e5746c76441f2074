//! Adapters - Implementations of the ports against real technology.

pub mod email;
pub mod events;
pub mod http;
pub mod realtime;
pub mod store;

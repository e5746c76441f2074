//! Client-side view maintenance for the broadcast stream.
//!
//! Consumers hold one [`Reconciler`] per resource list, feed every
//! incoming envelope through the matching delta extractor, and call
//! [`Reconciler::resync`] with a fresh REST snapshot after every
//! (re)connect.

mod deltas;
mod reconciler;

pub use deltas::{appointment_delta, inventory_delta, sale_delta, service_delta, user_delta};
pub use reconciler::{Delta, Keyed, Reconciler, DEFAULT_TOMBSTONE_WINDOW};

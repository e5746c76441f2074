//! Email adapters.

mod notifier;
mod resend;

pub use notifier::BookingNotifier;
pub use resend::{NoopMailer, ResendMailer};

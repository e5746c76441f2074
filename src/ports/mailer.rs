//! Mailer port - Interface for outbound transactional email.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

/// An outbound email, ready to hand to a delivery provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: Vec<String>,
    pub subject: String,
    pub html_body: String,
}

/// Port for sending email.
///
/// Delivery is best-effort; callers on the event path log failures and
/// move on rather than retrying inline.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn Mailer) {}
}

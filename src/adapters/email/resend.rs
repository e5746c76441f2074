//! ResendMailer - Outbound email through the Resend HTTP API.

use async_trait::async_trait;

use crate::config::EmailConfig;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{EmailMessage, Mailer};

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// Mailer backed by Resend's transactional email API.
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    from: String,
}

impl ResendMailer {
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.resend_api_key.clone(),
            from: config.from_header(),
        }
    }
}

#[derive(serde::Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), DomainError> {
        let request = SendRequest {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            html: &message.html_body,
        };

        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::InternalError, format!("Resend request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Resend returned {status}: {body}"),
            ));
        }

        Ok(())
    }
}

/// Mailer that drops messages, used when no API key is configured.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), DomainError> {
        tracing::debug!(
            to = ?message.to,
            subject = %message.subject,
            "email disabled; dropping message"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_request_serializes_resend_shape() {
        let to = vec!["barber@example.com".to_string()];
        let request = SendRequest {
            from: "Barberflow <noreply@barberflow.app>",
            to: &to,
            subject: "New Appointment",
            html: "<p>hi</p>",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["from"], "Barberflow <noreply@barberflow.app>");
        assert_eq!(json["to"][0], "barber@example.com");
        assert_eq!(json["html"], "<p>hi</p>");
    }

    #[tokio::test]
    async fn noop_mailer_accepts_anything() {
        let mailer = NoopMailer;
        mailer
            .send(EmailMessage {
                to: vec!["x@example.com".to_string()],
                subject: "s".to_string(),
                html_body: "b".to_string(),
            })
            .await
            .unwrap();
    }
}

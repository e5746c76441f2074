//! BookingNotifier - Emails the team when a new appointment lands.
//!
//! Subscribed to `appointment:update` on the internal bus; acts only on
//! records with the Created verb, so reschedules and status edits stay
//! silent. Wrap in `IdempotentHandler` so a redelivered record cannot
//! email twice.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::appointment::Appointment;
use crate::domain::events::{Envelope, EventRecord, Verb};
use crate::domain::foundation::DomainError;
use crate::domain::user::Role;
use crate::ports::{EmailMessage, EventHandler, Mailer, UserRepository};

pub struct BookingNotifier {
    users: Arc<dyn UserRepository>,
    mailer: Arc<dyn Mailer>,
}

impl BookingNotifier {
    pub fn new(users: Arc<dyn UserRepository>, mailer: Arc<dyn Mailer>) -> Self {
        Self { users, mailer }
    }

    fn message_for(appointment: &Appointment, to: Vec<String>) -> EmailMessage {
        EmailMessage {
            to,
            subject: format!("New appointment: {}", appointment.name),
            html_body: format!(
                "<h2>New appointment booked</h2>\
                 <p><strong>Customer:</strong> {name} ({phone})</p>\
                 <p><strong>Service:</strong> {service} @ {price}</p>\
                 <p><strong>Barber:</strong> {barber}</p>\
                 <p><strong>Schedule:</strong> {schedule}</p>",
                name = appointment.name,
                phone = appointment.phone,
                service = appointment.service.service_type,
                price = appointment.service.price,
                barber = appointment.barber,
                schedule = appointment.schedule,
            ),
        }
    }
}

#[async_trait]
impl EventHandler for BookingNotifier {
    async fn handle(&self, event: EventRecord) -> Result<(), DomainError> {
        if event.verb != Verb::Created {
            return Ok(());
        }
        let appointment = match &event.envelope {
            Envelope::AppointmentUpdate(appointment) => appointment,
            _ => return Ok(()),
        };

        let recipients: Vec<String> = self
            .users
            .list(Some(Role::Barber))
            .await?
            .into_iter()
            .filter(|u| u.is_active_barber())
            .map(|u| u.email)
            .collect();

        if recipients.is_empty() {
            tracing::debug!("no active barbers to notify");
            return Ok(());
        }

        tracing::info!(
            appointment = %appointment.id,
            recipients = recipients.len(),
            "sending booking notification"
        );
        self.mailer
            .send(Self::message_for(appointment, recipients))
            .await
    }

    fn name(&self) -> &'static str {
        "BookingNotifier"
    }
}

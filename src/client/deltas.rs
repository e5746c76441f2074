//! Mapping from wire envelopes to typed collection deltas.
//!
//! Each resource family gets an extractor that pulls its deltas out of
//! the mixed stream; envelopes for other resources come back `None` so
//! a view can feed every frame through its extractor unconditionally.

use crate::domain::appointment::Appointment;
use crate::domain::events::Envelope;
use crate::domain::inventory::InventoryItem;
use crate::domain::sale::Sale;
use crate::domain::service::ServiceOffering;
use crate::domain::user::User;

use super::reconciler::{Delta, Keyed};

impl Keyed for Appointment {
    fn key(&self) -> String {
        self.id.to_string()
    }

    fn owner(&self) -> Option<&str> {
        self.my_id.as_deref()
    }
}

impl Keyed for User {
    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Keyed for ServiceOffering {
    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Keyed for InventoryItem {
    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Keyed for Sale {
    fn key(&self) -> String {
        self.id.to_string()
    }
}

pub fn appointment_delta(envelope: &Envelope) -> Option<Delta<Appointment>> {
    match envelope {
        Envelope::AppointmentUpdate(appointment) => Some(Delta::Upsert(appointment.clone())),
        Envelope::AppointmentDeleted(deleted) => Some(Delta::Remove(deleted.id.to_string())),
        _ => None,
    }
}

pub fn user_delta(envelope: &Envelope) -> Option<Delta<User>> {
    match envelope {
        Envelope::UserUpdate(user) => Some(Delta::Upsert(user.clone())),
        Envelope::UserDeleted(deleted) => Some(Delta::Remove(deleted.id.to_string())),
        _ => None,
    }
}

pub fn service_delta(envelope: &Envelope) -> Option<Delta<ServiceOffering>> {
    match envelope {
        Envelope::ServiceUpdate(service) => Some(Delta::Upsert(service.clone())),
        Envelope::ServiceDeleted(deleted) => Some(Delta::Remove(deleted.id.to_string())),
        _ => None,
    }
}

pub fn inventory_delta(envelope: &Envelope) -> Option<Delta<InventoryItem>> {
    match envelope {
        Envelope::InventoryUpdate(item) => Some(Delta::Upsert(item.clone())),
        Envelope::InventoryDeleted(deleted) => Some(Delta::Remove(deleted.id.to_string())),
        _ => None,
    }
}

pub fn sale_delta(envelope: &Envelope) -> Option<Delta<Sale>> {
    match envelope {
        Envelope::SaleUpdate(sale) => Some(Delta::Upsert(sale.clone())),
        Envelope::SaleDeleted(deleted) => Some(Delta::Remove(deleted.id.to_string())),
        _ => None,
    }
}

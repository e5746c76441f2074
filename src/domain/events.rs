//! Real-time event envelope and the internal bus record.
//!
//! The envelope is a closed sum over the eleven wire kinds: update
//! envelopes carry the full record after the write, deleted envelopes
//! carry `{ id, <resource>: last-known-record }`. Wire form is
//! `{"kind": "...", "payload": {...}}`.
//!
//! Producers publish an [`EventRecord`] on the internal bus; the record
//! adds an event id (for idempotent side-effect handlers) and the write
//! verb, which clients never see — creation and update both reach them
//! as the `:update` kind.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::appointment::Appointment;
use super::foundation::{AppointmentId, InventoryItemId, SaleId, ServiceId, Timestamp, UserId};
use super::inventory::InventoryItem;
use super::sale::Sale;
use super::service::ServiceOffering;
use super::shop::ShopState;
use super::user::User;

/// The six broadcastable resource families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Appointment,
    User,
    Service,
    Inventory,
    Sale,
    Shop,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Appointment => "appointment",
            ResourceKind::User => "user",
            ResourceKind::Service => "service",
            ResourceKind::Inventory => "inventory",
            ResourceKind::Sale => "sale",
            ResourceKind::Shop => "shop",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "appointment" => Ok(ResourceKind::Appointment),
            "user" => Ok(ResourceKind::User),
            "service" => Ok(ResourceKind::Service),
            "inventory" => Ok(ResourceKind::Inventory),
            "sale" => Ok(ResourceKind::Sale),
            "shop" => Ok(ResourceKind::Shop),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// Rejection for event or resource kind names outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown event kind: {0}")]
pub struct UnknownKind(pub String);

/// The closed set of wire-level event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    AppointmentUpdate,
    AppointmentDeleted,
    UserUpdate,
    UserDeleted,
    ServiceUpdate,
    ServiceDeleted,
    InventoryUpdate,
    InventoryDeleted,
    SaleUpdate,
    SaleDeleted,
    ShopUpdate,
}

/// All kinds, in a stable order. Useful for subscribing a handler to
/// the full stream.
pub const ALL_EVENT_KINDS: &[EventKind] = &[
    EventKind::AppointmentUpdate,
    EventKind::AppointmentDeleted,
    EventKind::UserUpdate,
    EventKind::UserDeleted,
    EventKind::ServiceUpdate,
    EventKind::ServiceDeleted,
    EventKind::InventoryUpdate,
    EventKind::InventoryDeleted,
    EventKind::SaleUpdate,
    EventKind::SaleDeleted,
    EventKind::ShopUpdate,
];

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::AppointmentUpdate => "appointment:update",
            EventKind::AppointmentDeleted => "appointment:deleted",
            EventKind::UserUpdate => "user:update",
            EventKind::UserDeleted => "user:deleted",
            EventKind::ServiceUpdate => "service:update",
            EventKind::ServiceDeleted => "service:deleted",
            EventKind::InventoryUpdate => "inventory:update",
            EventKind::InventoryDeleted => "inventory:deleted",
            EventKind::SaleUpdate => "sale:update",
            EventKind::SaleDeleted => "sale:deleted",
            EventKind::ShopUpdate => "shop:update",
        }
    }

    /// The resource family this kind belongs to.
    pub fn resource(&self) -> ResourceKind {
        match self {
            EventKind::AppointmentUpdate | EventKind::AppointmentDeleted => {
                ResourceKind::Appointment
            }
            EventKind::UserUpdate | EventKind::UserDeleted => ResourceKind::User,
            EventKind::ServiceUpdate | EventKind::ServiceDeleted => ResourceKind::Service,
            EventKind::InventoryUpdate | EventKind::InventoryDeleted => ResourceKind::Inventory,
            EventKind::SaleUpdate | EventKind::SaleDeleted => ResourceKind::Sale,
            EventKind::ShopUpdate => ResourceKind::Shop,
        }
    }

}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_EVENT_KINDS
            .iter()
            .find(|k| k.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Deleted payloads
// ════════════════════════════════════════════════════════════════════════════

/// Payload of `appointment:deleted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentDeleted {
    pub id: AppointmentId,
    pub appointment: Appointment,
}

/// Payload of `user:deleted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDeleted {
    pub id: UserId,
    pub user: User,
}

/// Payload of `service:deleted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDeleted {
    pub id: ServiceId,
    pub service: ServiceOffering,
}

/// Payload of `inventory:deleted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryDeleted {
    pub id: InventoryItemId,
    pub item: InventoryItem,
}

/// Payload of `sale:deleted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleDeleted {
    pub id: SaleId,
    pub sale: Sale,
}

// ════════════════════════════════════════════════════════════════════════════
// Envelope
// ════════════════════════════════════════════════════════════════════════════

/// The (kind, payload) unit broadcast from server to clients.
///
/// Constructing a variant is the only way to produce a kind, so an
/// envelope with an unrecognized kind cannot exist; deserialization of
/// unknown kinds fails outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload")]
pub enum Envelope {
    #[serde(rename = "appointment:update")]
    AppointmentUpdate(Appointment),
    #[serde(rename = "appointment:deleted")]
    AppointmentDeleted(AppointmentDeleted),
    #[serde(rename = "user:update")]
    UserUpdate(User),
    #[serde(rename = "user:deleted")]
    UserDeleted(UserDeleted),
    #[serde(rename = "service:update")]
    ServiceUpdate(ServiceOffering),
    #[serde(rename = "service:deleted")]
    ServiceDeleted(ServiceDeleted),
    #[serde(rename = "inventory:update")]
    InventoryUpdate(InventoryItem),
    #[serde(rename = "inventory:deleted")]
    InventoryDeleted(InventoryDeleted),
    #[serde(rename = "sale:update")]
    SaleUpdate(Sale),
    #[serde(rename = "sale:deleted")]
    SaleDeleted(SaleDeleted),
    #[serde(rename = "shop:update")]
    ShopUpdate(ShopState),
}

impl Envelope {
    /// Builds the deleted envelope for an appointment's last-known record.
    pub fn appointment_deleted(appointment: Appointment) -> Self {
        Envelope::AppointmentDeleted(AppointmentDeleted {
            id: appointment.id,
            appointment,
        })
    }

    /// Builds the deleted envelope for a user's last-known record.
    pub fn user_deleted(user: User) -> Self {
        Envelope::UserDeleted(UserDeleted { id: user.id, user })
    }

    /// Builds the deleted envelope for a catalog entry's last-known record.
    pub fn service_deleted(service: ServiceOffering) -> Self {
        Envelope::ServiceDeleted(ServiceDeleted {
            id: service.id,
            service,
        })
    }

    /// Builds the deleted envelope for an item's last-known record.
    pub fn inventory_deleted(item: InventoryItem) -> Self {
        Envelope::InventoryDeleted(InventoryDeleted { id: item.id, item })
    }

    /// Builds the deleted envelope for a sale's last-known record.
    pub fn sale_deleted(sale: Sale) -> Self {
        Envelope::SaleDeleted(SaleDeleted { id: sale.id, sale })
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Envelope::AppointmentUpdate(_) => EventKind::AppointmentUpdate,
            Envelope::AppointmentDeleted(_) => EventKind::AppointmentDeleted,
            Envelope::UserUpdate(_) => EventKind::UserUpdate,
            Envelope::UserDeleted(_) => EventKind::UserDeleted,
            Envelope::ServiceUpdate(_) => EventKind::ServiceUpdate,
            Envelope::ServiceDeleted(_) => EventKind::ServiceDeleted,
            Envelope::InventoryUpdate(_) => EventKind::InventoryUpdate,
            Envelope::InventoryDeleted(_) => EventKind::InventoryDeleted,
            Envelope::SaleUpdate(_) => EventKind::SaleUpdate,
            Envelope::SaleDeleted(_) => EventKind::SaleDeleted,
            Envelope::ShopUpdate(_) => EventKind::ShopUpdate,
        }
    }

    pub fn resource(&self) -> ResourceKind {
        self.kind().resource()
    }

    /// Owner-correlation id, present only on appointment envelopes whose
    /// record carries one. Used for "my appointments" scoping.
    pub fn owner(&self) -> Option<&str> {
        match self {
            Envelope::AppointmentUpdate(a) => a.my_id.as_deref(),
            Envelope::AppointmentDeleted(d) => d.appointment.my_id.as_deref(),
            _ => None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Bus record
// ════════════════════════════════════════════════════════════════════════════

/// Unique identifier for a published event (deduplication key for
/// idempotent side-effect handlers).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Creates a new random EventId using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates an EventId from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The write that produced an event. Internal to the bus; the wire
/// collapses Created and Updated into the `:update` kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Created,
    Updated,
    Deleted,
}

/// What producers publish on the internal event bus: the envelope plus
/// the identity and verb that side-effect subscribers need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    pub verb: Verb,
    pub occurred_at: Timestamp,
    pub envelope: Envelope,
}

impl EventRecord {
    /// Wraps an envelope for publication.
    pub fn new(verb: Verb, envelope: Envelope) -> Self {
        Self {
            id: EventId::new(),
            verb,
            occurred_at: Timestamp::now(),
            envelope,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.envelope.kind()
    }
}

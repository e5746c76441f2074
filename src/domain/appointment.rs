//! Appointment record and its classification enums.
//!
//! An appointment stores the assigned barber by display name, a
//! denormalization carried over from the booking form; clients must
//! tolerate barbers renamed after booking.

use serde::{Deserialize, Serialize};

use super::foundation::{AppointmentId, Timestamp, ValidationError};

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Pending,
    Completed,
    Cancelled,
}

/// Classification of the booking customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CustomerType {
    #[serde(rename = "regular")]
    Regular,
    #[serde(rename = "VIP")]
    Vip,
    #[default]
    #[serde(rename = "new")]
    New,
}

/// Rough age bracket collected on the booking form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    Student,
    #[default]
    Adult,
    Child,
    Young,
    Other,
}

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Online,
}

/// Payment state, tracked independently of the appointment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Cancelled,
}

/// Snapshot of the booked service at booking time.
///
/// Price changes to the catalog after booking do not affect existing
/// appointments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSnapshot {
    #[serde(rename = "type")]
    pub service_type: String,
    pub price: f64,
}

impl ServiceSnapshot {
    pub fn new(service_type: impl Into<String>, price: f64) -> Result<Self, ValidationError> {
        let service_type = service_type.into();
        if service_type.trim().is_empty() {
            return Err(ValidationError::empty_field("service.type"));
        }
        if price < 0.0 {
            return Err(ValidationError::negative("service.price", price));
        }
        Ok(Self {
            service_type,
            price,
        })
    }
}

/// A booked appointment as carried in `appointment:update` payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Assigned barber, by display name.
    pub barber: String,
    pub service: ServiceSnapshot,
    /// Requested slot, kept as the string the booking form submitted.
    pub schedule: String,
    #[serde(default)]
    pub customer_type: CustomerType,
    #[serde(default)]
    pub age_group: AgeGroup,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub status: AppointmentStatus,
    /// Owner-correlation id; "my appointments" views filter the global
    /// broadcast stream with it.
    #[serde(rename = "myId", skip_serializing_if = "Option::is_none")]
    pub my_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields accepted when creating or updating an appointment.
#[derive(Debug, Clone)]
pub struct AppointmentDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub barber: String,
    pub service: ServiceSnapshot,
    pub schedule: String,
    pub customer_type: CustomerType,
    pub age_group: AgeGroup,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub status: AppointmentStatus,
    pub my_id: Option<String>,
}

impl AppointmentDraft {
    /// Checks the required booking-form fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("barber", &self.barber),
            ("schedule", &self.schedule),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::empty_field(field));
            }
        }
        if self.service.service_type.trim().is_empty() {
            return Err(ValidationError::empty_field("service.type"));
        }
        if self.service.price < 0.0 {
            return Err(ValidationError::negative("service.price", self.service.price));
        }
        Ok(())
    }
}

/// Partial update for the dashboard PATCH path. Absent fields keep
/// their current value.
#[derive(Debug, Clone, Default)]
pub struct AppointmentPatch {
    pub status: Option<AppointmentStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub barber: Option<String>,
    pub schedule: Option<String>,
}

impl AppointmentPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(barber) = &self.barber {
            if barber.trim().is_empty() {
                return Err(ValidationError::empty_field("barber"));
            }
        }
        if let Some(schedule) = &self.schedule {
            if schedule.trim().is_empty() {
                return Err(ValidationError::empty_field("schedule"));
            }
        }
        Ok(())
    }
}

impl Appointment {
    /// Builds a new appointment from a validated draft.
    pub fn create(draft: AppointmentDraft) -> Result<Self, ValidationError> {
        draft.validate()?;
        let now = Timestamp::now();
        Ok(Self {
            id: AppointmentId::new(),
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            barber: draft.barber,
            service: draft.service,
            schedule: draft.schedule,
            customer_type: draft.customer_type,
            age_group: draft.age_group,
            payment_method: draft.payment_method,
            payment_status: draft.payment_status,
            status: draft.status,
            my_id: draft.my_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the mutable fields from a validated draft, preserving
    /// identity and creation time.
    pub fn apply(&mut self, draft: AppointmentDraft) -> Result<(), ValidationError> {
        draft.validate()?;
        self.name = draft.name;
        self.email = draft.email;
        self.phone = draft.phone;
        self.barber = draft.barber;
        self.service = draft.service;
        self.schedule = draft.schedule;
        self.customer_type = draft.customer_type;
        self.age_group = draft.age_group;
        self.payment_method = draft.payment_method;
        self.payment_status = draft.payment_status;
        self.status = draft.status;
        self.my_id = draft.my_id;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Applies the present fields of a patch, preserving everything else.
    pub fn patch(&mut self, patch: AppointmentPatch) -> Result<(), ValidationError> {
        patch.validate()?;
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(payment_status) = patch.payment_status {
            self.payment_status = payment_status;
        }
        if let Some(barber) = patch.barber {
            self.barber = barber;
        }
        if let Some(schedule) = patch.schedule {
            self.schedule = schedule;
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

//! Service catalog entry.

use serde::{Deserialize, Serialize};

use super::foundation::{ServiceId, Timestamp, ValidationError};

/// A bookable service as carried in `service:update` payloads.
///
/// `status` is a free-form string in the catalog ("available" by
/// default); only appointments have a closed lifecycle enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOffering {
    pub id: ServiceId,
    #[serde(rename = "type")]
    pub service_type: String,
    pub price: f64,
    #[serde(default = "default_status")]
    pub status: String,
    pub created_at: Timestamp,
}

fn default_status() -> String {
    "available".to_string()
}

/// Fields accepted when creating or updating a catalog entry.
#[derive(Debug, Clone)]
pub struct ServiceDraft {
    pub service_type: String,
    pub price: f64,
    pub status: Option<String>,
}

impl ServiceDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.service_type.trim().is_empty() {
            return Err(ValidationError::empty_field("type"));
        }
        if self.price < 0.0 {
            return Err(ValidationError::negative("price", self.price));
        }
        Ok(())
    }
}

impl ServiceOffering {
    /// Builds a new catalog entry from a validated draft.
    pub fn create(draft: ServiceDraft) -> Result<Self, ValidationError> {
        draft.validate()?;
        Ok(Self {
            id: ServiceId::new(),
            service_type: draft.service_type,
            price: draft.price,
            status: draft.status.unwrap_or_else(default_status),
            created_at: Timestamp::now(),
        })
    }

    /// Replaces the mutable fields from a validated draft.
    pub fn apply(&mut self, draft: ServiceDraft) -> Result<(), ValidationError> {
        draft.validate()?;
        self.service_type = draft.service_type;
        self.price = draft.price;
        if let Some(status) = draft.status {
            self.status = status;
        }
        Ok(())
    }
}

//! User record covering admins, barbers, and booking clients.
//!
//! Credentials and OAuth linkage live with the external auth service;
//! this record carries only the profile fields the rest of the system
//! broadcasts.

use serde::{Deserialize, Serialize};

use super::foundation::{Timestamp, UserId, ValidationError};

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Barber,
    #[default]
    User,
}

/// Whether the account is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

/// A user as carried in `user:update` payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
    /// Job title shown on the team page (barbers only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Free-text experience blurb (barbers only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: Timestamp,
}

/// Fields accepted when creating or updating a user.
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub status: UserStatus,
    pub position: Option<String>,
    pub experience: Option<String>,
    pub image: Option<String>,
}

impl UserDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        if !self.email.contains('@') {
            return Err(ValidationError::invalid_value("email", "missing @"));
        }
        Ok(())
    }

    /// Emails are matched case-insensitively for uniqueness.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

impl User {
    /// Builds a new user from a validated draft.
    pub fn create(draft: UserDraft) -> Result<Self, ValidationError> {
        draft.validate()?;
        let email = draft.normalized_email();
        Ok(Self {
            id: UserId::new(),
            name: draft.name,
            email,
            phone: draft.phone,
            role: draft.role,
            status: draft.status,
            position: draft.position,
            experience: draft.experience,
            image: draft.image,
            created_at: Timestamp::now(),
        })
    }

    /// Replaces the mutable fields from a validated draft.
    pub fn apply(&mut self, draft: UserDraft) -> Result<(), ValidationError> {
        draft.validate()?;
        self.email = draft.normalized_email();
        self.name = draft.name;
        self.phone = draft.phone;
        self.role = draft.role;
        self.status = draft.status;
        self.position = draft.position;
        self.experience = draft.experience;
        self.image = draft.image;
        Ok(())
    }

    /// Whether this user should receive booking notification emails.
    pub fn is_active_barber(&self) -> bool {
        self.role == Role::Barber && self.status == UserStatus::Active
    }
}

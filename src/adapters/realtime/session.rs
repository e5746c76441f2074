//! Connection session identity and subscription filters.

use std::collections::HashSet;
use std::fmt;

use uuid::Uuid;

use crate::domain::events::{Envelope, EventKind, ResourceKind, UnknownKind};

/// Unique identifier for a connected client session.
///
/// Generated server-side when a client connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionClientId(Uuid);

impl SessionClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a session wants to receive.
///
/// An empty kind set means everything. The owner filter applies only to
/// appointment envelopes: with an owner set, appointment events whose
/// record carries a different (or no) owner-correlation id are dropped
/// for this session. Other resources are shop-global and always pass.
#[derive(Debug, Clone, Default)]
pub struct Subscription {
    kinds: HashSet<EventKind>,
    owner: Option<String>,
}

impl Subscription {
    /// Everything, unscoped.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = EventKind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Parses a comma-separated kind list as sent in the connect query.
    /// Unknown names are rejected outright.
    pub fn parse_kinds(list: &str) -> Result<Vec<EventKind>, UnknownKind> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Whether this session should receive the envelope.
    pub fn matches(&self, envelope: &Envelope) -> bool {
        if !self.kinds.is_empty() && !self.kinds.contains(&envelope.kind()) {
            return false;
        }
        if let Some(owner) = &self.owner {
            if envelope.resource() == ResourceKind::Appointment
                && envelope.owner() != Some(owner.as_str())
            {
                return false;
            }
        }
        true
    }
}

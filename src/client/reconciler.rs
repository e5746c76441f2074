//! Client-side reconciliation of broadcast deltas into a local list.
//!
//! The stream carries no sequence numbers, so the reconciler is built
//! to be safe under duplicates and modest reordering:
//! - upserts replace in place by key, or append for unknown keys
//! - removes drop by key and leave a tombstone, so an upsert that
//!   arrives late for a deleted record is absorbed instead of
//!   resurrecting it
//! - `resync` replaces the list with a fresh server snapshot; callers
//!   must resync after every (re)connect since envelopes during the
//!   gap are gone for good
//!
//! With an owner set, records belonging to someone else are ignored on
//! the way in, mirroring the server-side scoping.

use std::collections::HashMap;
use std::time::Duration;

use crate::domain::foundation::Timestamp;

/// Items a reconciler can manage: keyed by a stable id, optionally
/// owned.
pub trait Keyed {
    fn key(&self) -> String;

    /// Owner-correlation id, for resources that have one.
    fn owner(&self) -> Option<&str> {
        None
    }
}

/// One change to a keyed collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Delta<T> {
    Upsert(T),
    Remove(String),
}

/// How long a removed key keeps absorbing late upserts.
pub const DEFAULT_TOMBSTONE_WINDOW: Duration = Duration::from_secs(60);

pub struct Reconciler<T: Keyed> {
    items: Vec<T>,
    tombstones: HashMap<String, Timestamp>,
    window: Duration,
    owner: Option<String>,
}

impl<T: Keyed + Clone> Reconciler<T> {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_TOMBSTONE_WINDOW)
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            items: Vec::new(),
            tombstones: HashMap::new(),
            window,
            owner: None,
        }
    }

    /// Restricts the view to records owned by `owner`.
    pub fn scoped_to(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Applies one delta. Safe to call twice with the same delta.
    pub fn apply(&mut self, delta: Delta<T>) {
        self.apply_at(delta, Timestamp::now());
    }

    /// Replaces the whole list with a server snapshot.
    ///
    /// Records whose key has a live tombstone are dropped: a delete we
    /// already saw wins over a snapshot that raced it.
    pub fn resync(&mut self, snapshot: Vec<T>) {
        self.resync_at(snapshot, Timestamp::now());
    }

    fn apply_at(&mut self, delta: Delta<T>, now: Timestamp) {
        self.expire_tombstones(now);
        match delta {
            Delta::Upsert(item) => {
                if !self.owned(&item) {
                    return;
                }
                let key = item.key();
                if self.tombstones.contains_key(&key) {
                    return;
                }
                match self.items.iter_mut().find(|existing| existing.key() == key) {
                    Some(existing) => *existing = item,
                    None => self.items.push(item),
                }
            }
            Delta::Remove(key) => {
                self.items.retain(|existing| existing.key() != key);
                self.tombstones.insert(key, now);
            }
        }
    }

    fn resync_at(&mut self, snapshot: Vec<T>, now: Timestamp) {
        self.expire_tombstones(now);
        self.items = snapshot
            .into_iter()
            .filter(|item| self.owned(item) && !self.tombstones.contains_key(&item.key()))
            .collect();
    }

    fn owned(&self, item: &T) -> bool {
        match &self.owner {
            Some(owner) => item.owner() == Some(owner.as_str()),
            None => true,
        }
    }

    fn expire_tombstones(&mut self, now: Timestamp) {
        let cutoff = now.minus_seconds(self.window.as_secs() as i64);
        self.tombstones
            .retain(|_, removed_at| !removed_at.is_before(&cutoff));
    }
}

impl<T: Keyed + Clone> Default for Reconciler<T> {
    fn default() -> Self {
        Self::new()
    }
}

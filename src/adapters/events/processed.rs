//! In-memory ProcessedEventStore.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::events::EventId;
use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::ProcessedEventStore;

/// Entries older than this are dropped the next time one is marked.
/// A day covers any plausible redelivery window on an in-process bus.
const DEFAULT_RETENTION_SECS: i64 = 24 * 60 * 60;

/// Tracks processed (event, handler) pairs in process memory.
///
/// Every `mark_processed` prunes entries older than the retention
/// window, so the map stays bounded to the retained span instead of
/// growing for the life of the process.
pub struct InMemoryProcessedEventStore {
    processed: RwLock<HashMap<(String, String), Timestamp>>,
    retention_secs: i64,
}

impl InMemoryProcessedEventStore {
    pub fn new() -> Self {
        Self::with_retention_secs(DEFAULT_RETENTION_SECS)
    }

    pub fn with_retention_secs(retention_secs: i64) -> Self {
        Self {
            processed: RwLock::new(HashMap::new()),
            retention_secs,
        }
    }
}

impl Default for InMemoryProcessedEventStore {
    fn default() -> Self {
        Self::new()
    }
}

fn key(event_id: &EventId, handler_name: &str) -> (String, String) {
    (event_id.as_str().to_string(), handler_name.to_string())
}

#[async_trait]
impl ProcessedEventStore for InMemoryProcessedEventStore {
    async fn contains(
        &self,
        event_id: &EventId,
        handler_name: &str,
    ) -> Result<bool, DomainError> {
        Ok(self
            .processed
            .read()
            .await
            .contains_key(&key(event_id, handler_name)))
    }

    async fn mark_processed(
        &self,
        event_id: &EventId,
        handler_name: &str,
    ) -> Result<(), DomainError> {
        let now = Timestamp::now();
        let cutoff = now.minus_seconds(self.retention_secs);
        let mut processed = self.processed.write().await;
        processed.retain(|_, at| !at.is_before(&cutoff));
        processed.insert(key(event_id, handler_name), now);
        Ok(())
    }

    async fn delete_before(&self, timestamp: Timestamp) -> Result<u64, DomainError> {
        let mut processed = self.processed.write().await;
        let before = processed.len();
        processed.retain(|_, at| !at.is_before(&timestamp));
        Ok((before - processed.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn contains_reflects_mark_processed() {
        let store = InMemoryProcessedEventStore::new();
        let id = EventId::from_string("evt-1");

        assert!(!store.contains(&id, "Handler").await.unwrap());
        store.mark_processed(&id, "Handler").await.unwrap();
        assert!(store.contains(&id, "Handler").await.unwrap());
        assert!(!store.contains(&id, "OtherHandler").await.unwrap());
    }

    #[tokio::test]
    async fn marking_prunes_entries_past_retention() {
        let store = InMemoryProcessedEventStore::with_retention_secs(0);
        store
            .mark_processed(&EventId::from_string("old"), "Handler")
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        store
            .mark_processed(&EventId::from_string("new"), "Handler")
            .await
            .unwrap();

        assert!(!store
            .contains(&EventId::from_string("old"), "Handler")
            .await
            .unwrap());
        assert!(store
            .contains(&EventId::from_string("new"), "Handler")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn delete_before_removes_old_entries() {
        let store = InMemoryProcessedEventStore::new();
        store
            .mark_processed(&EventId::from_string("old"), "Handler")
            .await
            .unwrap();

        let cutoff = Timestamp::now();
        let removed = store.delete_before(cutoff).await.unwrap();
        assert_eq!(removed, 1);
        assert!(!store
            .contains(&EventId::from_string("old"), "Handler")
            .await
            .unwrap());
    }
}

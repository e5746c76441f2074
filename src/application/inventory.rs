//! InventoryService - Stock management (sales go through SalesService).

use std::sync::Arc;

use crate::domain::events::{Envelope, Verb};
use crate::domain::foundation::{DomainError, InventoryItemId};
use crate::domain::inventory::{InventoryDraft, InventoryItem};
use crate::ports::InventoryRepository;

use super::producer::EventProducer;

pub struct InventoryService {
    repository: Arc<dyn InventoryRepository>,
    producer: EventProducer,
}

impl InventoryService {
    pub fn new(repository: Arc<dyn InventoryRepository>, producer: EventProducer) -> Self {
        Self {
            repository,
            producer,
        }
    }

    pub async fn list(&self) -> Result<Vec<InventoryItem>, DomainError> {
        self.repository.list().await
    }

    pub async fn get(&self, id: InventoryItemId) -> Result<InventoryItem, DomainError> {
        self.repository
            .find(&id)
            .await?
            .ok_or_else(|| DomainError::not_found("Inventory item", &id.to_string()))
    }

    pub async fn create(&self, draft: InventoryDraft) -> Result<InventoryItem, DomainError> {
        let item = InventoryItem::create(draft)?;
        self.repository.save(&item).await?;
        self.producer
            .emit(Verb::Created, Envelope::InventoryUpdate(item.clone()))
            .await;
        Ok(item)
    }

    pub async fn update(
        &self,
        id: InventoryItemId,
        draft: InventoryDraft,
    ) -> Result<InventoryItem, DomainError> {
        let mut item = self.get(id).await?;
        item.apply(draft)?;
        self.repository.save(&item).await?;
        self.producer
            .emit(Verb::Updated, Envelope::InventoryUpdate(item.clone()))
            .await;
        Ok(item)
    }

    pub async fn delete(&self, id: InventoryItemId) -> Result<InventoryItem, DomainError> {
        let removed = self
            .repository
            .delete(&id)
            .await?
            .ok_or_else(|| DomainError::not_found("Inventory item", &id.to_string()))?;
        self.producer
            .emit(Verb::Deleted, Envelope::inventory_deleted(removed.clone()))
            .await;
        Ok(removed)
    }
}

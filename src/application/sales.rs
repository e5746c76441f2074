//! SalesService - Selling stock and the resulting paired broadcasts.

use std::sync::Arc;

use crate::domain::events::{Envelope, Verb};
use crate::domain::foundation::{DomainError, InventoryItemId, SaleId};
use crate::domain::sale::Sale;
use crate::ports::{InventoryRepository, SaleRepository};

use super::producer::EventProducer;

/// The records touched by a completed sale.
#[derive(Debug, Clone)]
pub struct SaleOutcome {
    pub sale: Sale,
    pub item: crate::domain::inventory::InventoryItem,
}

pub struct SalesService {
    sales: Arc<dyn SaleRepository>,
    inventory: Arc<dyn InventoryRepository>,
    producer: EventProducer,
}

impl SalesService {
    pub fn new(
        sales: Arc<dyn SaleRepository>,
        inventory: Arc<dyn InventoryRepository>,
        producer: EventProducer,
    ) -> Self {
        Self {
            sales,
            inventory,
            producer,
        }
    }

    pub async fn list(&self) -> Result<Vec<Sale>, DomainError> {
        self.sales.list().await
    }

    pub async fn get(&self, id: SaleId) -> Result<Sale, DomainError> {
        self.sales
            .find(&id)
            .await?
            .ok_or_else(|| DomainError::not_found("Sale", &id.to_string()))
    }

    /// Sells `quantity` units of the given inventory item.
    ///
    /// The stock check and decrement happen as one repository
    /// operation, so concurrent sells cannot jointly oversell. On
    /// success the sale is recorded and both sides of the write are
    /// broadcast: `sale:update` for the new sale, `inventory:update`
    /// for the reduced item. A rejected sale (unknown item, zero or
    /// excessive quantity) leaves the store untouched and broadcasts
    /// nothing.
    pub async fn sell(
        &self,
        item_id: InventoryItemId,
        quantity: u32,
    ) -> Result<SaleOutcome, DomainError> {
        let item = self
            .inventory
            .deduct(&item_id, quantity)
            .await?
            .ok_or_else(|| DomainError::not_found("Inventory item", &item_id.to_string()))?;

        let sale = Sale::record(&item, quantity);
        self.sales.save(&sale).await?;

        self.producer
            .emit(Verb::Created, Envelope::SaleUpdate(sale.clone()))
            .await;
        self.producer
            .emit(Verb::Updated, Envelope::InventoryUpdate(item.clone()))
            .await;

        Ok(SaleOutcome { sale, item })
    }

    /// Removes a sale record. Stock is not restored; reversing the
    /// inventory side is a separate, explicit inventory edit.
    pub async fn delete(&self, id: SaleId) -> Result<Sale, DomainError> {
        let removed = self
            .sales
            .delete(&id)
            .await?
            .ok_or_else(|| DomainError::not_found("Sale", &id.to_string()))?;
        self.producer
            .emit(Verb::Deleted, Envelope::sale_deleted(removed.clone()))
            .await;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::InMemoryStore;
    use crate::application::test_support::RecordingPublisher;
    use crate::domain::events::EventKind;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::inventory::{InventoryDraft, InventoryItem, StockStatus};

    async fn seeded(
        quantity: u32,
        price: f64,
    ) -> (Arc<InMemoryStore>, Arc<RecordingPublisher>, SalesService, InventoryItem) {
        let store = Arc::new(InMemoryStore::new());
        let publisher = Arc::new(RecordingPublisher::new());
        let item = InventoryItem::create(InventoryDraft {
            name: "Pomade".to_string(),
            quantity,
            price,
        })
        .unwrap();
        InventoryRepository::save(store.as_ref(), &item).await.unwrap();
        let svc = SalesService::new(
            store.clone(),
            store.clone(),
            EventProducer::new(publisher.clone()),
        );
        (store, publisher, svc, item)
    }

    #[tokio::test]
    async fn sell_emits_sale_then_inventory_update() {
        let (_store, publisher, svc, item) = seeded(10, 50.0).await;

        let outcome = svc.sell(item.id, 2).await.unwrap();
        assert_eq!(outcome.sale.quantity, 2);
        assert_eq!(outcome.sale.price, 50.0);
        assert_eq!(outcome.item.quantity, 8);

        let events = publisher.published();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind(), EventKind::SaleUpdate);
        assert_eq!(events[1].kind(), EventKind::InventoryUpdate);
        match &events[1].envelope {
            Envelope::InventoryUpdate(updated) => {
                assert_eq!(updated.quantity, 8);
                assert_eq!(updated.status, StockStatus::InStock);
            }
            other => panic!("unexpected envelope: {other:?}"),
        }
    }

    #[tokio::test]
    async fn overdraw_is_rejected_with_no_writes_and_no_events() {
        let (store, publisher, svc, item) = seeded(10, 50.0).await;

        let err = svc.sell(item.id, 20).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let stored = InventoryRepository::find(store.as_ref(), &item.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.quantity, 10);
        assert!(svc.list().await.unwrap().is_empty());
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected() {
        let (_store, publisher, svc, item) = seeded(10, 50.0).await;

        let err = svc.sell(item.id, 0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn selling_unknown_item_is_not_found() {
        let (_store, publisher, svc, _item) = seeded(10, 50.0).await;

        let err = svc.sell(InventoryItemId::new(), 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn concurrent_sells_cannot_jointly_oversell() {
        let (store, _publisher, svc, item) = seeded(10, 50.0).await;
        let svc = Arc::new(svc);

        let mut handles = Vec::new();
        for _ in 0..4 {
            let svc = svc.clone();
            let id = item.id;
            handles.push(tokio::spawn(async move { svc.sell(id, 6).await }));
        }
        let mut sold = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                sold += 1;
            }
        }

        // Only one sale of 6 fits in a stock of 10.
        assert_eq!(sold, 1);
        let stored = InventoryRepository::find(store.as_ref(), &item.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.quantity, 4);
    }

    #[tokio::test]
    async fn sale_snapshots_price_at_time_of_sale() {
        let (store, _publisher, svc, item) = seeded(10, 50.0).await;

        let first = svc.sell(item.id, 1).await.unwrap();
        assert_eq!(first.sale.price, 50.0);

        let mut repriced = first.item.clone();
        repriced.price = 80.0;
        InventoryRepository::save(store.as_ref(), &repriced)
            .await
            .unwrap();

        let second = svc.sell(item.id, 1).await.unwrap();
        assert_eq!(second.sale.price, 80.0);
        assert_eq!(first.sale.price, 50.0);
    }

    #[tokio::test]
    async fn delete_does_not_restock() {
        let (store, publisher, svc, item) = seeded(10, 50.0).await;

        let outcome = svc.sell(item.id, 4).await.unwrap();
        svc.delete(outcome.sale.id).await.unwrap();

        let stored = InventoryRepository::find(store.as_ref(), &item.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.quantity, 6);

        let events = publisher.published();
        assert_eq!(events.last().unwrap().kind(), EventKind::SaleDeleted);
    }
}

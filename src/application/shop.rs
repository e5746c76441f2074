//! ShopService - The shop open/closed singleton.

use std::sync::Arc;

use crate::domain::events::{Envelope, Verb};
use crate::domain::foundation::DomainError;
use crate::domain::shop::{ShopState, ShopStatus};
use crate::ports::ShopRepository;

use super::producer::EventProducer;

pub struct ShopService {
    repository: Arc<dyn ShopRepository>,
    producer: EventProducer,
}

impl ShopService {
    pub fn new(repository: Arc<dyn ShopRepository>, producer: EventProducer) -> Self {
        Self {
            repository,
            producer,
        }
    }

    /// Current shop state; a never-written shop reads as closed.
    pub async fn current(&self) -> Result<ShopState, DomainError> {
        Ok(self.repository.get().await?.unwrap_or_default())
    }

    /// Replaces the shop state wholesale and broadcasts the new state.
    /// The write is latest-wins; there is no per-field merge.
    pub async fn set(
        &self,
        shop_status: ShopStatus,
        opening_time: Option<String>,
        closing_time: Option<String>,
    ) -> Result<ShopState, DomainError> {
        let state = ShopState::new(shop_status, opening_time, closing_time);
        self.repository.put(&state).await?;
        self.producer
            .emit(Verb::Updated, Envelope::ShopUpdate(state.clone()))
            .await;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::InMemoryStore;
    use crate::application::test_support::RecordingPublisher;
    use crate::domain::events::EventKind;

    fn service(publisher: Arc<RecordingPublisher>) -> ShopService {
        ShopService::new(
            Arc::new(InMemoryStore::new()),
            EventProducer::new(publisher),
        )
    }

    #[tokio::test]
    async fn unset_shop_reads_closed() {
        let publisher = Arc::new(RecordingPublisher::new());
        let svc = service(publisher);
        assert_eq!(svc.current().await.unwrap().shop_status, ShopStatus::Closed);
    }

    #[tokio::test]
    async fn set_broadcasts_shop_update() {
        let publisher = Arc::new(RecordingPublisher::new());
        let svc = service(publisher.clone());

        svc.set(ShopStatus::Open, Some("09:00".to_string()), None)
            .await
            .unwrap();

        let events = publisher.published();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), EventKind::ShopUpdate);
    }

    #[tokio::test]
    async fn later_write_wins() {
        let publisher = Arc::new(RecordingPublisher::new());
        let svc = service(publisher);

        svc.set(ShopStatus::Open, Some("09:00".to_string()), Some("19:00".to_string()))
            .await
            .unwrap();
        svc.set(ShopStatus::Closed, None, None).await.unwrap();

        let state = svc.current().await.unwrap();
        assert_eq!(state.shop_status, ShopStatus::Closed);
        assert!(state.opening_time.is_none());
    }
}

//! CatalogService - The bookable service catalog.

use std::sync::Arc;

use crate::domain::events::{Envelope, Verb};
use crate::domain::foundation::{DomainError, ServiceId};
use crate::domain::service::{ServiceDraft, ServiceOffering};
use crate::ports::ServiceRepository;

use super::producer::EventProducer;

pub struct CatalogService {
    repository: Arc<dyn ServiceRepository>,
    producer: EventProducer,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn ServiceRepository>, producer: EventProducer) -> Self {
        Self {
            repository,
            producer,
        }
    }

    pub async fn list(&self) -> Result<Vec<ServiceOffering>, DomainError> {
        self.repository.list().await
    }

    pub async fn get(&self, id: ServiceId) -> Result<ServiceOffering, DomainError> {
        self.repository
            .find(&id)
            .await?
            .ok_or_else(|| DomainError::not_found("Service", &id.to_string()))
    }

    pub async fn create(&self, draft: ServiceDraft) -> Result<ServiceOffering, DomainError> {
        let service = ServiceOffering::create(draft)?;
        self.repository.save(&service).await?;
        self.producer
            .emit(Verb::Created, Envelope::ServiceUpdate(service.clone()))
            .await;
        Ok(service)
    }

    pub async fn update(
        &self,
        id: ServiceId,
        draft: ServiceDraft,
    ) -> Result<ServiceOffering, DomainError> {
        let mut service = self.get(id).await?;
        service.apply(draft)?;
        self.repository.save(&service).await?;
        self.producer
            .emit(Verb::Updated, Envelope::ServiceUpdate(service.clone()))
            .await;
        Ok(service)
    }

    pub async fn delete(&self, id: ServiceId) -> Result<ServiceOffering, DomainError> {
        let removed = self
            .repository
            .delete(&id)
            .await?
            .ok_or_else(|| DomainError::not_found("Service", &id.to_string()))?;
        self.producer
            .emit(Verb::Deleted, Envelope::service_deleted(removed.clone()))
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
    use crate::domain::service::tests::draft;

    fn service(publisher: Arc<RecordingPublisher>) -> CatalogService {
        CatalogService::new(
            Arc::new(InMemoryStore::new()),
            EventProducer::new(publisher),
        )
    }

    #[tokio::test]
    async fn create_update_delete_each_emit_once() {
        let publisher = Arc::new(RecordingPublisher::new());
        let svc = service(publisher.clone());

        let created = svc.create(draft()).await.unwrap();
        let mut change = draft();
        change.price = 175.0;
        svc.update(created.id, change).await.unwrap();
        svc.delete(created.id).await.unwrap();

        let kinds: Vec<EventKind> = publisher.published().iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::ServiceUpdate,
                EventKind::ServiceUpdate,
                EventKind::ServiceDeleted,
            ]
        );
    }

    #[tokio::test]
    async fn get_after_delete_is_not_found() {
        let publisher = Arc::new(RecordingPublisher::new());
        let svc = service(publisher);

        let created = svc.create(draft()).await.unwrap();
        svc.delete(created.id).await.unwrap();
        assert!(svc.get(created.id).await.is_err());
    }
}

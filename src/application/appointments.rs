//! AppointmentService - Booking reads and writes.

use std::sync::Arc;

use crate::domain::appointment::{Appointment, AppointmentDraft, AppointmentPatch};
use crate::domain::events::{Envelope, Verb};
use crate::domain::foundation::{AppointmentId, DomainError};
use crate::ports::AppointmentRepository;

use super::producer::EventProducer;

pub struct AppointmentService {
    repository: Arc<dyn AppointmentRepository>,
    producer: EventProducer,
}

impl AppointmentService {
    pub fn new(repository: Arc<dyn AppointmentRepository>, producer: EventProducer) -> Self {
        Self {
            repository,
            producer,
        }
    }

    pub async fn list(&self, owner: Option<&str>) -> Result<Vec<Appointment>, DomainError> {
        self.repository.list(owner).await
    }

    pub async fn get(&self, id: AppointmentId) -> Result<Appointment, DomainError> {
        self.repository
            .find(&id)
            .await?
            .ok_or_else(|| DomainError::not_found("Appointment", &id.to_string()))
    }

    pub async fn create(&self, draft: AppointmentDraft) -> Result<Appointment, DomainError> {
        let appointment = Appointment::create(draft)?;
        self.repository.save(&appointment).await?;
        self.producer
            .emit(Verb::Created, Envelope::AppointmentUpdate(appointment.clone()))
            .await;
        Ok(appointment)
    }

    pub async fn update(
        &self,
        id: AppointmentId,
        draft: AppointmentDraft,
    ) -> Result<Appointment, DomainError> {
        let mut appointment = self.get(id).await?;
        appointment.apply(draft)?;
        self.repository.save(&appointment).await?;
        self.producer
            .emit(Verb::Updated, Envelope::AppointmentUpdate(appointment.clone()))
            .await;
        Ok(appointment)
    }

    pub async fn patch(
        &self,
        id: AppointmentId,
        patch: AppointmentPatch,
    ) -> Result<Appointment, DomainError> {
        let mut appointment = self.get(id).await?;
        appointment.patch(patch)?;
        self.repository.save(&appointment).await?;
        self.producer
            .emit(Verb::Updated, Envelope::AppointmentUpdate(appointment.clone()))
            .await;
        Ok(appointment)
    }

    pub async fn delete(&self, id: AppointmentId) -> Result<Appointment, DomainError> {
        let removed = self
            .repository
            .delete(&id)
            .await?
            .ok_or_else(|| DomainError::not_found("Appointment", &id.to_string()))?;
        self.producer
            .emit(Verb::Deleted, Envelope::appointment_deleted(removed.clone()))
            .await;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::InMemoryStore;
    use crate::application::test_support::RecordingPublisher;
    use crate::domain::appointment::tests::draft;
    use crate::domain::events::EventKind;
    use crate::domain::foundation::ErrorCode;
    use async_trait::async_trait;

    fn service(store: Arc<InMemoryStore>, publisher: Arc<RecordingPublisher>) -> AppointmentService {
        AppointmentService::new(store, EventProducer::new(publisher))
    }

    #[tokio::test]
    async fn create_persists_then_emits_one_update() {
        let store = Arc::new(InMemoryStore::new());
        let publisher = Arc::new(RecordingPublisher::new());
        let svc = service(store.clone(), publisher.clone());

        let created = svc.create(draft()).await.unwrap();

        assert_eq!(svc.get(created.id).await.unwrap().id, created.id);
        let events = publisher.published();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), EventKind::AppointmentUpdate);
        assert_eq!(events[0].verb, Verb::Created);
    }

    #[tokio::test]
    async fn update_emits_update_with_updated_verb() {
        let store = Arc::new(InMemoryStore::new());
        let publisher = Arc::new(RecordingPublisher::new());
        let svc = service(store, publisher.clone());

        let created = svc.create(draft()).await.unwrap();
        let mut change = draft();
        change.barber = "Bibek".to_string();
        let updated = svc.update(created.id, change).await.unwrap();

        assert_eq!(updated.barber, "Bibek");
        let events = publisher.published();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].verb, Verb::Updated);
    }

    #[tokio::test]
    async fn patch_emits_update_and_keeps_other_fields() {
        let store = Arc::new(InMemoryStore::new());
        let publisher = Arc::new(RecordingPublisher::new());
        let svc = service(store, publisher.clone());

        let created = svc.create(draft()).await.unwrap();
        let patched = svc
            .patch(
                created.id,
                AppointmentPatch {
                    status: Some(crate::domain::appointment::AppointmentStatus::Completed),
                    ..AppointmentPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            patched.status,
            crate::domain::appointment::AppointmentStatus::Completed
        );
        assert_eq!(patched.barber, created.barber);
        let events = publisher.published();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].verb, Verb::Updated);
    }

    #[tokio::test]
    async fn delete_emits_last_known_record() {
        let store = Arc::new(InMemoryStore::new());
        let publisher = Arc::new(RecordingPublisher::new());
        let svc = service(store, publisher.clone());

        let created = svc.create(draft()).await.unwrap();
        svc.delete(created.id).await.unwrap();

        let events = publisher.published();
        assert_eq!(events[1].kind(), EventKind::AppointmentDeleted);
        match &events[1].envelope {
            Envelope::AppointmentDeleted(payload) => {
                assert_eq!(payload.id, created.id);
                assert_eq!(payload.appointment.barber, created.barber);
            }
            other => panic!("unexpected envelope: {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found_and_silent() {
        let store = Arc::new(InMemoryStore::new());
        let publisher = Arc::new(RecordingPublisher::new());
        let svc = service(store, publisher.clone());

        let err = svc.delete(AppointmentId::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn invalid_draft_is_rejected_without_side_effects() {
        let store = Arc::new(InMemoryStore::new());
        let publisher = Arc::new(RecordingPublisher::new());
        let svc = service(store.clone(), publisher.clone());

        let mut bad = draft();
        bad.name = String::new();
        assert!(svc.create(bad).await.is_err());

        assert!(svc.list(None).await.unwrap().is_empty());
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn failed_save_publishes_nothing() {
        struct FailingRepo;

        #[async_trait]
        impl AppointmentRepository for FailingRepo {
            async fn find(
                &self,
                _id: &AppointmentId,
            ) -> Result<Option<Appointment>, DomainError> {
                Ok(None)
            }

            async fn list(&self, _owner: Option<&str>) -> Result<Vec<Appointment>, DomainError> {
                Ok(vec![])
            }

            async fn save(&self, _appointment: &Appointment) -> Result<(), DomainError> {
                Err(DomainError::storage("Simulated write failure"))
            }

            async fn delete(
                &self,
                _id: &AppointmentId,
            ) -> Result<Option<Appointment>, DomainError> {
                Ok(None)
            }
        }

        let publisher = Arc::new(RecordingPublisher::new());
        let svc = AppointmentService::new(
            Arc::new(FailingRepo),
            EventProducer::new(publisher.clone()),
        );

        let err = svc.create(draft()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(publisher.published().is_empty());
    }
}

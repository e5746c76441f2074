//! UserService - Staff and client account management.

use std::sync::Arc;

use crate::domain::events::{Envelope, Verb};
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::{Role, User, UserDraft};
use crate::ports::UserRepository;

use super::producer::EventProducer;

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    producer: EventProducer,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, producer: EventProducer) -> Self {
        Self {
            repository,
            producer,
        }
    }

    pub async fn list(&self, role: Option<Role>) -> Result<Vec<User>, DomainError> {
        self.repository.list(role).await
    }

    pub async fn get(&self, id: UserId) -> Result<User, DomainError> {
        self.repository
            .find(&id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", &id.to_string()))
    }

    pub async fn create(&self, draft: UserDraft) -> Result<User, DomainError> {
        draft.validate()?;
        let email = draft.normalized_email();
        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "Email already registered: {}",
                email
            )));
        }
        let user = User::create(draft)?;
        self.repository.save(&user).await?;
        self.producer
            .emit(Verb::Created, Envelope::UserUpdate(user.clone()))
            .await;
        Ok(user)
    }

    pub async fn update(&self, id: UserId, draft: UserDraft) -> Result<User, DomainError> {
        draft.validate()?;
        let mut user = self.get(id).await?;
        let email = draft.normalized_email();
        if let Some(existing) = self.repository.find_by_email(&email).await? {
            if existing.id != user.id {
                return Err(DomainError::conflict(format!(
                    "Email already registered: {}",
                    email
                )));
            }
        }
        user.apply(draft)?;
        self.repository.save(&user).await?;
        self.producer
            .emit(Verb::Updated, Envelope::UserUpdate(user.clone()))
            .await;
        Ok(user)
    }

    pub async fn delete(&self, id: UserId) -> Result<User, DomainError> {
        let removed = self
            .repository
            .delete(&id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", &id.to_string()))?;
        self.producer
            .emit(Verb::Deleted, Envelope::user_deleted(removed.clone()))
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
    use crate::domain::user::tests::draft;

    fn service(publisher: Arc<RecordingPublisher>) -> UserService {
        UserService::new(
            Arc::new(InMemoryStore::new()),
            EventProducer::new(publisher),
        )
    }

    #[tokio::test]
    async fn create_emits_user_update() {
        let publisher = Arc::new(RecordingPublisher::new());
        let svc = service(publisher.clone());

        svc.create(draft(Role::Barber)).await.unwrap();

        let events = publisher.published();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), EventKind::UserUpdate);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_without_broadcast() {
        let publisher = Arc::new(RecordingPublisher::new());
        let svc = service(publisher.clone());

        svc.create(draft(Role::Barber)).await.unwrap();
        let mut dup = draft(Role::User);
        dup.email = "sujan@EXAMPLE.com".to_string();
        let err = svc.create(dup).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(publisher.published().len(), 1);
    }

    #[tokio::test]
    async fn update_keeps_own_email_without_conflict() {
        let publisher = Arc::new(RecordingPublisher::new());
        let svc = service(publisher.clone());

        let user = svc.create(draft(Role::Barber)).await.unwrap();
        let mut change = draft(Role::Barber);
        change.position = Some("Senior Barber".to_string());
        let updated = svc.update(user.id, change).await.unwrap();

        assert_eq!(updated.position.as_deref(), Some("Senior Barber"));
    }

    #[tokio::test]
    async fn update_rejects_email_taken_by_another_user() {
        let publisher = Arc::new(RecordingPublisher::new());
        let svc = service(publisher);

        svc.create(draft(Role::Barber)).await.unwrap();
        let mut second = draft(Role::User);
        second.email = "other@example.com".to_string();
        let other = svc.create(second).await.unwrap();

        let mut steal = draft(Role::User);
        steal.email = "sujan@example.com".to_string();
        let err = svc.update(other.id, steal).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn delete_emits_user_deleted() {
        let publisher = Arc::new(RecordingPublisher::new());
        let svc = service(publisher.clone());

        let user = svc.create(draft(Role::User)).await.unwrap();
        svc.delete(user.id).await.unwrap();

        let events = publisher.published();
        assert_eq!(events[1].kind(), EventKind::UserDeleted);
    }
}

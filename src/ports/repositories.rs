//! Repository ports - Interfaces for the document store.
//!
//! One trait per resource family. `save` is an upsert keyed by id;
//! `delete` returns the removed record so the caller can broadcast its
//! last-known state.

use async_trait::async_trait;

use crate::domain::appointment::Appointment;
use crate::domain::foundation::{
    AppointmentId, DomainError, InventoryItemId, SaleId, ServiceId, UserId,
};
use crate::domain::inventory::InventoryItem;
use crate::domain::sale::Sale;
use crate::domain::service::ServiceOffering;
use crate::domain::shop::ShopState;
use crate::domain::user::{Role, User};

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn find(&self, id: &AppointmentId) -> Result<Option<Appointment>, DomainError>;

    /// All appointments, optionally scoped to one owner-correlation id.
    async fn list(&self, owner: Option<&str>) -> Result<Vec<Appointment>, DomainError>;

    async fn save(&self, appointment: &Appointment) -> Result<(), DomainError>;

    async fn delete(&self, id: &AppointmentId) -> Result<Option<Appointment>, DomainError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Lookup by normalized email, for uniqueness checks.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// All users, optionally restricted to one role.
    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, DomainError>;

    async fn save(&self, user: &User) -> Result<(), DomainError>;

    async fn delete(&self, id: &UserId) -> Result<Option<User>, DomainError>;
}

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn find(&self, id: &ServiceId) -> Result<Option<ServiceOffering>, DomainError>;

    async fn list(&self) -> Result<Vec<ServiceOffering>, DomainError>;

    async fn save(&self, service: &ServiceOffering) -> Result<(), DomainError>;

    async fn delete(&self, id: &ServiceId) -> Result<Option<ServiceOffering>, DomainError>;
}

#[async_trait]
pub trait InventoryRepository: Send + Sync {
    async fn find(&self, id: &InventoryItemId) -> Result<Option<InventoryItem>, DomainError>;

    async fn list(&self) -> Result<Vec<InventoryItem>, DomainError>;

    async fn save(&self, item: &InventoryItem) -> Result<(), DomainError>;

    async fn delete(&self, id: &InventoryItemId) -> Result<Option<InventoryItem>, DomainError>;

    /// Checks stock and decrements it in one step, returning the
    /// updated item. `Ok(None)` when the item does not exist.
    ///
    /// The default is read-modify-write; stores that can guard the
    /// whole operation must override it so two concurrent sells cannot
    /// jointly oversell.
    async fn deduct(
        &self,
        id: &InventoryItemId,
        quantity: u32,
    ) -> Result<Option<InventoryItem>, DomainError> {
        let Some(mut item) = self.find(id).await? else {
            return Ok(None);
        };
        item.deduct(quantity)?;
        self.save(&item).await?;
        Ok(Some(item))
    }
}

#[async_trait]
pub trait SaleRepository: Send + Sync {
    async fn find(&self, id: &SaleId) -> Result<Option<Sale>, DomainError>;

    async fn list(&self) -> Result<Vec<Sale>, DomainError>;

    async fn save(&self, sale: &Sale) -> Result<(), DomainError>;

    async fn delete(&self, id: &SaleId) -> Result<Option<Sale>, DomainError>;
}

/// The shop record is a singleton; writes are latest-wins upserts.
#[async_trait]
pub trait ShopRepository: Send + Sync {
    async fn get(&self) -> Result<Option<ShopState>, DomainError>;

    async fn put(&self, state: &ShopState) -> Result<(), DomainError>;
}

//! InMemoryStore - Document store adapter backed by process memory.
//!
//! One store instance implements every repository port. Collections
//! keep insertion order so list responses are stable; upserts replace
//! in place. Integration tests use this store directly, and it is the
//! default adapter when no external document store is configured.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::appointment::Appointment;
use crate::domain::foundation::{
    AppointmentId, DomainError, InventoryItemId, SaleId, ServiceId, UserId,
};
use crate::domain::inventory::InventoryItem;
use crate::domain::sale::Sale;
use crate::domain::service::ServiceOffering;
use crate::domain::shop::ShopState;
use crate::domain::user::{Role, User};
use crate::ports::{
    AppointmentRepository, InventoryRepository, SaleRepository, ServiceRepository, ShopRepository,
    UserRepository,
};

#[derive(Default)]
pub struct InMemoryStore {
    appointments: RwLock<Vec<Appointment>>,
    users: RwLock<Vec<User>>,
    services: RwLock<Vec<ServiceOffering>>,
    inventory: RwLock<Vec<InventoryItem>>,
    sales: RwLock<Vec<Sale>>,
    shop: RwLock<Option<ShopState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn upsert<T: Clone>(items: &mut Vec<T>, item: &T, same: impl Fn(&T) -> bool) {
    match items.iter_mut().find(|existing| same(existing)) {
        Some(existing) => *existing = item.clone(),
        None => items.push(item.clone()),
    }
}

fn remove<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> Option<T> {
    items
        .iter()
        .position(matches)
        .map(|index| items.remove(index))
}

#[async_trait]
impl AppointmentRepository for InMemoryStore {
    async fn find(&self, id: &AppointmentId) -> Result<Option<Appointment>, DomainError> {
        Ok(self
            .appointments
            .read()
            .await
            .iter()
            .find(|a| a.id == *id)
            .cloned())
    }

    async fn list(&self, owner: Option<&str>) -> Result<Vec<Appointment>, DomainError> {
        let appointments = self.appointments.read().await;
        Ok(match owner {
            Some(owner) => appointments
                .iter()
                .filter(|a| a.my_id.as_deref() == Some(owner))
                .cloned()
                .collect(),
            None => appointments.clone(),
        })
    }

    async fn save(&self, appointment: &Appointment) -> Result<(), DomainError> {
        let mut appointments = self.appointments.write().await;
        upsert(&mut appointments, appointment, |a| a.id == appointment.id);
        Ok(())
    }

    async fn delete(&self, id: &AppointmentId) -> Result<Option<Appointment>, DomainError> {
        let mut appointments = self.appointments.write().await;
        Ok(remove(&mut appointments, |a| a.id == *id))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let email = email.trim().to_lowercase();
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().await;
        Ok(match role {
            Some(role) => users.iter().filter(|u| u.role == role).cloned().collect(),
            None => users.clone(),
        })
    }

    async fn save(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        upsert(&mut users, user, |u| u.id == user.id);
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let mut users = self.users.write().await;
        Ok(remove(&mut users, |u| u.id == *id))
    }
}

#[async_trait]
impl ServiceRepository for InMemoryStore {
    async fn find(&self, id: &ServiceId) -> Result<Option<ServiceOffering>, DomainError> {
        Ok(self
            .services
            .read()
            .await
            .iter()
            .find(|s| s.id == *id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<ServiceOffering>, DomainError> {
        Ok(self.services.read().await.clone())
    }

    async fn save(&self, service: &ServiceOffering) -> Result<(), DomainError> {
        let mut services = self.services.write().await;
        upsert(&mut services, service, |s| s.id == service.id);
        Ok(())
    }

    async fn delete(&self, id: &ServiceId) -> Result<Option<ServiceOffering>, DomainError> {
        let mut services = self.services.write().await;
        Ok(remove(&mut services, |s| s.id == *id))
    }
}

#[async_trait]
impl InventoryRepository for InMemoryStore {
    async fn find(&self, id: &InventoryItemId) -> Result<Option<InventoryItem>, DomainError> {
        Ok(self
            .inventory
            .read()
            .await
            .iter()
            .find(|i| i.id == *id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<InventoryItem>, DomainError> {
        Ok(self.inventory.read().await.clone())
    }

    async fn save(&self, item: &InventoryItem) -> Result<(), DomainError> {
        let mut inventory = self.inventory.write().await;
        upsert(&mut inventory, item, |i| i.id == item.id);
        Ok(())
    }

    async fn delete(&self, id: &InventoryItemId) -> Result<Option<InventoryItem>, DomainError> {
        let mut inventory = self.inventory.write().await;
        Ok(remove(&mut inventory, |i| i.id == *id))
    }

    // Check-and-decrement under the collection's write lock.
    async fn deduct(
        &self,
        id: &InventoryItemId,
        quantity: u32,
    ) -> Result<Option<InventoryItem>, DomainError> {
        let mut inventory = self.inventory.write().await;
        let Some(item) = inventory.iter_mut().find(|i| i.id == *id) else {
            return Ok(None);
        };
        item.deduct(quantity)?;
        Ok(Some(item.clone()))
    }
}

#[async_trait]
impl SaleRepository for InMemoryStore {
    async fn find(&self, id: &SaleId) -> Result<Option<Sale>, DomainError> {
        Ok(self.sales.read().await.iter().find(|s| s.id == *id).cloned())
    }

    async fn list(&self) -> Result<Vec<Sale>, DomainError> {
        Ok(self.sales.read().await.clone())
    }

    async fn save(&self, sale: &Sale) -> Result<(), DomainError> {
        let mut sales = self.sales.write().await;
        upsert(&mut sales, sale, |s| s.id == sale.id);
        Ok(())
    }

    async fn delete(&self, id: &SaleId) -> Result<Option<Sale>, DomainError> {
        let mut sales = self.sales.write().await;
        Ok(remove(&mut sales, |s| s.id == *id))
    }
}

#[async_trait]
impl ShopRepository for InMemoryStore {
    async fn get(&self) -> Result<Option<ShopState>, DomainError> {
        Ok(self.shop.read().await.clone())
    }

    async fn put(&self, state: &ShopState) -> Result<(), DomainError> {
        *self.shop.write().await = Some(state.clone());
        Ok(())
    }
}

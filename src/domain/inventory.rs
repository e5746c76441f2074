//! Inventory item with derived stock status.

use serde::{Deserialize, Serialize};

use super::foundation::{DomainError, InventoryItemId, Timestamp, ValidationError};

/// Quantities below this count as low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Derived availability of an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StockStatus {
    #[default]
    #[serde(rename = "in-stock")]
    InStock,
    #[serde(rename = "low-stock")]
    LowStock,
    #[serde(rename = "out-of-stock")]
    OutOfStock,
}

impl StockStatus {
    /// Derives the status for a quantity: 0 is out of stock, anything
    /// below [`LOW_STOCK_THRESHOLD`] is low.
    pub fn for_quantity(quantity: u32) -> Self {
        if quantity == 0 {
            StockStatus::OutOfStock
        } else if quantity < LOW_STOCK_THRESHOLD {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

/// A stocked item as carried in `inventory:update` payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
    pub status: StockStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields accepted when creating or updating an item.
#[derive(Debug, Clone)]
pub struct InventoryDraft {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

impl InventoryDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if self.price < 0.0 {
            return Err(ValidationError::negative("price", self.price));
        }
        Ok(())
    }
}

impl InventoryItem {
    /// Builds a new item; stock status is derived, never supplied.
    pub fn create(draft: InventoryDraft) -> Result<Self, ValidationError> {
        draft.validate()?;
        let now = Timestamp::now();
        Ok(Self {
            id: InventoryItemId::new(),
            name: draft.name,
            status: StockStatus::for_quantity(draft.quantity),
            quantity: draft.quantity,
            price: draft.price,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the mutable fields and recomputes stock status.
    pub fn apply(&mut self, draft: InventoryDraft) -> Result<(), ValidationError> {
        draft.validate()?;
        self.name = draft.name;
        self.quantity = draft.quantity;
        self.price = draft.price;
        self.status = StockStatus::for_quantity(self.quantity);
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Removes `quantity` units for a sale, recomputing status.
    ///
    /// Rejects quantities of zero or beyond the available stock without
    /// touching the item.
    pub fn deduct(&mut self, quantity: u32) -> Result<(), DomainError> {
        if quantity == 0 {
            return Err(DomainError::validation("Quantity must be > 0"));
        }
        if quantity > self.quantity {
            return Err(DomainError::insufficient_stock(format!(
                "Insufficient stock: requested {}, available {}",
                quantity, self.quantity
            )));
        }
        self.quantity -= quantity;
        self.status = StockStatus::for_quantity(self.quantity);
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn item(quantity: u32) -> InventoryItem {
        InventoryItem::create(InventoryDraft {
            name: "Pomade".to_string(),
            quantity,
            price: 50.0,
        })
        .unwrap()
    }

    #[test]
    fn status_thresholds_match_the_original() {
        assert_eq!(StockStatus::for_quantity(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::for_quantity(4), StockStatus::LowStock);
        assert_eq!(StockStatus::for_quantity(5), StockStatus::InStock);
        assert_eq!(StockStatus::for_quantity(10), StockStatus::InStock);
    }

    #[test]
    fn create_derives_status() {
        assert_eq!(item(3).status, StockStatus::LowStock);
        assert_eq!(item(0).status, StockStatus::OutOfStock);
    }

    #[test]
    fn deduct_recomputes_status() {
        let mut it = item(10);
        it.deduct(3).unwrap();
        assert_eq!(it.quantity, 7);
        assert_eq!(it.status, StockStatus::InStock);
        it.deduct(3).unwrap();
        assert_eq!(it.quantity, 4);
        assert_eq!(it.status, StockStatus::LowStock);
        it.deduct(4).unwrap();
        assert_eq!(it.status, StockStatus::OutOfStock);
    }

    #[test]
    fn deduct_rejects_overdraw_without_mutation() {
        let mut it = item(10);
        let err = it.deduct(20).unwrap_err();
        assert!(err.message.contains("Insufficient stock"));
        assert_eq!(it.quantity, 10);
        assert_eq!(it.status, StockStatus::InStock);
    }

    #[test]
    fn deduct_rejects_zero() {
        let mut it = item(10);
        assert!(it.deduct(0).is_err());
    }

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&StockStatus::LowStock).unwrap();
        assert_eq!(json, "\"low-stock\"");
    }
}

//! Immutable record of a completed sale.

use serde::{Deserialize, Serialize};

use super::foundation::{InventoryItemId, SaleId, Timestamp};
use super::inventory::InventoryItem;

/// A sale as carried in `sale:update` payloads.
///
/// Captures name and price at the time of sale; later edits to the
/// inventory item do not rewrite sales history. Sales are never
/// updated, only created and (rarely) deleted to reverse a mistake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: SaleId,
    pub inventory_id: InventoryItemId,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
    pub created_at: Timestamp,
}

impl Sale {
    /// Records a sale of `quantity` units of `item` at its current price.
    ///
    /// The caller deducts stock first; this constructor only snapshots.
    pub fn record(item: &InventoryItem, quantity: u32) -> Self {
        Self {
            id: SaleId::new(),
            inventory_id: item.id,
            name: item.name.clone(),
            quantity,
            price: item.price,
            created_at: Timestamp::now(),
        }
    }
}

//! Shop open/closed state.

use serde::{Deserialize, Serialize};

use super::foundation::Timestamp;

/// Whether the shop is taking walk-ins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShopStatus {
    Open,
    #[default]
    Closed,
}

/// The shop's current state; only the latest record is authoritative.
///
/// This is also the exact payload of `shop:update` (no id travels on
/// the wire for the shop singleton).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopState {
    pub shop_status: ShopStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_time: Option<String>,
    #[serde(skip)]
    pub updated_at: Timestamp,
}

impl ShopState {
    pub fn new(
        shop_status: ShopStatus,
        opening_time: Option<String>,
        closing_time: Option<String>,
    ) -> Self {
        Self {
            shop_status,
            opening_time,
            closing_time,
            updated_at: Timestamp::now(),
        }
    }
}

impl Default for ShopState {
    fn default() -> Self {
        Self::new(ShopStatus::Closed, None, None)
    }
}

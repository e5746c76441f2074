//! HTTP endpoints for sales.
//!
//! A sale is created against an inventory item: `POST /api/sales/:id`
//! where `:id` names the item to sell from.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::application::SalesService;
use crate::domain::foundation::{InventoryItemId, SaleId};
use crate::domain::inventory::InventoryItem;
use crate::domain::sale::Sale;

use super::error::{domain_error_response, invalid_id_response};

#[derive(Debug, Clone, Deserialize)]
pub struct SellRequest {
    pub quantity: u32,
}

/// Both records changed by a sale, so the caller needs no follow-up
/// reads.
#[derive(Debug, Clone, Serialize)]
pub struct SellResponse {
    pub sale: Sale,
    pub item: InventoryItem,
}

/// GET /api/sales
pub async fn list_sales(State(service): State<Arc<SalesService>>) -> Response {
    match service.list().await {
        Ok(sales) => (StatusCode::OK, Json(sales)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// POST /api/sales/:id - Sell from inventory item `:id`
pub async fn sell_item(
    State(service): State<Arc<SalesService>>,
    Path(id): Path<String>,
    Json(req): Json<SellRequest>,
) -> Response {
    let item_id: InventoryItemId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id_response("inventory item"),
    };
    match service.sell(item_id, req.quantity).await {
        Ok(outcome) => (
            StatusCode::CREATED,
            Json(SellResponse {
                sale: outcome.sale,
                item: outcome.item,
            }),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/sales/:id
pub async fn get_sale(
    State(service): State<Arc<SalesService>>,
    Path(id): Path<String>,
) -> Response {
    let id: SaleId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id_response("sale"),
    };
    match service.get(id).await {
        Ok(sale) => (StatusCode::OK, Json(sale)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// DELETE /api/sales/:id
pub async fn delete_sale(
    State(service): State<Arc<SalesService>>,
    Path(id): Path<String>,
) -> Response {
    let id: SaleId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id_response("sale"),
    };
    match service.delete(id).await {
        Ok(removed) => (StatusCode::OK, Json(removed)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// Sales router, mounted at `/api/sales`.
pub fn sale_routes(service: Arc<SalesService>) -> Router {
    Router::new()
        .route("/", get(list_sales))
        .route("/:id", get(get_sale).post(sell_item).delete(delete_sale))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sell_request_deserializes() {
        let req: SellRequest = serde_json::from_str(r#"{"quantity": 2}"#).unwrap();
        assert_eq!(req.quantity, 2);
    }

    #[test]
    fn negative_quantity_is_rejected_by_the_type() {
        assert!(serde_json::from_str::<SellRequest>(r#"{"quantity": -1}"#).is_err());
    }
}

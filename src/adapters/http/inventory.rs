//! HTTP endpoints for inventory items.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::application::InventoryService;
use crate::domain::foundation::InventoryItemId;
use crate::domain::inventory::InventoryDraft;

use super::error::{domain_error_response, invalid_id_response};

/// Stock status is derived server-side and rejected as input.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InventoryRequest {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

impl From<InventoryRequest> for InventoryDraft {
    fn from(req: InventoryRequest) -> Self {
        Self {
            name: req.name,
            quantity: req.quantity,
            price: req.price,
        }
    }
}

/// GET /api/inventory
pub async fn list_items(State(service): State<Arc<InventoryService>>) -> Response {
    match service.list().await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// POST /api/inventory
pub async fn create_item(
    State(service): State<Arc<InventoryService>>,
    Json(req): Json<InventoryRequest>,
) -> Response {
    match service.create(req.into()).await {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/inventory/:id
pub async fn get_item(
    State(service): State<Arc<InventoryService>>,
    Path(id): Path<String>,
) -> Response {
    let id: InventoryItemId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id_response("inventory item"),
    };
    match service.get(id).await {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// PUT /api/inventory/:id
pub async fn update_item(
    State(service): State<Arc<InventoryService>>,
    Path(id): Path<String>,
    Json(req): Json<InventoryRequest>,
) -> Response {
    let id: InventoryItemId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id_response("inventory item"),
    };
    match service.update(id, req.into()).await {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// DELETE /api/inventory/:id
pub async fn delete_item(
    State(service): State<Arc<InventoryService>>,
    Path(id): Path<String>,
) -> Response {
    let id: InventoryItemId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id_response("inventory item"),
    };
    match service.delete(id).await {
        Ok(removed) => (StatusCode::OK, Json(removed)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// Inventory router, mounted at `/api/inventory`.
pub fn inventory_routes(service: Arc<InventoryService>) -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
        .with_state(service)
}

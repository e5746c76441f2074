//! HTTP endpoints for the service catalog.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::application::CatalogService;
use crate::domain::foundation::ServiceId;
use crate::domain::service::ServiceDraft;

use super::error::{domain_error_response, invalid_id_response};

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceRequest {
    #[serde(rename = "type")]
    pub service_type: String,
    pub price: f64,
    pub status: Option<String>,
}

impl From<ServiceRequest> for ServiceDraft {
    fn from(req: ServiceRequest) -> Self {
        Self {
            service_type: req.service_type,
            price: req.price,
            status: req.status,
        }
    }
}

/// GET /api/services
pub async fn list_services(State(service): State<Arc<CatalogService>>) -> Response {
    match service.list().await {
        Ok(services) => (StatusCode::OK, Json(services)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// POST /api/services
pub async fn create_service(
    State(service): State<Arc<CatalogService>>,
    Json(req): Json<ServiceRequest>,
) -> Response {
    match service.create(req.into()).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/services/:id
pub async fn get_service(
    State(service): State<Arc<CatalogService>>,
    Path(id): Path<String>,
) -> Response {
    let id: ServiceId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id_response("service"),
    };
    match service.get(id).await {
        Ok(found) => (StatusCode::OK, Json(found)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// PUT /api/services/:id
pub async fn update_service(
    State(service): State<Arc<CatalogService>>,
    Path(id): Path<String>,
    Json(req): Json<ServiceRequest>,
) -> Response {
    let id: ServiceId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id_response("service"),
    };
    match service.update(id, req.into()).await {
        Ok(updated) => (StatusCode::OK, Json(updated)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// DELETE /api/services/:id
pub async fn delete_service(
    State(service): State<Arc<CatalogService>>,
    Path(id): Path<String>,
) -> Response {
    let id: ServiceId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id_response("service"),
    };
    match service.delete(id).await {
        Ok(removed) => (StatusCode::OK, Json(removed)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// Catalog router, mounted at `/api/services`.
pub fn service_routes(service: Arc<CatalogService>) -> Router {
    Router::new()
        .route("/", get(list_services).post(create_service))
        .route(
            "/:id",
            get(get_service).put(update_service).delete(delete_service),
        )
        .with_state(service)
}

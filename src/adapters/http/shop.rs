//! HTTP endpoints for the shop singleton.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::application::ShopService;
use crate::domain::shop::ShopStatus;

use super::error::domain_error_response;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopRequest {
    pub shop_status: ShopStatus,
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
}

/// GET /api/shop
pub async fn get_shop(State(service): State<Arc<ShopService>>) -> Response {
    match service.current().await {
        Ok(state) => (StatusCode::OK, Json(state)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// PUT/POST /api/shop - Latest-wins upsert of the whole state
pub async fn put_shop(
    State(service): State<Arc<ShopService>>,
    Json(req): Json<ShopRequest>,
) -> Response {
    match service
        .set(req.shop_status, req.opening_time, req.closing_time)
        .await
    {
        Ok(state) => (StatusCode::OK, Json(state)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// Shop router, mounted at `/api/shop`.
pub fn shop_routes(service: Arc<ShopService>) -> Router {
    Router::new()
        .route("/", get(get_shop).put(put_shop).post(put_shop))
        .with_state(service)
}

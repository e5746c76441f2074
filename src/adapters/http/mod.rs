//! HTTP adapters - REST API implementations.
//!
//! One module per resource family plus the shared error surface. The
//! full API is assembled here: REST under `/api/<resource>`, the live
//! WebSocket stream under `/api/live`.

pub mod appointments;
pub mod error;
pub mod inventory;
pub mod sales;
pub mod services;
pub mod shop;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::adapters::realtime::{realtime_router, RealtimeState};
use crate::application::{
    AppointmentService, CatalogService, InventoryService, SalesService, ShopService, UserService,
};
use crate::config::ServerConfig;

pub use error::ErrorResponse;

/// Shared handles for the REST surface.
#[derive(Clone)]
pub struct AppState {
    pub appointments: Arc<AppointmentService>,
    pub users: Arc<UserService>,
    pub catalog: Arc<CatalogService>,
    pub inventory: Arc<InventoryService>,
    pub sales: Arc<SalesService>,
    pub shop: Arc<ShopService>,
}

/// GET /api/health
async fn health() -> &'static str {
    "ok"
}

/// Assembles the complete application router.
pub fn api_router(state: AppState, realtime: RealtimeState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .nest(
            "/api/appointments",
            appointments::appointment_routes(state.appointments),
        )
        .nest("/api/users", users::user_routes(state.users))
        .nest("/api/services", services::service_routes(state.catalog))
        .nest("/api/inventory", inventory::inventory_routes(state.inventory))
        .nest("/api/sales", sales::sale_routes(state.sales))
        .nest("/api/shop", shop::shop_routes(state.shop))
        .nest("/api", realtime_router().with_state(realtime))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&server.cors_origins_list()))
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_secs,
        )))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(Any)
        .allow_headers(Any)
}

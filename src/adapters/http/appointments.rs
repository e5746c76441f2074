//! HTTP endpoints for appointments.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::application::AppointmentService;
use crate::domain::appointment::{
    AgeGroup, AppointmentDraft, AppointmentPatch, AppointmentStatus, CustomerType, PaymentMethod,
    PaymentStatus, ServiceSnapshot,
};
use crate::domain::foundation::AppointmentId;

use super::error::{domain_error_response, invalid_id_response};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSnapshotRequest {
    #[serde(rename = "type")]
    pub service_type: String,
    pub price: f64,
}

/// Create/update body; responses are the domain record's wire form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub barber: String,
    pub service: ServiceSnapshotRequest,
    pub schedule: String,
    #[serde(default)]
    pub customer_type: CustomerType,
    #[serde(default)]
    pub age_group: AgeGroup,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(rename = "myId")]
    pub my_id: Option<String>,
}

impl From<AppointmentRequest> for AppointmentDraft {
    fn from(req: AppointmentRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone: req.phone,
            barber: req.barber,
            service: ServiceSnapshot {
                service_type: req.service.service_type,
                price: req.service.price,
            },
            schedule: req.schedule,
            customer_type: req.customer_type,
            age_group: req.age_group,
            payment_method: req.payment_method,
            payment_status: req.payment_status,
            status: req.status,
            my_id: req.my_id,
        }
    }
}

/// Partial-update body; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatchRequest {
    pub status: Option<AppointmentStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub barber: Option<String>,
    pub schedule: Option<String>,
}

impl From<AppointmentPatchRequest> for AppointmentPatch {
    fn from(req: AppointmentPatchRequest) -> Self {
        Self {
            status: req.status,
            payment_status: req.payment_status,
            barber: req.barber,
            schedule: req.schedule,
        }
    }
}

/// `myId` scopes the listing to one owner-correlation id; `status` is a
/// comma list of lifecycle statuses (unknown tokens are ignored).
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "myId")]
    pub my_id: Option<String>,
    pub status: Option<String>,
}

fn parse_status_filter(raw: &str) -> Vec<AppointmentStatus> {
    raw.split(',')
        .filter_map(|token| match token.trim() {
            "scheduled" => Some(AppointmentStatus::Scheduled),
            "pending" => Some(AppointmentStatus::Pending),
            "completed" => Some(AppointmentStatus::Completed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        })
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/appointments
pub async fn list_appointments(
    State(service): State<Arc<AppointmentService>>,
    Query(query): Query<ListQuery>,
) -> Response {
    match service.list(query.my_id.as_deref()).await {
        Ok(mut appointments) => {
            if let Some(raw) = query.status.as_deref() {
                let statuses = parse_status_filter(raw);
                if !statuses.is_empty() {
                    appointments.retain(|a| statuses.contains(&a.status));
                }
            }
            (StatusCode::OK, Json(appointments)).into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

/// POST /api/appointments
pub async fn create_appointment(
    State(service): State<Arc<AppointmentService>>,
    Json(req): Json<AppointmentRequest>,
) -> Response {
    match service.create(req.into()).await {
        Ok(appointment) => (StatusCode::CREATED, Json(appointment)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/appointments/:id
pub async fn get_appointment(
    State(service): State<Arc<AppointmentService>>,
    Path(id): Path<String>,
) -> Response {
    let id: AppointmentId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id_response("appointment"),
    };
    match service.get(id).await {
        Ok(appointment) => (StatusCode::OK, Json(appointment)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// PUT /api/appointments/:id
pub async fn update_appointment(
    State(service): State<Arc<AppointmentService>>,
    Path(id): Path<String>,
    Json(req): Json<AppointmentRequest>,
) -> Response {
    let id: AppointmentId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id_response("appointment"),
    };
    match service.update(id, req.into()).await {
        Ok(appointment) => (StatusCode::OK, Json(appointment)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// PATCH /api/appointments/:id
pub async fn patch_appointment(
    State(service): State<Arc<AppointmentService>>,
    Path(id): Path<String>,
    Json(req): Json<AppointmentPatchRequest>,
) -> Response {
    let id: AppointmentId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id_response("appointment"),
    };
    match service.patch(id, req.into()).await {
        Ok(appointment) => (StatusCode::OK, Json(appointment)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// DELETE /api/appointments/:id
pub async fn delete_appointment(
    State(service): State<Arc<AppointmentService>>,
    Path(id): Path<String>,
) -> Response {
    let id: AppointmentId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id_response("appointment"),
    };
    match service.delete(id).await {
        Ok(removed) => (StatusCode::OK, Json(removed)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// Appointment router, mounted at `/api/appointments`.
pub fn appointment_routes(service: Arc<AppointmentService>) -> Router {
    Router::new()
        .route("/", get(list_appointments).post(create_appointment))
        .route(
            "/:id",
            get(get_appointment)
                .put(update_appointment)
                .patch(patch_appointment)
                .delete(delete_appointment),
        )
        .with_state(service)
}

//! HTTP endpoints for users.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::application::UserService;
use crate::domain::foundation::UserId;
use crate::domain::user::{Role, UserDraft, UserStatus};

use super::error::{domain_error_response, invalid_id_response};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
    pub position: Option<String>,
    pub experience: Option<String>,
    pub image: Option<String>,
}

impl From<UserRequest> for UserDraft {
    fn from(req: UserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone: req.phone,
            role: req.role,
            status: req.status,
            position: req.position,
            experience: req.experience,
            image: req.image,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

/// GET /api/users
pub async fn list_users(
    State(service): State<Arc<UserService>>,
    Query(query): Query<ListQuery>,
) -> Response {
    match service.list(query.role).await {
        Ok(mut users) => {
            if let Some(status) = query.status {
                users.retain(|u| u.status == status);
            }
            (StatusCode::OK, Json(users)).into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

/// POST /api/users
pub async fn create_user(
    State(service): State<Arc<UserService>>,
    Json(req): Json<UserRequest>,
) -> Response {
    match service.create(req.into()).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/users/:id
pub async fn get_user(
    State(service): State<Arc<UserService>>,
    Path(id): Path<String>,
) -> Response {
    let id: UserId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id_response("user"),
    };
    match service.get(id).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// PUT /api/users/:id
pub async fn update_user(
    State(service): State<Arc<UserService>>,
    Path(id): Path<String>,
    Json(req): Json<UserRequest>,
) -> Response {
    let id: UserId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id_response("user"),
    };
    match service.update(id, req.into()).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// DELETE /api/users/:id
pub async fn delete_user(
    State(service): State<Arc<UserService>>,
    Path(id): Path<String>,
) -> Response {
    let id: UserId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id_response("user"),
    };
    match service.delete(id).await {
        Ok(removed) => (StatusCode::OK, Json(removed)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// User router, mounted at `/api/users`.
pub fn user_routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .with_state(service)
}

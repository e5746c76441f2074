//! HTTP error mapping shared by all resource endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Standard error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_FAILED", message)
    }
}

/// Maps a domain error onto the HTTP status surface.
///
/// Insufficient stock is a client error (the request asked for more
/// than exists), so it maps to 400 alongside validation failures.
pub fn domain_error_response(error: DomainError) -> Response {
    let status = match error.code {
        ErrorCode::ValidationFailed | ErrorCode::InsufficientStock => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::StorageError | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!(code = %error.code, message = %error.message, "request failed");
    }
    (
        status,
        Json(ErrorResponse::new(error.code.to_string(), error.message)),
    )
        .into_response()
}

/// 400 for an unparseable path id.
pub fn invalid_id_response(resource: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(format!("Invalid {resource} ID"))),
    )
        .into_response()
}

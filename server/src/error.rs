//! API error type and response mapping.
//!
//! The wire contract is deliberately flat: every failure — request
//! validation, configuration, upstream GitHub error — returns HTTP 400
//! with `{"success": false, "error": "..."}`. Callers of the original
//! service never saw finer-grained statuses, and the audit log is
//! where the distinction lives.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),

    #[error("{0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Sync(#[from] refsync::sync::SyncError),

    #[error("Database error: {0}")]
    Database(#[from] refsync::db::DatabaseError),
}

/// Error payload: `{"success": false, "error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

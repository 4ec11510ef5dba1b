//! Application error types.
//!
//! Externally there are two buckets: a missing session on history lookup is
//! a 404, everything else is a 500 carrying the underlying error text.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chatbot_core::chat::ChatError;
use chatbot_core::session::StoreError;
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match self {
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m),
            AppError::Internal(m) => {
                error!(detail = %m, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", m)
            }
        };
        let body = Json(ErrorResponse {
            error: code.to_string(),
            detail,
        });
        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Internal(e.to_string())
    }
}

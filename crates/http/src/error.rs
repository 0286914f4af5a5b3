//! Error handling for the bookshelf HTTP layer
//!
//! Client input problems and server failures answer with `{ "error": ... }`;
//! lookups that cannot name or find a resource answer with `{ "message": ... }`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    /// Payload failed schema validation
    #[error("validation error: {0}")]
    Validation(String),

    /// Body could not be read as the expected JSON shape
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Path identifier is not well formed
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Handler did not finish within the configured request timeout
    #[error("request timed out")]
    Timeout,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create an invalid identifier error
    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::InvalidId(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::InvalidId(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::Validation(message) | AppError::BadRequest(message) => {
                tracing::debug!(status_code = %status.as_u16(), %message, "rejected request");
                json!({ "error": message })
            }
            AppError::InvalidId(message) | AppError::NotFound(message) => {
                tracing::debug!(status_code = %status.as_u16(), %message, "lookup failed");
                json!({ "message": message })
            }
            AppError::Timeout => {
                tracing::warn!(status_code = %status.as_u16(), "request timed out");
                json!({ "error": "Request timed out" })
            }
            AppError::Internal(err) => {
                let error_id = Uuid::new_v4();
                tracing::error!(
                    error_id = %error_id,
                    status_code = %status.as_u16(),
                    error = %format!("{err:#}"),
                    "Request error"
                );

                // In production, we hide internal error details
                let message = if cfg!(not(debug_assertions)) {
                    "An internal server error occurred".to_string()
                } else {
                    err.to_string()
                };
                json!({ "error": message })
            }
        };

        (status, Json(body)).into_response()
    }
}

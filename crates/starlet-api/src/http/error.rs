//! Application error type mapping to HTTP status codes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use starlet_types::error::SessionError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// The service started without a working conversation runner.
    NotInitialized,
    /// A chat turn could not be started.
    Chat(SessionError),
    /// Session lookup or deletion failed.
    Session(SessionError),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Session(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AppError::NotInitialized => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Agent runner not initialized".to_string(),
            ),
            AppError::Chat(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to process chat request: {e}"),
            ),
            AppError::Session(e @ SessionError::NotFound { .. }) => (StatusCode::NOT_FOUND, e.to_string()),
            AppError::Session(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        if status.is_server_error() {
            tracing::error!(%status, %detail, "Request failed");
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

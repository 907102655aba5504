//! Error types for the proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

// == Store Error ==
/// Failure talking to the backing key-value store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Store could not be reached or rejected the command
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

// == Upstream Error ==
/// Failure fetching from a third-party data provider.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Provider answered with a non-2xx status
    #[error("Upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Connection, timeout or body decoding failure
    #[error("Upstream transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered 2xx with a body we cannot use
    #[error("Upstream payload malformed: {0}")]
    Payload(String),
}

// == Api Error Enum ==
/// Unified error type for route handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed request parameter
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Upstream provider failed
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Store failed during an operator action
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(format!("serialization failed: {}", err))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Upstream(err) => {
                // Provider bodies stay in the logs
                error!(error = %err, "upstream request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Upstream request failed".to_string(),
                )
            }
            ApiError::Store(err) => {
                error!(error = %err, "store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Cache store unavailable".to_string(),
                )
            }
            ApiError::Internal(msg) => {
                error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for route handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

//! Application error types for Marquee.
//!
//! Provides a unified error type that implements `IntoResponse` for Axum.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading/parsing errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Catalog service unavailable or rejecting our credentials
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limited by the catalog service
    #[error("Rate limited: retry after {0} seconds")]
    RateLimited(u32),

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (error, message) = match &self {
            AppError::Config(e) => {
                // Log full error details but don't expose to client
                tracing::error!("Config error: {:?}", e);
                ("configuration_error", None)
            }
            AppError::NotFound(resource) => ("not_found", Some(resource.clone())),
            AppError::BadRequest(msg) => ("bad_request", Some(msg.clone())),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("internal_error", None)
            }
            AppError::ServiceUnavailable(service) => {
                tracing::warn!("Service unavailable: {}", service);
                (
                    "service_unavailable",
                    Some("The movie catalog is temporarily unavailable".to_string()),
                )
            }
            AppError::RateLimited(retry_after) => {
                tracing::warn!("Rate limited, retry after {} seconds", retry_after);
                (
                    "rate_limited",
                    Some(format!("Rate limited. Retry after {} seconds", retry_after)),
                )
            }
            AppError::Timeout(operation) => {
                tracing::warn!("Timeout during: {}", operation);
                ("timeout", Some(format!("{} timed out", operation)))
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            message,
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

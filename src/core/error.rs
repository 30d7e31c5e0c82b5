//! Error type system for the Orcamentos API
//!
//! This module provides the error taxonomy used across the service with:
//! - HTTP status code mapping
//! - JSON error responses with trace IDs
//! - Environment-gated detail for server errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// When enabled (development environment), 5xx responses carry the underlying
/// error message instead of a generic one. Full detail is always logged.
static VERBOSE_ERRORS: AtomicBool = AtomicBool::new(false);

/// Toggle verbose 5xx error bodies. Called once at startup.
pub fn set_verbose_errors(enabled: bool) {
    VERBOSE_ERRORS.store(enabled, Ordering::Relaxed);
}

/// Main error type for the Orcamentos API
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Cache error: {0}")]
    Cache(String),

    /// Itemized credential validation failures, in rule order.
    #[error("Validation failed")]
    Validation(Vec<String>),

    /// Missing or unusable credentials. Deliberately generic to avoid
    /// account enumeration.
    #[error("{0}")]
    Authentication(String),

    /// A token was presented but its signature, expiry, or type marker
    /// did not check out.
    #[error("{0}")]
    InvalidToken(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Too many requests, please try again later")]
    RateLimited,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Config(_)
            | ApiError::Database(_)
            | ApiError::Cache(_)
            | ApiError::Io(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type name for API responses
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Config(_) => "ConfigError",
            ApiError::Database(_) => "DatabaseError",
            ApiError::Cache(_) => "CacheError",
            ApiError::Validation(_) => "ValidationError",
            ApiError::Authentication(_) => "AuthenticationError",
            ApiError::InvalidToken(_) => "InvalidTokenError",
            ApiError::Conflict(_) => "ConflictError",
            ApiError::RateLimited => "RateLimitExceeded",
            ApiError::NotFound(_) => "NotFound",
            ApiError::Io(_) => "IoError",
            ApiError::Internal(_) => "InternalError",
        }
    }

    /// Message suitable for the response body. Server-side failures are
    /// sanitized unless verbose errors are enabled.
    fn public_message(&self) -> String {
        if self.status_code().is_server_error() && !VERBOSE_ERRORS.load(Ordering::Relaxed) {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

/// Error response body for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Itemized sub-errors (validation), omitted otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    /// Unique trace ID for this error
    pub trace_id: String,
}

impl ErrorResponse {
    /// Build a response body from an error with a fresh trace ID
    pub fn from_error(error: &ApiError) -> Self {
        let errors = match error {
            ApiError::Validation(items) => Some(items.clone()),
            _ => None,
        };
        Self {
            success: false,
            error: error.error_type().to_string(),
            message: error.public_message(),
            errors,
            trace_id: Uuid::new_v4().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let body = ErrorResponse::from_error(&self);

        // Log the full error; the body may be sanitized.
        tracing::error!(
            error_type = self.error_type(),
            trace_id = %body.trace_id,
            status_code = %status_code,
            "Request failed: {}",
            self
        );

        (status_code, Json(body)).into_response()
    }
}

/// Result type alias for operations that can fail with ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde_json::json;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Validation Errors**: Amount bounds and malformed requests, raised before any storage call
/// - **Resource Errors**: Requested account not found
/// - **Business Logic Errors**: Withdrawals that exceed the balance
/// - **Injected Errors**: Simulated transient failures on account listing
/// - **Database Errors**: Any sqlx::Error from database operations
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// Returns HTTP 500. The underlying error is logged, never sent to clients.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Amount is zero or negative.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("{0}")]
    InvalidAmount(String),

    /// Amount is above the per-operation cap.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Amount exceeds the maximum limit of {limit}")]
    LimitExceeded { limit: Decimal },

    /// Requested account does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Account not found")]
    AccountNotFound,

    /// Account balance is lower than the requested amount.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error("Insufficient funds for this withdrawal")]
    InsufficientFunds,

    /// Simulated transient failure.
    ///
    /// Returns HTTP 503 Service Unavailable.
    #[error("{0}")]
    TransientFailure(String),

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),
}

impl AppError {
    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidAmount(_) => (StatusCode::BAD_REQUEST, "invalid_amount"),
            AppError::LimitExceeded { .. } => (StatusCode::BAD_REQUEST, "limit_exceeded"),
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            AppError::AccountNotFound => (StatusCode::NOT_FOUND, "account_not_found"),
            AppError::InsufficientFunds => {
                (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_funds")
            }
            AppError::TransientFailure(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "transient_failure")
            }
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

/// Malformed or mistyped JSON bodies.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Path segments that do not parse, e.g. a non-integer account id.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `InvalidAmount`, `LimitExceeded`, `InvalidRequest` → 400 Bad Request
/// - `AccountNotFound` → 404 Not Found
/// - `InsufficientFunds` → 422 Unprocessable Entity
/// - `TransientFailure` → 503 Service Unavailable
/// - `Database` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match self {
            AppError::Database(ref err) => {
                tracing::error!(error = %err, "database error while handling request");
                "An internal error occurred".to_string()
            }
            AppError::InvalidRequest(ref msg) => msg.clone(),
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

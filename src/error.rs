//! Error types and HTTP error response handling.
//!
//! `AppError` is the single error taxonomy shared by the ledger store, the
//! balance service and the HTTP handlers. Only the handlers translate it into
//! transport status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Caller errors**: `InvalidAmount`, `SameAccount`, `InvalidRequest`
/// - **Domain outcomes**: `InsufficientFunds`, `BalanceLimitExceeded`, `NotFound`
/// - **Infrastructure**: `Store`, wrapping any `sqlx::Error`
///
/// Nothing in the core retries; every variant is returned to the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Amount was zero or negative, above the balance limit, or had more
    /// than eight decimal places.
    #[error("Amount must be positive, within the balance limit and have at most 8 decimal places")]
    InvalidAmount,

    /// Transfer source and destination are the same user.
    #[error("Cannot transfer to the same user")]
    SameAccount,

    /// Debit precondition `balance >= amount` did not hold.
    #[error("Insufficient funds")]
    InsufficientFunds,

    /// Credit would push a balance above the largest storable value.
    #[error("Balance limit exceeded")]
    BalanceLimitExceeded,

    /// No balance row exists for the requested user.
    #[error("User not found")]
    NotFound,

    /// Storage failure (connection, transaction abort, constraint violation).
    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),

    /// Request body, path or query could not be decoded.
    #[error("Invalid request")]
    InvalidRequest(String),
}

impl AppError {
    /// HTTP status and machine-readable code for this error.
    ///
    /// - `InvalidAmount`, `SameAccount`, `InvalidRequest` → 400 Bad Request
    /// - `NotFound` → 404 Not Found
    /// - `InsufficientFunds`, `BalanceLimitExceeded` → 409 Conflict
    /// - `Store` → 500 Internal Server Error
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidAmount => (StatusCode::BAD_REQUEST, "invalid_amount"),
            AppError::SameAccount => (StatusCode::BAD_REQUEST, "same_account"),
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "user_not_found"),
            AppError::InsufficientFunds => (StatusCode::CONFLICT, "insufficient_funds"),
            AppError::BalanceLimitExceeded => (StatusCode::CONFLICT, "balance_limit_exceeded"),
            AppError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "insufficient_funds",
///     "message": "Insufficient funds"
///   }
/// }
/// ```
///
/// Store failures are logged and reported with a generic message so that
/// database details never reach the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();

        let message = match self {
            AppError::InvalidRequest(msg) => msg,
            AppError::Store(ref err) => {
                tracing::error!(error = %err, "store operation failed");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_errors_map_to_bad_request() {
        assert_eq!(AppError::InvalidAmount.status().0, StatusCode::BAD_REQUEST);
        assert_eq!(AppError::SameAccount.status().0, StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::InvalidRequest("bad body".into()).status().0,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn domain_outcomes_have_distinct_statuses() {
        assert_eq!(AppError::NotFound.status().0, StatusCode::NOT_FOUND);
        assert_eq!(AppError::InsufficientFunds.status().0, StatusCode::CONFLICT);
        assert_eq!(
            AppError::BalanceLimitExceeded.status().0,
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn store_errors_become_internal_server_error() {
        let response = AppError::Store(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

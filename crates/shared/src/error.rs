//! Application-wide error types.

use serde_json::{Value, json};
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid report parameters.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// The ledger store could not be reached.
    #[error("Ledger store unavailable: {0}")]
    StoreUnavailable(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::StoreUnavailable(_) => 503,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the JSON body sent to API clients.
    ///
    /// Database and internal details stay in the logs.
    #[must_use]
    pub fn body(&self) -> Value {
        let message = match self {
            Self::NotFound(msg) | Self::Validation(msg) => msg.clone(),
            Self::StoreUnavailable(_) => "The ledger store is unavailable".to_string(),
            Self::Database(_) | Self::Internal(_) => "An error occurred".to_string(),
        };

        json!({
            "error": self.error_code(),
            "message": message,
        })
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

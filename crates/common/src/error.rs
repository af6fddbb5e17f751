//! Error types for reclaim.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("You have already attempted to claim this item")]
    AlreadyAttempted,

    #[error("You cannot claim an item you reported as found")]
    SelfClaim,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(
        "Too early to finalize: {} day(s) and {} hour(s) remaining",
        .remaining.num_days(),
        .remaining.num_hours() % 24
    )]
    TooEarly {
        /// Time left until the competition window closes.
        remaining: chrono::Duration,
    },

    #[error("The claim window for this item has closed")]
    ClaimWindowClosed,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyAttempted
            | Self::SelfClaim
            | Self::Unauthorized(_)
            | Self::ClaimWindowClosed => StatusCode::FORBIDDEN,
            Self::TooEarly { .. } | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,

            // 5xx Server Errors
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::ExternalService(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::AlreadyAttempted => "ALREADY_ATTEMPTED",
            Self::SelfClaim => "SELF_CLAIM",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::TooEarly { .. } => "TOO_EARLY",
            Self::ClaimWindowClosed => "CLAIM_WINDOW_CLOSED",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log server errors
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_errors_map_to_forbidden() {
        assert_eq!(AppError::AlreadyAttempted.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::SelfClaim.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::ClaimWindowClosed.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn too_early_reports_remaining_time() {
        let err = AppError::TooEarly {
            remaining: chrono::Duration::hours(50),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "TOO_EARLY");
        assert_eq!(
            err.to_string(),
            "Too early to finalize: 2 day(s) and 2 hour(s) remaining"
        );
    }

    #[test]
    fn server_errors_are_flagged() {
        assert!(AppError::Database("down".into()).is_server_error());
        assert!(AppError::ExternalService("smtp".into()).is_server_error());
        assert!(!AppError::NotFound("item".into()).is_server_error());
    }
}

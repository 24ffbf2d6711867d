//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::mailer::MailerError;
use crate::services::news::NewsError;
use crate::services::plant_health::PlantHealthError;
use crate::services::verification::VerificationError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// OTP or token verification failed.
    #[error("Verification error: {0}")]
    Verification(#[from] VerificationError),

    /// Email provider call failed.
    #[error("Mailer error: {0}")]
    Mailer(#[from] MailerError),

    /// Plant health provider call failed.
    #[error("Plant health error: {0}")]
    PlantHealth(#[from] PlantHealthError),

    /// News provider call failed.
    #[error("News error: {0}")]
    News(#[from] NewsError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authenticated but not allowed to act on this resource.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// State conflict (e.g., invalid status transition).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Mailer(_) | Self::PlantHealth(_) | Self::News(_) => StatusCode::BAD_GATEWAY,
            Self::Verification(err) => match err {
                VerificationError::InvalidEmail(_) | VerificationError::InvalidCode(_) => {
                    StatusCode::BAD_REQUEST
                }
                VerificationError::CodeExpired
                | VerificationError::CodeMismatch
                | VerificationError::NoActiveCode
                | VerificationError::TokenExpired
                | VerificationError::TokenInvalid => StatusCode::BAD_REQUEST,
                VerificationError::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
                VerificationError::Mailer(_) => StatusCode::BAD_GATEWAY,
                VerificationError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    /// User-facing message. Internal detail is never exposed to clients.
    fn message(&self) -> String {
        match self {
            Self::Database(RepositoryError::NotFound) => "Resource not found".to_string(),
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Mailer(_) => "Could not send email, please try again later".to_string(),
            Self::PlantHealth(_) => "Plant identification service is unavailable".to_string(),
            Self::News(_) => "News service is unavailable".to_string(),
            Self::Verification(err) => match err {
                VerificationError::InvalidEmail(e) => e.to_string(),
                VerificationError::InvalidCode(e) => e.to_string(),
                VerificationError::CodeExpired => {
                    "Code has expired, please request a new one".to_string()
                }
                VerificationError::CodeMismatch | VerificationError::NoActiveCode => {
                    "Invalid or expired code".to_string()
                }
                VerificationError::TooManyAttempts => {
                    "Too many attempts, please request a new code".to_string()
                }
                VerificationError::TokenExpired | VerificationError::TokenInvalid => {
                    "Invalid or expired verification link".to_string()
                }
                VerificationError::Mailer(_) => {
                    "Could not send email, please try again later".to_string()
                }
                VerificationError::Repository(_) => "Internal server error".to_string(),
            },
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry; expected client errors
        // (NotFound, Conflict) stay out of the error stream
        if matches!(
            self,
            Self::Database(RepositoryError::Database(_) | RepositoryError::DataCorruption(_))
                | Self::Internal(_)
                | Self::Mailer(_)
                | Self::PlantHealth(_)
                | Self::News(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        let body = Json(json!({ "error": self.message() }));

        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("listing 123".to_string());
        assert_eq!(err.to_string(), "Not found: listing 123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Conflict("test".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_verification_error_status_codes() {
        assert_eq!(
            get_status(AppError::Verification(VerificationError::CodeExpired)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Verification(VerificationError::TooManyAttempts)),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            get_status(AppError::Verification(VerificationError::TokenInvalid)),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let err = AppError::Internal("connection pool exhausted".to_string());
        assert_eq!(err.message(), "Internal server error");
    }
}

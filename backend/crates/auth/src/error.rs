//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind, validation::ValidationErrors};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email already registered
    #[error("User already exists")]
    EmailTaken,

    /// Unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No session cookie on the request
    #[error("Session cookie missing")]
    SessionMissing,

    /// Bad signature, malformed token, unknown session or orphaned user
    #[error("Session not found")]
    SessionInvalid,

    /// Session past its expiration
    #[error("Session expired")]
    SessionExpired,

    /// Authenticated but the role may not perform the request
    #[error("Insufficient role")]
    Forbidden,

    /// Per-field request validation failures
    #[error("Request validation failed: {0}")]
    Validation(ValidationErrors),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::SessionMissing
            | AuthError::SessionInvalid
            | AuthError::SessionExpired => ErrorKind::Unauthorized,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::Validation(_) => ErrorKind::Validation,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::Forbidden => {
                tracing::warn!("Mutation attempted without ADMIN role");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            // Every session failure looks the same to the caller
            AuthError::SessionMissing | AuthError::SessionInvalid | AuthError::SessionExpired => {
                AppError::unauthorized("Unauthorized")
            }
            AuthError::Validation(errors) => errors.into(),
            AuthError::Database(e) => AppError::from(e),
            AuthError::Internal(msg) => {
                AppError::internal("Internal server error").with_source(InternalMessage(msg))
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

impl From<ValidationErrors> for AuthError {
    fn from(errors: ValidationErrors) -> Self {
        AuthError::Validation(errors)
    }
}

impl From<axum::extract::rejection::JsonRejection> for AuthError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AuthError::Validation(rejection.into())
    }
}

#[derive(Debug, Error)]
#[error("{0}")]
struct InternalMessage(String);

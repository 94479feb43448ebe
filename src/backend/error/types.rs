/**
 * Backend Error Types
 *
 * This module defines error types specific to the backend server.
 * These errors are used by the store, the comment service and the HTTP
 * handlers, and can be converted to HTTP responses.
 *
 * # Error Categories
 *
 * ## Domain Errors
 *
 * Wrapped `SharedError`s raised by the thread engine and the service:
 * - Missing articles, comments or parents (404)
 * - Malformed identifiers, blank content, cross-article replies (400)
 * - Non-author mutation attempts (403)
 *
 * ## Persistence Errors
 *
 * Any `sqlx` failure. The details are logged and the client only sees a
 * generic 500.
 *
 * ## Authentication Errors
 *
 * Missing, malformed or expired bearer tokens (401).
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::shared::SharedError;

/// Message returned to clients for any internal failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Backend-specific error types
///
/// ```rust
/// use quillpress::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g., malformed request body)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Missing or invalid bearer token
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Human-readable error message
        message: String,
    },

    /// Shared error (from the thread engine or the service)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Persistence failure
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Create a new unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `Unauthorized` - 401 Unauthorized
    /// - `SharedError` - 404, 400 or 403 depending on the shared error
    /// - `DatabaseError` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::SharedError(err) => match err {
                SharedError::NotFound { .. } => StatusCode::NOT_FOUND,
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::Forbidden { .. } => StatusCode::FORBIDDEN,
            },
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the client-facing error message
    ///
    /// Internal failures never leak their details here.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::Unauthorized { message } => message.clone(),
            Self::SharedError(err) => match err {
                SharedError::ValidationError { message, .. } => message.clone(),
                SharedError::Forbidden { message } => message.clone(),
                not_found => not_found.to_string(),
            },
            Self::DatabaseError(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }

    /// Whether this error is an internal failure rather than a client error
    pub fn is_internal(&self) -> bool {
        self.status_code().is_server_error()
    }
}

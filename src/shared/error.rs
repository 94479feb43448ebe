//! Shared Error Types
//!
//! This module defines the domain errors produced by the pure comment logic.
//! They carry no transport details; the backend maps them to HTTP statuses.
//!
//! # Error Categories
//!
//! - `NotFound` - A referenced article, comment or parent is absent
//! - `ValidationError` - Malformed input or a cross-article reply
//! - `Forbidden` - The actor may not mutate the resource
//!
//! # Usage
//!
//! ```rust
//! use quillpress::shared::error::SharedError;
//!
//! let error = SharedError::validation("content", "Comment content cannot be empty");
//! ```
use thiserror::Error;

/// Domain errors shared between the pure thread logic and the backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// A referenced entity does not exist
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up (e.g. "comment")
        resource: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// The actor is not allowed to perform the operation
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new not-found error
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }
}

/// Parse a client-supplied identifier, naming the field on failure
pub fn parse_id(field: &str, raw: &str) -> Result<uuid::Uuid, SharedError> {
    uuid::Uuid::parse_str(raw.trim())
        .map_err(|_| SharedError::validation(field, format!("'{}' is not a valid identifier", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let id = uuid::Uuid::new_v4();
        let error = SharedError::not_found("comment", id);
        match error {
            SharedError::NotFound { resource, id: value } => {
                assert_eq!(resource, "comment");
                assert_eq!(value, id.to_string());
            }
            _ => panic!("Expected NotFound"),
        }
    }

    #[test]
    fn test_validation_error() {
        let error = SharedError::validation("articleId", "Parent belongs to another article");
        match error {
            SharedError::ValidationError { field, message } => {
                assert_eq!(field, "articleId");
                assert_eq!(message, "Parent belongs to another article");
            }
            _ => panic!("Expected ValidationError"),
        }
    }

    #[test]
    fn test_error_display() {
        let error = SharedError::forbidden("Only the author can edit this comment");
        let display = format!("{}", error);
        assert!(display.contains("Forbidden"));
        assert!(display.contains("Only the author"));
    }

    #[test]
    fn test_parse_id() {
        let id = uuid::Uuid::new_v4();
        assert_eq!(parse_id("id", &id.to_string()).unwrap(), id);
        assert_eq!(parse_id("id", &format!(" {} ", id)).unwrap(), id);

        let error = parse_id("parentCommentId", "not-a-uuid").unwrap_err();
        match error {
            SharedError::ValidationError { field, .. } => assert_eq!(field, "parentCommentId"),
            _ => panic!("Expected ValidationError"),
        }
    }
}

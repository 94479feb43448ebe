//! Backend Error Module
//!
//! This module defines error types specific to the backend server.
//! These errors are used in the store, the comment service and the HTTP
//! handlers, and can be converted to HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! # HTTP Response Conversion
//!
//! All backend errors implement `IntoResponse` from Axum. The error is
//! converted to its status code and a JSON body `{ "error", "status" }`.
//! Internal failures are logged with their details and reported to the
//! client with a generic message.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;

//! Backend Module
//!
//! This module contains all server-side code for Quillpress: an Axum HTTP
//! server exposing threaded comments and article detail.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, store selection
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`comments`** - Comment service and handlers
//! - **`articles`** - Article detail handler
//! - **`store`** - `BlogStore` trait with Postgres and in-memory implementations
//! - **`auth`** - JWT creation and verification
//! - **`middleware`** - Bearer token middleware
//! - **`error`** - Backend error types and HTTP conversion
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── comments/       - Comment operations
//! ├── articles/       - Article detail
//! ├── store/          - Persistence
//! ├── auth/           - Tokens
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # Request Flow
//!
//! A request passes the trace layer, then (for protected routes) the auth
//! middleware, then a handler. Handlers call `CommentService`, which reads
//! from the store, runs `shared::thread` and writes back.
//!
//! # Error Handling
//!
//! Handlers return `Result<_, BackendError>`. `BackendError` maps domain
//! errors to 400/403/404, token failures to 401 and persistence failures to
//! a logged 500.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Comment service and handlers
pub mod comments;

/// Article detail
pub mod articles;

/// Persistence
pub mod store;

/// Token creation and verification
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use error::BackendError;
pub use server::create_app;
pub use store::{BlogStore, MemoryStore, PgStore};

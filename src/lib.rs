//! Quillpress - Blog Platform Backend Library
//!
//! Quillpress is the backend of a small blog platform. Its central piece is
//! the threaded-comment engine: comments are stored flat, with every reply
//! pointing at its root comment, and the two-level tree is rebuilt on every
//! read and after every write.
//!
//! # Module Structure
//!
//! - **`shared`** - Platform-agnostic types and pure logic
//!   - Comment, article and user records
//!   - Reply normalization and tree assembly
//!   - Shared error types and application configuration
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server, routes and handlers
//!   - Store trait with Postgres and in-memory implementations
//!   - Bearer token verification middleware
//!   - Backend error types and HTTP conversion
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the backend modules and the
//!   `quillpress-server` binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use quillpress::backend::server::create_app;
//! use quillpress::backend::store::MemoryStore;
//! use quillpress::shared::AppConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::builder().jwt_secret("dev-secret").build()?;
//! let app = create_app(config, Arc::new(MemoryStore::new()));
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```

/// Shared types, pure thread logic and configuration
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;

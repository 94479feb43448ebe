//! Routes Module
//!
//! HTTP route configuration for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation and layering
//! └── api_routes.rs   - Comment and article API routes
//! ```

/// Main router creation
pub mod router;

/// API route configuration
pub mod api_routes;

pub use router::create_router;

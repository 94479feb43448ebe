//! Server Module
//!
//! Server-side code for initializing and configuring the Axum HTTP server.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState
//! ├── config.rs       - Database connection and store selection
//! └── init.rs         - App creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `AppConfig::load` reads file and environment
//! 2. **Store Selection**: `load_store` picks Postgres or the in-memory store
//! 3. **Router Creation**: `create_app` builds state, routes and middleware
//!
//! # Example
//!
//! ```rust,no_run
//! use quillpress::backend::server::{config::load_store, create_app};
//! use quillpress::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let store = load_store(&config).await?;
//! let app = create_app(config, store);
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use init::create_app;
pub use state::AppState;

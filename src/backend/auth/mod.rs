//! Authentication Module
//!
//! Bearer token handling. Users sign in elsewhere; this server verifies the
//! HS256 tokens they present and resolves them to a stored user.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! └── sessions.rs     - JWT token creation and verification
//! ```
//!
//! The request-side check lives in `backend::middleware::auth`.

/// JWT token creation and validation
pub mod sessions;

pub use sessions::{create_token, verify_token, Claims};

//! Comments Module
//!
//! Threaded comments on articles.
//!
//! # Module Structure
//!
//! ```text
//! comments/
//! ├── mod.rs          - Module exports
//! ├── service.rs      - Operations over the store (create, list, update, delete, admin list)
//! └── handlers.rs     - Axum handlers
//! ```
//!
//! The tree logic itself is in `shared::thread`; this module feeds it records
//! and persists the results.

/// Comment operations
pub mod service;

/// HTTP handlers
pub mod handlers;

pub use handlers::{
    admin_list_comments, create_comment, delete_comment, get_article_comments, update_comment,
};
pub use service::{Actor, CommentService};

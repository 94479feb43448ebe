//! Blog Store
//!
//! Persistence seam for comments and the collaborator records they depend on.
//!
//! # Implementations
//!
//! - **`postgres`** - `PgStore`, backed by `sqlx` and the schema in
//!   `migrations/`
//! - **`memory`** - `MemoryStore`, a `tokio::sync::RwLock` over hash maps,
//!   used when no database is configured and in tests
//!
//! Handlers only ever see `Arc<dyn BlogStore>`.
//!
//! # Ordering
//!
//! Every list of comments a store returns is ordered by `(created_at, id)`,
//! ascending unless stated otherwise.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::shared::{Article, AuthorProfile, Comment, User};

/// PostgreSQL store
pub mod postgres;

/// In-memory store
pub mod memory;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Result type for store operations
pub type StoreResult<T> = Result<T, BackendError>;

/// One page of the admin comment search
#[derive(Debug, Clone, Default)]
pub struct CommentPage {
    /// Matching comments, newest first
    pub comments: Vec<Comment>,
    /// Number of matches across all pages
    pub total: u64,
}

/// Storage operations used by the comment service
#[async_trait]
pub trait BlogStore: Send + Sync {
    /// Fetch one comment
    async fn get_comment(&self, id: Uuid) -> StoreResult<Option<Comment>>;

    /// Write a new comment and append its id to the owning article's
    /// `comment_ids`, atomically
    async fn insert_comment(&self, comment: &Comment) -> StoreResult<()>;

    /// Replace a comment's content, returning the updated record
    async fn update_comment_content(&self, id: Uuid, content: &str) -> StoreResult<Option<Comment>>;

    /// Delete a comment and remove its id from the owning article's
    /// `comment_ids`. Replies are left untouched.
    ///
    /// Returns `false` if the comment was already gone.
    async fn delete_comment(&self, comment: &Comment) -> StoreResult<bool>;

    /// All comments of an article, roots and replies alike
    async fn comments_for_article(&self, article_id: Uuid) -> StoreResult<Vec<Comment>>;

    /// Comments whose stored parent is `root_id`
    async fn thread_replies(&self, root_id: Uuid) -> StoreResult<Vec<Comment>>;

    /// Case-insensitive substring search on content, newest first.
    /// `page` is one-based.
    async fn search_comments(
        &self,
        keyword: Option<&str>,
        page: u32,
        limit: u32,
    ) -> StoreResult<CommentPage>;

    /// Fetch one article
    async fn get_article(&self, id: Uuid) -> StoreResult<Option<Article>>;

    /// Fetch one user
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Public profiles for the given users. Unknown ids are absent from the map.
    async fn author_profiles(&self, ids: &[Uuid]) -> StoreResult<HashMap<Uuid, AuthorProfile>>;
}

/// Row offset of a one-based page
pub(crate) fn page_offset(page: u32, limit: u32) -> u64 {
    u64::from(page.max(1) - 1) * u64::from(limit)
}

//! Comment Data Structures
//!
//! Stored comment records and the nested views returned to clients.
//!
//! A stored [`Comment`] is flat. Its `parent_comment_id` is either `None`
//! (a root comment) or the id of a root comment, never the id of another
//! reply. The comment a user actually clicked "reply" on is kept separately
//! in `reply_to_comment_id`, and only when it differs from the root.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::article::ArticleSummary;
use crate::shared::user::AuthorProfile;

/// A comment or reply as persisted by the store
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique comment ID, immutable
    pub id: Uuid,
    /// Text body, editable by the author only
    pub content: String,
    /// Owning article, immutable
    pub article_id: Uuid,
    /// Author of the comment
    pub author_id: Uuid,
    /// Author avatar captured when the comment was created.
    ///
    /// This is a point-in-time copy and intentionally does not follow later
    /// profile changes. The live profile is attached separately on read.
    pub author_avatar: Option<String>,
    /// Root comment this reply belongs to, `None` for root comments
    pub parent_comment_id: Option<Uuid>,
    /// Comment this reply was addressed to when it is not the root itself
    pub reply_to_comment_id: Option<Uuid>,
    /// Creation time, used for ordering
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Whether this comment is top-level in its thread
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent_comment_id.is_none()
    }

    /// Id of the root of the thread this comment belongs to
    #[inline]
    pub fn root_id(&self) -> Uuid {
        self.parent_comment_id.unwrap_or(self.id)
    }

    /// Ordering key: creation time, ties broken by id
    #[inline]
    pub fn sort_key(&self) -> (DateTime<Utc>, Uuid) {
        (self.created_at, self.id)
    }
}

/// Flat client view of a comment, with the author's public profile attached
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub content: String,
    pub article_id: Uuid,
    /// Current public profile of the author, `None` if the user is gone
    pub author: Option<AuthorProfile>,
    /// Avatar snapshot stored with the comment
    pub author_avatar: Option<String>,
    pub parent_comment_id: Option<Uuid>,
    pub reply_to_comment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl CommentView {
    /// Build a view from a stored comment and an optional author profile
    pub fn from_comment(comment: &Comment, author: Option<AuthorProfile>) -> Self {
        Self {
            id: comment.id,
            content: comment.content.clone(),
            article_id: comment.article_id,
            author,
            author_avatar: comment.author_avatar.clone(),
            parent_comment_id: comment.parent_comment_id,
            reply_to_comment_id: comment.reply_to_comment_id,
            created_at: comment.created_at,
        }
    }
}

/// A reply inside a thread, annotated with the comment it answers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReplyNode {
    #[serde(flatten)]
    pub comment: CommentView,
    /// The comment this reply is conversationally addressed to
    pub reply_to: CommentView,
}

/// A root comment with its chronologically ordered replies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThreadNode {
    #[serde(flatten)]
    pub comment: CommentView,
    pub replies: Vec<ReplyNode>,
}

/// Create comment request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: String,
    pub article_id: String,
    /// Comment the user is replying to, absent for a root comment
    #[serde(default)]
    pub parent_comment_id: Option<String>,
}

/// Update comment request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    pub content: String,
}

/// Response for create and update: a message plus the whole thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentThreadResponse {
    pub message: String,
    pub comment: ThreadNode,
}

/// Confirmation-only response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Query parameters for the admin comment listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminCommentQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub keyword: Option<String>,
}

impl AdminCommentQuery {
    /// One-based page number, at least 1
    #[inline]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size, clamped to 1..=100
    #[inline]
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }

    /// Trimmed keyword, `None` when blank
    pub fn keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// Pagination block of the admin listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn new(total: u64, current_page: u32, limit: u32) -> Self {
        let limit_u64 = u64::from(limit.max(1));
        Self {
            total,
            total_pages: total.div_ceil(limit_u64),
            current_page,
            limit,
        }
    }
}

/// One row of the admin listing: the comment plus where it sits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminCommentRow {
    #[serde(flatten)]
    pub comment: CommentView,
    /// Owning article, `None` if it was removed
    pub article: Option<ArticleSummary>,
    /// Thread root of a reply, with its author's profile
    pub parent_comment: Option<CommentView>,
}

/// Admin comment listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCommentList {
    pub comments: Vec<AdminCommentRow>,
    pub pagination: Pagination,
}

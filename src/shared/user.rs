//! User Data Structures
//!
//! The blog's user records, as far as comments need them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub avatar: Option<String>,
    /// Blog owner flag, required for the admin comment listing
    pub is_author: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a regular (non-author) user
    pub fn new(username: impl Into<String>, avatar: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            avatar,
            is_author: false,
            created_at: Utc::now(),
        }
    }

    /// Mark this user as the blog author
    pub fn with_author(mut self, is_author: bool) -> Self {
        self.is_author = is_author;
        self
    }

    /// Public projection used for comment attribution
    pub fn profile(&self) -> AuthorProfile {
        AuthorProfile {
            id: self.id,
            username: self.username.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Public profile attached to comment views
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorProfile {
    pub id: Uuid,
    pub username: String,
    pub avatar: Option<String>,
}

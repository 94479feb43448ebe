//! Article Data Structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::comment::ThreadNode;

/// A published article
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    /// Secondary index of the article's comments.
    ///
    /// Not authoritative: a comment belongs to the article named by its own
    /// `article_id`, whatever this list says.
    pub comment_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Article {
    pub fn new(title: impl Into<String>, content: impl Into<String>, author_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            author_id,
            comment_ids: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Id and title of an article, attached to admin comment rows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: Uuid,
    pub title: String,
}

impl From<&Article> for ArticleSummary {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
        }
    }
}

/// Article detail with its comment tree, oldest thread first
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub article: Article,
    pub comments: Vec<ThreadNode>,
}

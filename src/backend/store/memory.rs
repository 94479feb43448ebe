//! In-memory `BlogStore`
//!
//! All maps sit behind one `RwLock`, so a comment write and the matching
//! article index update are observed together.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::store::{page_offset, BlogStore, CommentPage, StoreResult};
use crate::shared::{Article, AuthorProfile, Comment, User};

#[derive(Debug, Default)]
struct MemoryData {
    users: HashMap<Uuid, User>,
    articles: HashMap<Uuid, Article>,
    comments: HashMap<Uuid, Comment>,
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<MemoryData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user
    pub async fn insert_user(&self, user: User) {
        self.data.write().await.users.insert(user.id, user);
    }

    /// Seed an article
    pub async fn insert_article(&self, article: Article) {
        self.data.write().await.articles.insert(article.id, article);
    }
}

fn sorted(mut comments: Vec<Comment>) -> Vec<Comment> {
    comments.sort_by_key(|c| c.sort_key());
    comments
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn get_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        Ok(self.data.read().await.comments.get(&id).cloned())
    }

    async fn insert_comment(&self, comment: &Comment) -> StoreResult<()> {
        let mut data = self.data.write().await;
        if let Some(article) = data.articles.get_mut(&comment.article_id) {
            article.comment_ids.push(comment.id);
        }
        data.comments.insert(comment.id, comment.clone());
        Ok(())
    }

    async fn update_comment_content(&self, id: Uuid, content: &str) -> StoreResult<Option<Comment>> {
        let mut data = self.data.write().await;
        Ok(data.comments.get_mut(&id).map(|comment| {
            comment.content = content.to_string();
            comment.clone()
        }))
    }

    async fn delete_comment(&self, comment: &Comment) -> StoreResult<bool> {
        let mut data = self.data.write().await;
        let removed = data.comments.remove(&comment.id).is_some();
        if let Some(article) = data.articles.get_mut(&comment.article_id) {
            article.comment_ids.retain(|id| *id != comment.id);
        }
        Ok(removed)
    }

    async fn comments_for_article(&self, article_id: Uuid) -> StoreResult<Vec<Comment>> {
        let data = self.data.read().await;
        Ok(sorted(
            data.comments
                .values()
                .filter(|c| c.article_id == article_id)
                .cloned()
                .collect(),
        ))
    }

    async fn thread_replies(&self, root_id: Uuid) -> StoreResult<Vec<Comment>> {
        let data = self.data.read().await;
        Ok(sorted(
            data.comments
                .values()
                .filter(|c| c.parent_comment_id == Some(root_id))
                .cloned()
                .collect(),
        ))
    }

    async fn search_comments(
        &self,
        keyword: Option<&str>,
        page: u32,
        limit: u32,
    ) -> StoreResult<CommentPage> {
        let needle = keyword.map(str::to_lowercase);
        let data = self.data.read().await;

        let mut matches: Vec<Comment> = data
            .comments
            .values()
            .filter(|c| match &needle {
                Some(needle) => c.content.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        matches.sort_by_key(|c| std::cmp::Reverse(c.sort_key()));

        let total = matches.len() as u64;
        let offset = usize::try_from(page_offset(page, limit)).unwrap_or(usize::MAX);
        let comments = matches
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .collect();

        Ok(CommentPage { comments, total })
    }

    async fn get_article(&self, id: Uuid) -> StoreResult<Option<Article>> {
        Ok(self.data.read().await.articles.get(&id).cloned())
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.data.read().await.users.get(&id).cloned())
    }

    async fn author_profiles(&self, ids: &[Uuid]) -> StoreResult<HashMap<Uuid, AuthorProfile>> {
        let data = self.data.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| data.users.get(id))
            .map(|user| (user.id, user.profile()))
            .collect())
    }
}

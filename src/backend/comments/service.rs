//! Comment Service
//!
//! Orchestrates the comment operations over a [`BlogStore`]: validate the
//! input, apply the normalization rule, persist, then assemble the thread the
//! caller gets back.
//!
//! Authorization decisions that depend on stored data (author checks, the
//! admin flag) are made here. Token verification happens earlier in the
//! middleware.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use axum::extract::FromRef;
use chrono::Utc;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::backend::store::{BlogStore, StoreResult};
use crate::shared::comment::{
    AdminCommentList, AdminCommentQuery, AdminCommentRow, CreateCommentRequest, Pagination,
};
use crate::shared::error::parse_id;
use crate::shared::thread::{assemble_article, assemble_thread, normalize, RootOrder};
use crate::shared::{
    ArticleDetail, ArticleSummary, AuthorProfile, Comment, CommentView, SharedError, ThreadNode,
};

/// Acting user, as resolved by the auth middleware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub is_author: bool,
}

/// Comment operations
#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn BlogStore>,
}

impl FromRef<AppState> for CommentService {
    fn from_ref(app_state: &AppState) -> Self {
        Self::new(app_state.store.clone())
    }
}

fn validate_content(content: &str) -> Result<String, SharedError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(SharedError::validation("content", "Comment content cannot be empty"));
    }
    Ok(trimmed.to_string())
}

impl CommentService {
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self { store }
    }

    /// Create a root comment or a reply and return the thread it landed in
    pub async fn create(&self, actor: Actor, request: CreateCommentRequest) -> StoreResult<ThreadNode> {
        let content = validate_content(&request.content)?;
        let article_id = parse_id("articleId", &request.article_id)?;
        let requested_parent = request
            .parent_comment_id
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| parse_id("parentCommentId", raw))
            .transpose()?;

        if self.store.get_article(article_id).await?.is_none() {
            tracing::warn!(%article_id, "Comment rejected: article not found");
            return Err(SharedError::not_found("article", article_id).into());
        }

        let target = match requested_parent {
            Some(parent_id) => self.store.get_comment(parent_id).await?,
            None => None,
        };
        let link = normalize(article_id, requested_parent, target.as_ref()).inspect_err(|e| {
            tracing::warn!(%article_id, error = %e, "Comment rejected by normalization");
        })?;

        // A reply to an orphaned or misfiled reply would land in a thread nobody can see
        let root = match link.parent_comment_id {
            Some(root_id) if Some(root_id) == requested_parent => target.clone(),
            Some(root_id) => self.store.get_comment(root_id).await?.filter(Comment::is_root),
            None => None,
        };
        if let (Some(root_id), None) = (link.parent_comment_id, &root) {
            tracing::warn!(%root_id, "Comment rejected: thread root no longer exists");
            return Err(SharedError::not_found("parent comment", root_id).into());
        }

        let author_avatar = self
            .store
            .get_user(actor.user_id)
            .await?
            .and_then(|user| user.avatar);

        let comment = Comment {
            id: Uuid::new_v4(),
            content,
            article_id,
            author_id: actor.user_id,
            author_avatar,
            parent_comment_id: link.parent_comment_id,
            reply_to_comment_id: link.reply_to_comment_id,
            created_at: Utc::now(),
        };
        self.store.insert_comment(&comment).await?;

        tracing::info!(
            comment_id = %comment.id,
            %article_id,
            parent_id = ?comment.parent_comment_id,
            "Comment created"
        );

        match root {
            Some(root) => self.thread_of(&root).await,
            None => self.thread_of(&comment).await,
        }
    }

    /// All threads of an article, newest thread first
    pub async fn list_for_article(&self, article_id: &str) -> StoreResult<Vec<ThreadNode>> {
        let article_id = parse_id("articleId", article_id)?;
        let comments = self.store.comments_for_article(article_id).await?;
        let profiles = self.profiles_for(&comments).await?;
        Ok(assemble_article(&comments, &profiles, RootOrder::NewestFirst))
    }

    /// Article with its threads, oldest thread first
    pub async fn article_detail(&self, article_id: &str) -> StoreResult<ArticleDetail> {
        let article_id = parse_id("id", article_id)?;
        let article = self
            .store
            .get_article(article_id)
            .await?
            .ok_or_else(|| SharedError::not_found("article", article_id))?;

        let comments = self.store.comments_for_article(article_id).await?;
        let profiles = self.profiles_for(&comments).await?;
        Ok(ArticleDetail {
            article,
            comments: assemble_article(&comments, &profiles, RootOrder::OldestFirst),
        })
    }

    /// Replace a comment's content and return its thread
    pub async fn update(&self, actor: Actor, comment_id: &str, content: &str) -> StoreResult<ThreadNode> {
        let comment_id = parse_id("id", comment_id)?;
        let content = validate_content(content)?;
        let existing = self.owned_comment(actor, comment_id, "edit").await?;

        let root = match existing.parent_comment_id {
            None => None,
            Some(root_id) => Some(
                self.store
                    .get_comment(root_id)
                    .await?
                    .filter(Comment::is_root)
                    .ok_or_else(|| SharedError::not_found("parent comment", root_id))?,
            ),
        };

        let updated = self
            .store
            .update_comment_content(comment_id, &content)
            .await?
            .ok_or_else(|| SharedError::not_found("comment", comment_id))?;

        tracing::info!(%comment_id, "Comment updated");

        match root {
            Some(root) => self.thread_of(&root).await,
            None => self.thread_of(&updated).await,
        }
    }

    /// Delete a comment. Its replies, if any, are kept and hidden.
    pub async fn delete(&self, actor: Actor, comment_id: &str) -> StoreResult<()> {
        let comment_id = parse_id("id", comment_id)?;
        let existing = self.owned_comment(actor, comment_id, "delete").await?;

        if !self.store.delete_comment(&existing).await? {
            return Err(SharedError::not_found("comment", comment_id).into());
        }

        tracing::info!(%comment_id, article_id = %existing.article_id, "Comment deleted");
        Ok(())
    }

    /// Paginated keyword search over all comments, for the blog author
    pub async fn admin_list(&self, actor: Actor, query: &AdminCommentQuery) -> StoreResult<AdminCommentList> {
        if !actor.is_author {
            tracing::warn!(user_id = %actor.user_id, "Admin comment listing denied");
            return Err(SharedError::forbidden("Only the blog author can list all comments").into());
        }

        let page = query.page();
        let limit = query.limit();
        let result = self.store.search_comments(query.keyword(), page, limit).await?;

        let mut articles: HashMap<Uuid, ArticleSummary> = HashMap::new();
        let mut parents: HashMap<Uuid, Comment> = HashMap::new();
        for comment in &result.comments {
            if !articles.contains_key(&comment.article_id) {
                if let Some(article) = self.store.get_article(comment.article_id).await? {
                    articles.insert(article.id, ArticleSummary::from(&article));
                }
            }
            if let Some(parent_id) = comment.parent_comment_id {
                if !parents.contains_key(&parent_id) {
                    if let Some(parent) = self.store.get_comment(parent_id).await? {
                        parents.insert(parent_id, parent);
                    }
                }
            }
        }

        let mut profiled: Vec<Comment> = parents.values().cloned().collect();
        profiled.extend(result.comments.iter().cloned());
        let profiles = self.profiles_for(&profiled).await?;
        let view = |c: &Comment| CommentView::from_comment(c, profiles.get(&c.author_id).cloned());

        let comments = result
            .comments
            .iter()
            .map(|c| AdminCommentRow {
                comment: view(c),
                article: articles.get(&c.article_id).cloned(),
                parent_comment: c.parent_comment_id.and_then(|id| parents.get(&id)).map(view),
            })
            .collect();

        Ok(AdminCommentList {
            comments,
            pagination: Pagination::new(result.total, page, limit),
        })
    }

    async fn owned_comment(&self, actor: Actor, comment_id: Uuid, action: &str) -> StoreResult<Comment> {
        let comment = self
            .store
            .get_comment(comment_id)
            .await?
            .ok_or_else(|| SharedError::not_found("comment", comment_id))?;

        if comment.author_id != actor.user_id {
            tracing::warn!(%comment_id, user_id = %actor.user_id, action, "Comment mutation denied");
            return Err(SharedError::forbidden(format!("Only the author can {} this comment", action)).into());
        }
        Ok(comment)
    }

    async fn thread_of(&self, root: &Comment) -> StoreResult<ThreadNode> {
        let replies = self.store.thread_replies(root.id).await?;
        let mut all = Vec::with_capacity(replies.len() + 1);
        all.push(root.clone());
        all.extend(replies.iter().cloned());

        let profiles = self.profiles_for(&all).await?;
        Ok(assemble_thread(root, &replies, &profiles))
    }

    async fn profiles_for(&self, comments: &[Comment]) -> Result<HashMap<Uuid, AuthorProfile>, BackendError> {
        let ids: Vec<Uuid> = comments
            .iter()
            .map(|c| c.author_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        self.store.author_profiles(&ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use crate::backend::store::MemoryStore;
    use crate::shared::{Article, User};

    struct Fixture {
        service: CommentService,
        store: Arc<MemoryStore>,
        article: Article,
        u1: User,
        u2: User,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let u1 = User::new("u1", Some("/avatars/u1.png".to_string()));
        let u2 = User::new("u2", None).with_author(true);
        let article = Article::new("A1", "Body", u2.id);
        store.insert_user(u1.clone()).await;
        store.insert_user(u2.clone()).await;
        store.insert_article(article.clone()).await;

        Fixture {
            service: CommentService::new(store.clone()),
            store,
            article,
            u1,
            u2,
        }
    }

    fn actor(user: &User) -> Actor {
        Actor {
            user_id: user.id,
            is_author: user.is_author,
        }
    }

    fn request(article: &Article, content: &str, parent: Option<Uuid>) -> CreateCommentRequest {
        CreateCommentRequest {
            content: content.to_string(),
            article_id: article.id.to_string(),
            parent_comment_id: parent.map(|id| id.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_root_snapshots_avatar() {
        let f = fixture().await;
        let node = f
            .service
            .create(actor(&f.u1), request(&f.article, "  Hello  ", None))
            .await
            .unwrap();

        assert_eq!(node.comment.content, "Hello");
        assert_eq!(node.comment.author_avatar.as_deref(), Some("/avatars/u1.png"));
        assert_eq!(node.comment.author, Some(f.u1.profile()));
        assert!(node.replies.is_empty());

        let article = f.store.get_article(f.article.id).await.unwrap().unwrap();
        assert_eq!(article.comment_ids, vec![node.comment.id]);
    }

    #[tokio::test]
    async fn test_reply_chain_collapses_onto_root() {
        let f = fixture().await;
        let hello = f
            .service
            .create(actor(&f.u1), request(&f.article, "Hello", None))
            .await
            .unwrap();
        let hi_back = f
            .service
            .create(actor(&f.u2), request(&f.article, "Hi back", Some(hello.comment.id)))
            .await
            .unwrap();
        assert_eq!(hi_back.comment.id, hello.comment.id);
        let hi_back_id = hi_back.replies[0].comment.id;

        let thread = f
            .service
            .create(actor(&f.u1), request(&f.article, "Nice", Some(hi_back_id)))
            .await
            .unwrap();

        assert_eq!(thread.comment.id, hello.comment.id);
        assert_eq!(thread.replies.len(), 2);
        let nice = &thread.replies[1];
        assert_eq!(nice.comment.content, "Nice");
        assert_eq!(nice.comment.parent_comment_id, Some(hello.comment.id));
        assert_eq!(nice.reply_to.id, hi_back_id);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_content_and_bad_ids() {
        let f = fixture().await;
        let err = f
            .service
            .create(actor(&f.u1), request(&f.article, "   ", None))
            .await
            .unwrap_err();
        assert_matches!(err, BackendError::SharedError(SharedError::ValidationError { field, .. }) if field == "content");

        let mut bad = request(&f.article, "text", None);
        bad.parent_comment_id = Some("nope".to_string());
        let err = f.service.create(actor(&f.u1), bad).await.unwrap_err();
        assert_matches!(err, BackendError::SharedError(SharedError::ValidationError { field, .. }) if field == "parentCommentId");
    }

    #[tokio::test]
    async fn test_create_on_missing_article() {
        let f = fixture().await;
        let ghost = Article::new("ghost", "", f.u1.id);
        let err = f
            .service
            .create(actor(&f.u1), request(&ghost, "text", None))
            .await
            .unwrap_err();
        assert_matches!(err, BackendError::SharedError(SharedError::NotFound { resource: "article", .. }));
    }

    #[tokio::test]
    async fn test_cross_article_reply_creates_nothing() {
        let f = fixture().await;
        let other = Article::new("A2", "", f.u2.id);
        f.store.insert_article(other.clone()).await;

        let root = f
            .service
            .create(actor(&f.u1), request(&other, "Elsewhere", None))
            .await
            .unwrap();
        let err = f
            .service
            .create(actor(&f.u1), request(&f.article, "Sneaky", Some(root.comment.id)))
            .await
            .unwrap_err();
        assert_matches!(err, BackendError::SharedError(SharedError::ValidationError { .. }));
        assert!(f.store.comments_for_article(f.article.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reply_into_orphaned_thread_is_rejected() {
        let f = fixture().await;
        let root = f
            .service
            .create(actor(&f.u1), request(&f.article, "Root", None))
            .await
            .unwrap();
        let thread = f
            .service
            .create(actor(&f.u2), request(&f.article, "Reply", Some(root.comment.id)))
            .await
            .unwrap();
        let reply_id = thread.replies[0].comment.id;

        f.service.delete(actor(&f.u1), &root.comment.id.to_string()).await.unwrap();

        let err = f
            .service
            .create(actor(&f.u1), request(&f.article, "Late", Some(reply_id)))
            .await
            .unwrap_err();
        assert_matches!(err, BackendError::SharedError(SharedError::NotFound { .. }));

        let err = f
            .service
            .update(actor(&f.u2), &reply_id.to_string(), "edited")
            .await
            .unwrap_err();
        assert_matches!(err, BackendError::SharedError(SharedError::NotFound { .. }));
        let untouched = f.store.get_comment(reply_id).await.unwrap().unwrap();
        assert_eq!(untouched.content, "Reply");
    }

    #[tokio::test]
    async fn test_reply_under_misfiled_reply_is_rejected() {
        let f = fixture().await;
        let root = f
            .service
            .create(actor(&f.u1), request(&f.article, "Root", None))
            .await
            .unwrap();
        let thread = f
            .service
            .create(actor(&f.u2), request(&f.article, "Reply", Some(root.comment.id)))
            .await
            .unwrap();
        let reply_id = thread.replies[0].comment.id;

        // Imported record whose parent is a reply rather than a root
        let misfiled = Comment {
            id: Uuid::new_v4(),
            content: "Misfiled".to_string(),
            article_id: f.article.id,
            author_id: f.u1.id,
            author_avatar: None,
            parent_comment_id: Some(reply_id),
            reply_to_comment_id: None,
            created_at: Utc::now(),
        };
        f.store.insert_comment(&misfiled).await.unwrap();

        let err = f
            .service
            .create(actor(&f.u2), request(&f.article, "Lost", Some(misfiled.id)))
            .await
            .unwrap_err();
        assert_matches!(err, BackendError::SharedError(SharedError::NotFound { resource: "parent comment", .. }));

        let stored = f.store.comments_for_article(f.article.id).await.unwrap();
        assert_eq!(stored.len(), 3);
        assert!(stored.iter().all(|c| c.content != "Lost"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_replies_keep_every_index_entry() {
        const REPLIES: usize = 32;

        let f = fixture().await;
        let root = f
            .service
            .create(actor(&f.u1), request(&f.article, "Root", None))
            .await
            .unwrap();

        let tasks: Vec<_> = (0..REPLIES)
            .map(|i| {
                let service = f.service.clone();
                let author = actor(if i % 2 == 0 { &f.u1 } else { &f.u2 });
                let body = request(&f.article, &format!("Reply {}", i), Some(root.comment.id));
                tokio::spawn(async move { service.create(author, body).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let article = f.store.get_article(f.article.id).await.unwrap().unwrap();
        assert_eq!(article.comment_ids.len(), REPLIES + 1);
        let unique: BTreeSet<Uuid> = article.comment_ids.iter().copied().collect();
        assert_eq!(unique.len(), REPLIES + 1);

        let threads = f.service.list_for_article(&f.article.id.to_string()).await.unwrap();
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].comment.id, root.comment.id);
        assert_eq!(threads[0].replies.len(), REPLIES);
        assert!(threads[0].replies.iter().all(|r| r.reply_to.id == root.comment.id));
    }

    #[tokio::test]
    async fn test_update_returns_whole_thread() {
        let f = fixture().await;
        let root = f
            .service
            .create(actor(&f.u1), request(&f.article, "Root", None))
            .await
            .unwrap();
        let thread = f
            .service
            .create(actor(&f.u2), request(&f.article, "Typo", Some(root.comment.id)))
            .await
            .unwrap();
        let reply_id = thread.replies[0].comment.id;

        let updated = f
            .service
            .update(actor(&f.u2), &reply_id.to_string(), "Fixed")
            .await
            .unwrap();
        assert_eq!(updated.comment.id, root.comment.id);
        assert_eq!(updated.replies[0].comment.content, "Fixed");
        assert_eq!(updated.replies[0].comment.parent_comment_id, Some(root.comment.id));
    }

    #[tokio::test]
    async fn test_only_author_may_mutate() {
        let f = fixture().await;
        let root = f
            .service
            .create(actor(&f.u1), request(&f.article, "Mine", None))
            .await
            .unwrap();
        let id = root.comment.id.to_string();

        let err = f.service.update(actor(&f.u2), &id, "Yours").await.unwrap_err();
        assert_matches!(err, BackendError::SharedError(SharedError::Forbidden { .. }));

        let err = f.service.delete(actor(&f.u2), &id).await.unwrap_err();
        assert_matches!(err, BackendError::SharedError(SharedError::Forbidden { .. }));
        assert!(f.store.get_comment(root.comment.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_root_hides_replies() {
        let f = fixture().await;
        let root = f
            .service
            .create(actor(&f.u1), request(&f.article, "Root", None))
            .await
            .unwrap();
        f.service
            .create(actor(&f.u2), request(&f.article, "Reply", Some(root.comment.id)))
            .await
            .unwrap();
        let other = f
            .service
            .create(actor(&f.u2), request(&f.article, "Other", None))
            .await
            .unwrap();

        f.service.delete(actor(&f.u1), &root.comment.id.to_string()).await.unwrap();

        let threads = f.service.list_for_article(&f.article.id.to_string()).await.unwrap();
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].comment.id, other.comment.id);

        let article = f.store.get_article(f.article.id).await.unwrap().unwrap();
        assert!(!article.comment_ids.contains(&root.comment.id));
        assert_eq!(f.store.comments_for_article(f.article.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_article_detail_orders_oldest_first() {
        let f = fixture().await;
        let first = f
            .service
            .create(actor(&f.u1), request(&f.article, "First", None))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = f
            .service
            .create(actor(&f.u1), request(&f.article, "Second", None))
            .await
            .unwrap();

        let detail = f.service.article_detail(&f.article.id.to_string()).await.unwrap();
        let ids: Vec<Uuid> = detail.comments.iter().map(|n| n.comment.id).collect();
        assert_eq!(ids, vec![first.comment.id, second.comment.id]);

        let listing = f.service.list_for_article(&f.article.id.to_string()).await.unwrap();
        let ids: Vec<Uuid> = listing.iter().map(|n| n.comment.id).collect();
        assert_eq!(ids, vec![second.comment.id, first.comment.id]);
    }

    #[tokio::test]
    async fn test_admin_list_requires_author() {
        let f = fixture().await;
        f.service
            .create(actor(&f.u1), request(&f.article, "Great read", None))
            .await
            .unwrap();

        let err = f
            .service
            .admin_list(actor(&f.u1), &AdminCommentQuery::default())
            .await
            .unwrap_err();
        assert_matches!(err, BackendError::SharedError(SharedError::Forbidden { .. }));

        let query = AdminCommentQuery {
            keyword: Some("GREAT".to_string()),
            ..Default::default()
        };
        let list = f.service.admin_list(actor(&f.u2), &query).await.unwrap();
        assert_eq!(list.pagination, Pagination::new(1, 1, 10));
        assert_eq!(list.comments[0].comment.author, Some(f.u1.profile()));
    }

    #[tokio::test]
    async fn test_admin_rows_carry_article_and_parent() {
        let f = fixture().await;
        let root = f
            .service
            .create(actor(&f.u1), request(&f.article, "Root", None))
            .await
            .unwrap();
        let thread = f
            .service
            .create(actor(&f.u2), request(&f.article, "Reply", Some(root.comment.id)))
            .await
            .unwrap();
        let reply_id = thread.replies[0].comment.id;

        let list = f
            .service
            .admin_list(actor(&f.u2), &AdminCommentQuery::default())
            .await
            .unwrap();
        assert_eq!(list.comments.len(), 2);

        let summary = ArticleSummary::from(&f.article);
        assert!(list.comments.iter().all(|row| row.article.as_ref() == Some(&summary)));

        let root_row = list.comments.iter().find(|row| row.comment.id == root.comment.id).unwrap();
        assert_eq!(root_row.parent_comment, None);

        let reply_row = list.comments.iter().find(|row| row.comment.id == reply_id).unwrap();
        let parent = reply_row.parent_comment.as_ref().unwrap();
        assert_eq!(parent.id, root.comment.id);
        assert_eq!(parent.author, Some(f.u1.profile()));
    }
}

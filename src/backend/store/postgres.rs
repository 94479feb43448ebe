/**
 * PostgreSQL Store
 *
 * `BlogStore` over a `sqlx::PgPool`, using runtime-checked queries and
 * `FromRow` mapping.
 *
 * # Article Index
 *
 * `articles.comment_ids` is maintained with `array_append` / `array_remove`,
 * which are single-statement atomic updates. Each is run in the same
 * transaction as the comment row write.
 */

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::store::{page_offset, BlogStore, CommentPage, StoreResult};
use crate::shared::{Article, AuthorProfile, Comment, User};

const COMMENT_COLUMNS: &str = "id, content, article_id, author_id, author_avatar, \
     parent_comment_id, reply_to_comment_id, created_at";

/// Postgres-backed store
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// ILIKE pattern matching `keyword` literally anywhere in the text
fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl BlogStore for PgStore {
    async fn get_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {} FROM comments WHERE id = $1",
            COMMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn insert_comment(&self, comment: &Comment) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO comments (id, content, article_id, author_id, author_avatar,
                                  parent_comment_id, reply_to_comment_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(comment.id)
        .bind(&comment.content)
        .bind(comment.article_id)
        .bind(comment.author_id)
        .bind(&comment.author_avatar)
        .bind(comment.parent_comment_id)
        .bind(comment.reply_to_comment_id)
        .bind(comment.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE articles SET comment_ids = array_append(comment_ids, $1) WHERE id = $2")
            .bind(comment.id)
            .bind(comment.article_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn update_comment_content(&self, id: Uuid, content: &str) -> StoreResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "UPDATE comments SET content = $2 WHERE id = $1 RETURNING {}",
            COMMENT_COLUMNS
        ))
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn delete_comment(&self, comment: &Comment) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE articles SET comment_ids = array_remove(comment_ids, $1) WHERE id = $2")
            .bind(comment.id)
            .bind(comment.article_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn comments_for_article(&self, article_id: Uuid) -> StoreResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {} FROM comments WHERE article_id = $1 ORDER BY created_at ASC, id ASC",
            COMMENT_COLUMNS
        ))
        .bind(article_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn thread_replies(&self, root_id: Uuid) -> StoreResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {} FROM comments WHERE parent_comment_id = $1 ORDER BY created_at ASC, id ASC",
            COMMENT_COLUMNS
        ))
        .bind(root_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn search_comments(
        &self,
        keyword: Option<&str>,
        page: u32,
        limit: u32,
    ) -> StoreResult<CommentPage> {
        let pattern = keyword.map(like_pattern);
        let offset = i64::try_from(page_offset(page, limit)).unwrap_or(i64::MAX);

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM comments
            WHERE ($1::text IS NULL OR content ILIKE $1 ESCAPE '\')
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        let comments = sqlx::query_as::<_, Comment>(&format!(
            r#"
            SELECT {} FROM comments
            WHERE ($1::text IS NULL OR content ILIKE $1 ESCAPE '\')
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            COMMENT_COLUMNS
        ))
        .bind(&pattern)
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(CommentPage {
            comments,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn get_article(&self, id: Uuid) -> StoreResult<Option<Article>> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content, author_id, comment_ids, created_at
            FROM articles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(article)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, avatar, is_author, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn author_profiles(&self, ids: &[Uuid]) -> StoreResult<HashMap<Uuid, AuthorProfile>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let profiles = sqlx::query_as::<_, AuthorProfile>(
            "SELECT id, username, avatar FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles.into_iter().map(|p| (p.id, p)).collect())
    }
}

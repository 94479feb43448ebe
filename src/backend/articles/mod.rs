//! Articles Module
//!
//! Read-only article detail with the embedded comment tree. Article writes
//! belong to the authoring tools and are not served here.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::backend::comments::service::CommentService;
use crate::backend::error::BackendError;
use crate::shared::ArticleDetail;

/// `GET /api/articles/{id}`
pub async fn get_article(
    State(service): State<CommentService>,
    Path(article_id): Path<String>,
) -> Result<Json<ArticleDetail>, BackendError> {
    let detail = service.article_detail(&article_id).await?;
    Ok(Json(detail))
}

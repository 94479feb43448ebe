//! Comment HTTP Handlers
//!
//! Thin adapters between Axum extractors and [`CommentService`]. Body and
//! query rejections are turned into `BackendError`s so every failure shares
//! the JSON error format.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::backend::comments::service::{Actor, CommentService};
use crate::backend::error::BackendError;
use crate::backend::middleware::auth::{AuthUser, AuthenticatedUser};
use crate::shared::comment::{
    AdminCommentList, AdminCommentQuery, CommentThreadResponse, CreateCommentRequest,
    MessageResponse, UpdateCommentRequest,
};
use crate::shared::ThreadNode;

impl From<&AuthenticatedUser> for Actor {
    fn from(user: &AuthenticatedUser) -> Self {
        Actor {
            user_id: user.user_id,
            is_author: user.is_author,
        }
    }
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, BackendError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| BackendError::handler(rejection.status(), rejection.body_text()))
}

/// `POST /api/comments`
pub async fn create_comment(
    AuthUser(user): AuthUser,
    State(service): State<CommentService>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CommentThreadResponse>), BackendError> {
    let request = body(payload)?;
    let thread = service.create(Actor::from(&user), request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CommentThreadResponse {
            message: "Comment created".to_string(),
            comment: thread,
        }),
    ))
}

/// `GET /api/comments/article/{article_id}`
pub async fn get_article_comments(
    State(service): State<CommentService>,
    Path(article_id): Path<String>,
) -> Result<Json<Vec<ThreadNode>>, BackendError> {
    let threads = service.list_for_article(&article_id).await?;
    Ok(Json(threads))
}

/// `PUT /api/comments/{id}`
pub async fn update_comment(
    AuthUser(user): AuthUser,
    State(service): State<CommentService>,
    Path(comment_id): Path<String>,
    payload: Result<Json<UpdateCommentRequest>, JsonRejection>,
) -> Result<Json<CommentThreadResponse>, BackendError> {
    let request = body(payload)?;
    let thread = service
        .update(Actor::from(&user), &comment_id, &request.content)
        .await?;

    Ok(Json(CommentThreadResponse {
        message: "Comment updated".to_string(),
        comment: thread,
    }))
}

/// `DELETE /api/comments/{id}`
pub async fn delete_comment(
    AuthUser(user): AuthUser,
    State(service): State<CommentService>,
    Path(comment_id): Path<String>,
) -> Result<Json<MessageResponse>, BackendError> {
    service.delete(Actor::from(&user), &comment_id).await?;
    Ok(Json(MessageResponse {
        message: "Comment deleted".to_string(),
    }))
}

/// `GET /api/comments/admin/all?page=&limit=&keyword=`
pub async fn admin_list_comments(
    AuthUser(user): AuthUser,
    State(service): State<CommentService>,
    query: Result<Query<AdminCommentQuery>, QueryRejection>,
) -> Result<Json<AdminCommentList>, BackendError> {
    let Query(query) =
        query.map_err(|rejection| BackendError::handler(StatusCode::BAD_REQUEST, rejection.body_text()))?;
    let list = service.admin_list(Actor::from(&user), &query).await?;
    Ok(Json(list))
}

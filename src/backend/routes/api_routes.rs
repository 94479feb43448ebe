/**
 * API Route Handlers
 *
 * # Routes
 *
 * ## Public
 * - `GET /api/comments/article/{article_id}` - Comment threads, newest first
 * - `GET /api/articles/{id}` - Article with its threads, oldest first
 *
 * ## Authenticated (bearer token)
 * - `POST /api/comments` - Create a comment or reply
 * - `PUT /api/comments/{id}` - Edit own comment
 * - `DELETE /api/comments/{id}` - Delete own comment
 * - `GET /api/comments/admin/all` - Search all comments (blog author only)
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};

use crate::backend::articles::get_article;
use crate::backend::comments::{
    admin_list_comments, create_comment, delete_comment, get_article_comments, update_comment,
};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// The auth middleware is attached with `route_layer` to the protected
/// routes only, so unknown paths still fall through to the 404 fallback
/// instead of answering 401.
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/comments/article/{article_id}", get(get_article_comments))
        .route("/api/articles/{id}", get(get_article));

    let protected = Router::new()
        .route("/api/comments", post(create_comment))
        .route("/api/comments/{id}", put(update_comment).delete(delete_comment))
        .route("/api/comments/admin/all", get(admin_list_comments))
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    router.merge(public).merge(protected)
}

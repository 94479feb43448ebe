/**
 * Application State Management
 *
 * This module defines the application state structure. Services such as
 * `CommentService` implement `FromRef<AppState>` next to their own
 * definitions, so handlers can extract them directly.
 *
 * # Architecture
 *
 * `AppState` holds:
 * - The blog store behind `Arc<dyn BlogStore>`
 * - The loaded application configuration
 *
 * Both are reference counted, so cloning the state per request is cheap.
 *
 * # Example
 *
 * ```rust,ignore
 * use quillpress::backend::server::state::AppState;
 * use axum::extract::State;
 *
 * async fn handler(State(state): State<AppState>) {
 *     let article = state.store.get_article(id).await?;
 * }
 * ```
 */

use std::sync::Arc;

use crate::backend::store::BlogStore;
use crate::shared::AppConfig;

/// Central state container for the Axum application
#[derive(Clone)]
pub struct AppState {
    /// Persistent store for comments, articles and users
    pub store: Arc<dyn BlogStore>,

    /// Loaded configuration. The auth middleware reads the JWT secret here.
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn BlogStore>) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

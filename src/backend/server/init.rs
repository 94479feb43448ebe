/**
 * Server Initialization
 *
 * Builds the Axum application from a configuration and a store.
 *
 * # Initialization Process
 *
 * 1. Wrap configuration and store into `AppState`
 * 2. Create the router with all routes and middleware
 *
 * Choosing the store (Postgres or memory) happens before this, in
 * `server::config::load_store`, so tests can pass their own.
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::state::AppState;
use crate::backend::store::BlogStore;
use crate::shared::AppConfig;

/// Create and configure the Axum application
pub fn create_app(config: AppConfig, store: Arc<dyn BlogStore>) -> Router<()> {
    tracing::info!(environment = ?config.environment, "Initializing Quillpress backend");

    let app_state = AppState::new(config, store);
    let app = create_router(app_state);

    tracing::info!("Router configured");
    app
}

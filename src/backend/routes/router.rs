/**
 * Router Configuration
 *
 * Combines all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. Health check
 * 2. API routes (comments, articles)
 * 3. Fallback handler (JSON 404)
 *
 * Every request passes through `tower_http`'s `TraceLayer`.
 */

use axum::{http::StatusCode, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/health", get(|| async { "ok" }));

    let router = configure_api_routes(router, &app_state);

    let router = router.fallback(|| async {
        BackendError::handler(StatusCode::NOT_FOUND, "Route not found")
    });

    router
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

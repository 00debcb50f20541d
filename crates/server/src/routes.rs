//! Route configuration.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Digit lookups
        .route("/api/v1/digit/{index}", get(handlers::get_digit))
        .route(
            "/api/v1/chunk/{start_index}/{size}",
            get(handlers::get_chunk),
        )
        // Source introspection
        .route("/api/v1/settings", get(handlers::get_settings))
        // Health check (intentionally unauthenticated for load balancers/k8s probes)
        .route("/api/v1/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

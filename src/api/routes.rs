//! API Routes
//!
//! Configures the Axum router with all admin endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, config_handler, delete_handler, health_handler, inc_size_handler,
    insert_handler, insert_no_object_handler, lookup_handler, no_object_handler, stats_handler,
    update_config_handler, AppState,
};

/// Creates the admin router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/stat/*path",
            get(lookup_handler).put(insert_handler).delete(delete_handler),
        )
        .route("/size/*path", post(inc_size_handler))
        .route(
            "/noobj/*path",
            get(no_object_handler).put(insert_no_object_handler),
        )
        .route("/clear", post(clear_handler))
        .route("/config", get(config_handler).put(update_config_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

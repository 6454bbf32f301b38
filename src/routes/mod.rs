//! HTTP route handlers.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod health;

use axum::{middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Cross-origin policy: any origin, method, and header.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Creates the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    // Health checks - no caching, always fresh for probes
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/supabase-health", get(health::supabase_health))
        .route("/db-health", get(health::db_health));

    Router::new()
        .merge(health_routes)
        .with_state(state)
        .layer(cors_layer())
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}

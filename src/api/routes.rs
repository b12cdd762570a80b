//! API Routes
//!
//! Configures the Axum router with all operations endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    categories_handler, health_handler, invalidate_category_handler,
    invalidate_identity_handler, invalidate_key_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /stats` - Cache statistics
/// - `GET /categories` - Registered categories and TTLs
/// - `DELETE /identities/:identity` - Drop everything cached for an identity
/// - `DELETE /categories/:category` - Drop a category for all identities
/// - `DELETE /categories/:category/identities/:identity` - Drop one entry
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/stats", get(stats_handler))
        .route("/categories", get(categories_handler))
        .route("/identities/:identity", delete(invalidate_identity_handler))
        .route("/categories/:category", delete(invalidate_category_handler))
        .route(
            "/categories/:category/identities/:identity",
            delete(invalidate_key_handler),
        )
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

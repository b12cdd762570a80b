//! API Handlers
//!
//! HTTP request handlers for the operations endpoints: metrics, health, and
//! the invalidation hooks used by the credential manager.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::cache::CacheManager;
use crate::error::{CacheError, Result};
use crate::models::{CategoriesResponse, HealthResponse, InvalidateResponse, StatsResponse};

/// Cache of JSON payloads, as served by the binary.
pub type JsonCache = CacheManager<Value>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared result cache
    pub cache: Arc<JsonCache>,
}

impl AppState {
    /// Creates a new AppState around an existing cache handle.
    pub fn new(cache: Arc<JsonCache>) -> Self {
        Self { cache }
    }
}

/// Handler for GET /stats
///
/// Returns a snapshot of the cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().into())
}

/// Handler for GET /categories
///
/// Lists the registered categories and their TTLs.
pub async fn categories_handler(State(state): State<AppState>) -> Json<CategoriesResponse> {
    Json(state.cache.policy().into())
}

/// Handler for DELETE /identities/:identity
///
/// Drops every cached result belonging to an identity, e.g. after its
/// credentials were re-authorized or disconnected.
pub async fn invalidate_identity_handler(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> Json<InvalidateResponse> {
    let removed = state.cache.invalidate_identity(&identity);
    info!(identity = %identity, removed, "Identity invalidated via API");

    Json(InvalidateResponse::new(
        &format!("identity '{}'", identity),
        removed,
    ))
}

/// Handler for DELETE /categories/:category
///
/// Drops a category's results for every identity.
pub async fn invalidate_category_handler(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<InvalidateResponse>> {
    if !state.cache.policy().contains(&category) {
        return Err(CacheError::NotFound(format!("category '{}'", category)));
    }

    let removed = state.cache.invalidate_all_in_category(&category);
    info!(category = %category, removed, "Category invalidated via API");

    Ok(Json(InvalidateResponse::new(
        &format!("category '{}'", category),
        removed,
    )))
}

/// Handler for DELETE /categories/:category/identities/:identity
///
/// Drops one category's result for one identity.
pub async fn invalidate_key_handler(
    State(state): State<AppState>,
    Path((category, identity)): Path<(String, String)>,
) -> Result<Json<InvalidateResponse>> {
    if !state.cache.policy().contains(&category) {
        return Err(CacheError::NotFound(format!("category '{}'", category)));
    }

    let removed = usize::from(state.cache.invalidate_category(&category, &identity));

    Ok(Json(InvalidateResponse::new(
        &format!("category '{}' and identity '{}'", category, identity),
        removed,
    )))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::policy::{ANALYTICS_DATA, BING_ANALYTICS};
    use crate::cache::{SetOptions, TtlPolicy};
    use serde_json::json;

    fn test_state() -> AppState {
        AppState::new(Arc::new(JsonCache::new(TtlPolicy::default())))
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();
        state
            .cache
            .set(ANALYTICS_DATA, "u1", json!(1), SetOptions::default())
            .unwrap();
        state.cache.get(ANALYTICS_DATA, "u1");

        let response = stats_handler(State(state)).await;
        assert_eq!(response.size, 1);
        assert_eq!(response.sets, 1);
        assert_eq!(response.hits, 1);
        assert_eq!(response.misses, 0);
    }

    #[tokio::test]
    async fn test_categories_handler() {
        let response = categories_handler(State(test_state())).await;
        assert_eq!(response.categories.len(), 5);
        assert_eq!(response.error_ttl_secs, 300);
    }

    #[tokio::test]
    async fn test_invalidate_identity_handler() {
        let state = test_state();
        state
            .cache
            .set(ANALYTICS_DATA, "u1", json!(1), SetOptions::default())
            .unwrap();
        state
            .cache
            .set(BING_ANALYTICS, "u1", json!(2), SetOptions::default())
            .unwrap();

        let response =
            invalidate_identity_handler(State(state.clone()), Path("u1".to_string())).await;
        assert_eq!(response.removed, 2);
        assert!(state.cache.is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_category_unknown() {
        let result =
            invalidate_category_handler(State(test_state()), Path("nope".to_string())).await;
        assert_eq!(
            result.err(),
            Some(CacheError::NotFound("category 'nope'".to_string()))
        );
    }

    #[tokio::test]
    async fn test_invalidate_key_unknown_category() {
        let path = Path(("nope".to_string(), "u1".to_string()));
        let result = invalidate_key_handler(State(test_state()), path).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_invalidate_key_handler() {
        let state = test_state();
        state
            .cache
            .set(BING_ANALYTICS, "u1", json!(2), SetOptions::default())
            .unwrap();

        let path = Path((BING_ANALYTICS.to_string(), "u1".to_string()));
        let response = invalidate_key_handler(State(state.clone()), path).await.unwrap();
        assert_eq!(response.removed, 1);

        let path = Path((BING_ANALYTICS.to_string(), "u1".to_string()));
        let response = invalidate_key_handler(State(state), path).await.unwrap();
        assert_eq!(response.removed, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}

//! Response DTOs for the operations API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, TtlPolicy};

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Entries currently held
    pub size: usize,
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of successful writes
    pub sets: u64,
    /// Number of entries removed by invalidation
    pub invalidations: u64,
    /// Number of entries removed because they expired
    pub evictions: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            size: stats.size,
            hits: stats.hits,
            misses: stats.misses,
            sets: stats.sets,
            invalidations: stats.invalidations,
            evictions: stats.evictions,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// One registered category and its TTL
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTtl {
    pub name: String,
    pub ttl_secs: u64,
}

/// Response body for GET /categories
#[derive(Debug, Clone, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryTtl>,
    /// TTL applied to cached upstream failures
    pub error_ttl_secs: u64,
}

impl From<&TtlPolicy> for CategoriesResponse {
    fn from(policy: &TtlPolicy) -> Self {
        Self {
            categories: policy
                .categories()
                .map(|(name, ttl)| CategoryTtl {
                    name: name.to_string(),
                    ttl_secs: ttl.as_secs(),
                })
                .collect(),
            error_ttl_secs: policy.error_ttl().as_secs(),
        }
    }
}

/// Response body for the invalidation endpoints
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Success message
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

impl InvalidateResponse {
    /// Creates a new InvalidateResponse for `scope` (e.g. "identity 'u1'")
    pub fn new(scope: &str, removed: usize) -> Self {
        Self {
            message: format!("Invalidated {} entries for {}", removed, scope),
            removed,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

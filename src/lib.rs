//! Result Cache - shared TTL cache for expensive analytics calls
//!
//! Caches per-identity results of rate-limited upstream calls with a TTL per
//! data category, a background expiry sweeper, and identity-wide
//! invalidation.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::{AppState, JsonCache};
pub use cache::{CacheManager, CacheStats, SetOptions, TtlPolicy};
pub use config::Config;
pub use error::CacheError;
pub use tasks::{spawn_sweeper, SweeperHandle};

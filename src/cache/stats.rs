//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, sets,
//! invalidations, and evictions.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Stats Recorder ==
/// Lock-free counters updated on the hot path.
///
/// Each counter is an independent atomic so recording never contends with
/// the store's locks.
#[derive(Debug, Default)]
pub struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    invalidations: AtomicU64,
    evictions: AtomicU64,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_set(&self) {
        self.sets.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds `count` explicit removals.
    pub fn record_invalidations(&self, count: u64) {
        if count > 0 {
            self.invalidations.fetch_add(count, Ordering::Relaxed);
        }
    }

    /// Adds `count` expiry removals (sweeps and lazy expiry).
    pub fn record_evictions(&self, count: u64) {
        if count > 0 {
            self.evictions.fetch_add(count, Ordering::Relaxed);
        }
    }

    // == Snapshot ==
    /// Copies the counters into a [`CacheStats`] with the given size gauge.
    pub fn snapshot(&self, size: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            size,
        }
    }
}

// == Cache Stats ==
/// Point-in-time copy of the cache metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups that returned a live entry
    pub hits: u64,
    /// Lookups that found nothing live
    pub misses: u64,
    /// Successful writes
    pub sets: u64,
    /// Entries removed by explicit invalidation
    pub invalidations: u64,
    /// Entries removed because they expired
    pub evictions: u64,
    /// Entries currently held, including expired ones not yet swept
    pub size: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

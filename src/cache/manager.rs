//! Cache Manager Module
//!
//! Category-aware façade over the store, TTL policy, and statistics. This is
//! the only cache type collaborators hold.

use std::sync::Arc;

use tracing::debug;

use crate::cache::{
    CacheEntry, CacheKey, CacheStats, CacheStore, Clock, StatsRecorder, SystemClock, TtlPolicy,
};
use crate::error::{CacheError, Result};

// == Set Options ==
/// Per-write options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Cache a failed upstream result with the short error TTL
    pub is_error_result: bool,
}

impl SetOptions {
    pub fn success() -> Self {
        Self {
            is_error_result: false,
        }
    }

    pub fn error() -> Self {
        Self {
            is_error_result: true,
        }
    }
}

// == Cache Manager ==
/// Shared result cache keyed by `(category, identity)`.
///
/// Construct one per process at the composition root and hand it out as an
/// `Arc<CacheManager<V>>`. All operations are synchronous and in-memory.
///
/// Concurrent misses for the same key are not collapsed: each caller fetches
/// upstream and the last `set` wins.
#[derive(Debug)]
pub struct CacheManager<V> {
    store: CacheStore<V>,
    policy: TtlPolicy,
    stats: Arc<StatsRecorder>,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> CacheManager<V> {
    // == Constructors ==
    /// Creates a manager driven by the system clock.
    pub fn new(policy: TtlPolicy) -> Self {
        Self::with_clock(policy, Arc::new(SystemClock))
    }

    /// Creates a manager driven by `clock`.
    pub fn with_clock(policy: TtlPolicy, clock: Arc<dyn Clock>) -> Self {
        let stats = Arc::new(StatsRecorder::new());
        Self {
            store: CacheStore::new(clock.clone(), stats.clone()),
            policy,
            stats,
            clock,
        }
    }

    // == Get ==
    /// Returns the live value cached for `(category, identity)`.
    ///
    /// Unknown categories are treated as never cached. Records exactly one
    /// hit or miss.
    pub fn get(&self, category: &str, identity: &str) -> Option<V> {
        self.get_entry(category, identity).map(|entry| entry.value)
    }

    /// Like [`get`](CacheManager::get) but returns the entry with its expiry
    /// metadata.
    pub fn get_entry(&self, category: &str, identity: &str) -> Option<CacheEntry<V>> {
        let found = if self.policy.contains(category) {
            self.store.get(&CacheKey::new(category, identity))
        } else {
            None
        };

        match found {
            Some(entry) => {
                self.stats.record_hit();
                Some(entry)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Caches `value` for `(category, identity)`, replacing any previous entry.
    ///
    /// Fails with [`CacheError::UnknownCategory`] if the category has no TTL.
    pub fn set(&self, category: &str, identity: &str, value: V, opts: SetOptions) -> Result<()> {
        let ttl = self
            .policy
            .resolve(category, opts.is_error_result)
            .ok_or_else(|| CacheError::UnknownCategory(category.to_string()))?;

        let key = CacheKey::new(category, identity);
        let entry = CacheEntry::new(value, category, self.clock.now_ms(), ttl);
        debug!(
            key = %key,
            ttl_secs = ttl.as_secs(),
            is_error_result = opts.is_error_result,
            "Cache set"
        );

        self.store.put(key, entry);
        self.stats.record_set();
        Ok(())
    }

    // == Store Outcome ==
    /// Caches the outcome of an upstream fetch.
    ///
    /// `Ok` payloads get the category TTL, `Err` payloads the error TTL so a
    /// failing upstream is retried soon.
    pub fn store_outcome(
        &self,
        category: &str,
        identity: &str,
        outcome: std::result::Result<V, V>,
    ) -> Result<()> {
        match outcome {
            Ok(value) => self.set(category, identity, value, SetOptions::success()),
            Err(value) => self.set(category, identity, value, SetOptions::error()),
        }
    }

    // == Invalidate Key ==
    /// Removes the entry for `(category, identity)` if present.
    pub fn invalidate_key(&self, category: &str, identity: &str) -> bool {
        let key = CacheKey::new(category, identity);
        let removed = self.store.delete(&key);
        if removed {
            self.stats.record_invalidations(1);
            debug!(key = %key, "Cache entry invalidated");
        }
        removed
    }

    // == Invalidate Category ==
    /// Removes the category's entry for one identity.
    ///
    /// A category and identity address a single key, so this is equivalent
    /// to [`invalidate_key`](CacheManager::invalidate_key).
    pub fn invalidate_category(&self, category: &str, identity: &str) -> bool {
        self.invalidate_key(category, identity)
    }

    // == Invalidate Identity ==
    /// Removes every entry belonging to `identity`, across all categories.
    ///
    /// A `set` for the identity that commits after this returns is kept
    /// (last writer wins). Returns the number of entries removed.
    pub fn invalidate_identity(&self, identity: &str) -> usize {
        let keys = self.store.keys(|key, _| key.identity == identity);
        let removed = self.remove_all(&keys);
        debug!(identity, removed, "Identity invalidated");
        removed
    }

    // == Invalidate All In Category ==
    /// Removes the category's entries for every identity.
    pub fn invalidate_all_in_category(&self, category: &str) -> usize {
        let keys = self.store.keys(|_, entry| entry.category == category);
        let removed = self.remove_all(&keys);
        debug!(category, removed, "Category invalidated");
        removed
    }

    // == Clear ==
    /// Removes everything. Each removed entry counts as an invalidation.
    pub fn clear(&self) -> usize {
        let removed = self.store.clear();
        self.stats.record_invalidations(removed as u64);
        removed
    }

    fn remove_all(&self, keys: &[CacheKey]) -> usize {
        let removed = keys.iter().filter(|key| self.store.delete(key)).count();
        self.stats.record_invalidations(removed as u64);
        removed
    }

    // == Sweep ==
    /// Runs one expiry pass over the store, returning the number evicted.
    pub fn sweep_expired(&self) -> usize {
        self.store.cleanup_expired()
    }

    // == Stats ==
    /// Returns a snapshot of the cache metrics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.store.len())
    }

    // == Accessors ==
    pub fn policy(&self) -> &TtlPolicy {
        &self.policy
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

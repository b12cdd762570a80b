//! Cache Store Module
//!
//! Sharded concurrent table of `CacheKey -> CacheEntry` with lazy expiry.

use std::sync::Arc;

use dashmap::DashMap;

use crate::cache::{CacheEntry, CacheKey, Clock, StatsRecorder};

// == Cache Store ==
/// Concurrency-safe table of cache entries.
///
/// Every operation locks a single shard for the duration of one map
/// operation, so scans never block foreground traffic for long. Expired
/// entries are removed lazily on lookup and eagerly by
/// [`cleanup_expired`](CacheStore::cleanup_expired); both removals count as
/// evictions.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: DashMap<CacheKey, CacheEntry<V>>,
    /// Time source for expiry checks
    clock: Arc<dyn Clock>,
    /// Shared metrics, only evictions are recorded here
    stats: Arc<StatsRecorder>,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    pub fn new(clock: Arc<dyn Clock>, stats: Arc<StatsRecorder>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            stats,
        }
    }

    /// Current time according to the store's clock.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    // == Get ==
    /// Returns the entry for `key` if it is present and live.
    ///
    /// A present but expired entry is reported as absent and removed.
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry<V>> {
        let now_ms = self.now_ms();
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now_ms) => return Some(entry.value().clone()),
            Some(_) => true,
            None => false,
        };

        // The read guard is released above; removing while holding it would
        // deadlock the shard.
        if expired {
            self.remove_expired(key);
        }
        None
    }

    // == Put ==
    /// Inserts or replaces the entry for `key`, returning the previous one.
    pub fn put(&self, key: CacheKey, entry: CacheEntry<V>) -> Option<CacheEntry<V>> {
        self.entries.insert(key, entry)
    }

    // == Delete ==
    /// Removes the entry for `key`. Returns whether anything was removed.
    pub fn delete(&self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Keys ==
    /// Collects every key whose entry matches `predicate`.
    ///
    /// The result is a snapshot: concurrent writers may change the table
    /// after it is taken, so callers that delete must re-validate under the
    /// lock (see [`remove_expired`](CacheStore::remove_expired)).
    pub fn keys<F>(&self, predicate: F) -> Vec<CacheKey>
    where
        F: Fn(&CacheKey, &CacheEntry<V>) -> bool,
    {
        self.entries
            .iter()
            .filter(|item| predicate(item.key(), item.value()))
            .map(|item| item.key().clone())
            .collect()
    }

    // == Remove Expired ==
    /// Removes `key` only if its current entry is expired right now.
    ///
    /// Expiry is evaluated under the shard's write lock, so an entry that was
    /// replaced by a fresh `put` after a scan is left alone.
    pub fn remove_expired(&self, key: &CacheKey) -> bool {
        let removed = self
            .entries
            .remove_if(key, |_, entry| entry.is_expired(self.clock.now_ms()))
            .is_some();
        if removed {
            self.stats.record_evictions(1);
        }
        removed
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        let now_ms = self.now_ms();
        self.keys(|_, entry| entry.is_expired(now_ms))
            .iter()
            .filter(|key| self.remove_expired(key))
            .count()
    }

    // == Clear ==
    /// Drops every entry, returning how many were held.
    pub fn clear(&self) -> usize {
        let keys = self.keys(|_, _| true);
        keys.iter().filter(|key| self.delete(key)).count()
    }

    // == Length ==
    /// Returns the number of entries held, live or not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

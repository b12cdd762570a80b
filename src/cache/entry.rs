//! Cache Entry Module
//!
//! Defines the immutable wrapper stored for each cached result.

use std::time::Duration;

// == Cache Entry ==
/// A cached value together with its expiry metadata.
///
/// Entries are never mutated after construction; a new `set` builds a new
/// entry and replaces the old one wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    /// The stored payload, never inspected by the cache
    pub value: V,
    /// Category the entry was cached under
    pub category: String,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry created at `now_ms` that lives for `ttl`.
    pub fn new(value: V, category: impl Into<String>, now_ms: u64, ttl: Duration) -> Self {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        Self {
            value,
            category: category.into(),
            created_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_ms),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// An entry is live strictly before `expires_at`; once the TTL has fully
    /// elapsed it is expired.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining TTL at `now_ms`, zero once expired.
    pub fn ttl_remaining(&self, now_ms: u64) -> Duration {
        Duration::from_millis(self.expires_at.saturating_sub(now_ms))
    }

    /// Total lifetime the entry was created with.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.expires_at - self.created_at)
    }
}

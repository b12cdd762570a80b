//! Cache Module
//!
//! Provides the shared result cache: TTL policy per category, lazy and
//! background expiry, and identity-scoped invalidation.

mod clock;
mod entry;
mod key;
mod manager;
pub mod policy;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use key::{CacheKey, KEY_SEPARATOR};
pub use manager::{CacheManager, SetOptions};
pub use policy::TtlPolicy;
pub use stats::{CacheStats, StatsRecorder};
pub use store::CacheStore;

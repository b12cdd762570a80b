//! Background Tasks Module
//!
//! Contains background tasks that run alongside the cache.
//!
//! # Tasks
//! - Sweeper: Evicts expired cache entries at a fixed interval

mod sweeper;

pub use sweeper::{spawn_sweeper, SweeperHandle, MAX_INTERVAL};

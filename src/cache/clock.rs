//! Clock Module
//!
//! Abstracts wall-clock access so expiry logic can run against a fake clock.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

// == Clock Trait ==
/// Source of the current time, in Unix milliseconds.
pub trait Clock: Debug + Send + Sync {
    fn now_ms(&self) -> u64;
}

// == System Clock ==
/// Real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        // Clamp pre-epoch clocks to zero rather than wrapping.
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

// == Manual Clock ==
/// Clock that only moves when told to. Used in tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    /// Creates a manual clock frozen at `start_ms`.
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(start_ms),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.now_ms.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    /// Jumps the clock to an absolute timestamp.
    pub fn set_ms(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_ms(), 1_000);

        clock.advance(Duration::from_secs(2));
        assert_eq!(clock.now_ms(), 3_000);

        clock.set_ms(10);
        assert_eq!(clock.now_ms(), 10);
    }
}

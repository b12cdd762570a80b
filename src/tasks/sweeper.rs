//! Expiry Sweeper Task
//!
//! Background task that periodically evicts expired cache entries so keys
//! that are never read again do not accumulate.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::cache::CacheManager;

/// Shortest interval the sweeper accepts.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Longest interval the sweeper accepts (one week).
pub const MAX_INTERVAL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

// == Sweeper Handle ==
/// Owner's handle on a running sweeper.
///
/// Dropping the handle also stops the task, since the stop channel closes.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals the sweeper to stop and waits for it to exit.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.join.await {
            warn!("Sweeper task ended abnormally: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Spawns the expiry sweeper for `cache`.
///
/// The interval is clamped to `[1ms, MAX_INTERVAL]`; the first sweep happens
/// one interval after spawning. Each sweep is isolated: a panic is logged and
/// the loop carries on with the next tick.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(CacheManager::<Value>::new(TtlPolicy::default()));
/// let sweeper = spawn_sweeper(cache.clone(), Duration::from_secs(300));
/// // Later, during shutdown:
/// sweeper.stop().await;
/// ```
pub fn spawn_sweeper<V>(cache: Arc<CacheManager<V>>, interval: Duration) -> SweeperHandle
where
    V: Clone + Send + Sync + 'static,
{
    let interval = interval.clamp(MIN_INTERVAL, MAX_INTERVAL);
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let first_tick = Instant::now() + interval;

    let join = tokio::spawn(async move {
        info!("Starting cache sweeper with interval of {:?}", interval);

        let mut ticker = time::interval_at(first_tick, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    run_sweep(&cache);
                }
                changed = shutdown_rx.changed() => {
                    // A closed channel means the handle was dropped.
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Cache sweeper stopped");
    });

    SweeperHandle { shutdown_tx, join }
}

// == Single Sweep ==
/// Runs one sweep, returning the number evicted or `None` if it panicked.
fn run_sweep<V: Clone>(cache: &CacheManager<V>) -> Option<usize> {
    match panic::catch_unwind(AssertUnwindSafe(|| cache.sweep_expired())) {
        Ok(removed) => {
            if removed > 0 {
                info!("Cache sweep: evicted {} expired entries", removed);
            } else {
                debug!("Cache sweep: no expired entries found");
            }
            Some(removed)
        }
        Err(payload) => {
            error!(
                "Cache sweep panicked, continuing on next tick: {}",
                panic_message(payload.as_ref())
            );
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::policy::{PLATFORM_STATUS, USER_SITES};
    use crate::cache::{Clock, ManualClock, SetOptions, TtlPolicy};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicBool, Ordering};

    const SWEEP: Duration = Duration::from_secs(300);

    fn test_cache() -> (Arc<CacheManager<Value>>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let cache = CacheManager::with_clock(TtlPolicy::default(), clock.clone());
        (Arc::new(cache), clock)
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_reclaims_expired_entries() {
        let (cache, clock) = test_cache();
        cache
            .set(PLATFORM_STATUS, "u1", json!(1), SetOptions::error())
            .unwrap();
        assert_eq!(cache.stats().size, 1);

        let handle = spawn_sweeper(cache.clone(), SWEEP);

        // Past the 5 minute error TTL and past one sweep tick.
        clock.advance(Duration::from_secs(301));
        time::sleep(SWEEP + Duration::from_secs(1)).await;

        let stats = cache.stats();
        assert_eq!(stats.size, 0, "Expired entry should have been swept");
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.hits + stats.misses, 0);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_preserves_live_entries() {
        let (cache, clock) = test_cache();
        cache
            .set(USER_SITES, "u1", json!(["a.com"]), SetOptions::default())
            .unwrap();

        let handle = spawn_sweeper(cache.clone(), SWEEP);

        clock.advance(Duration::from_secs(600));
        time::sleep(SWEEP * 2 + Duration::from_secs(1)).await;

        assert_eq!(cache.get(USER_SITES, "u1"), Some(json!(["a.com"])));
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_stops_promptly() {
        let (cache, _) = test_cache();
        let handle = spawn_sweeper(cache, SWEEP);

        let stopped = time::timeout(Duration::from_secs(1), handle.stop()).await;
        assert!(stopped.is_ok(), "Sweeper should stop without waiting a tick");
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_clamps_huge_interval() {
        let (cache, clock) = test_cache();
        cache
            .set(PLATFORM_STATUS, "u1", json!(1), SetOptions::error())
            .unwrap();

        let handle = spawn_sweeper(cache.clone(), Duration::from_secs(u64::MAX));

        clock.advance(Duration::from_secs(301));
        time::sleep(MAX_INTERVAL + Duration::from_secs(1)).await;

        assert_eq!(cache.stats().size, 0, "Sweep should run at the capped interval");
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_accepts_sub_second_interval() {
        let (cache, clock) = test_cache();
        cache
            .set(PLATFORM_STATUS, "u1", json!(1), SetOptions::error())
            .unwrap();

        let handle = spawn_sweeper(cache.clone(), Duration::ZERO);

        clock.advance(Duration::from_secs(301));
        time::sleep(Duration::from_millis(5)).await;

        assert_eq!(cache.stats().size, 0);
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_stops_when_handle_dropped() {
        let (cache, _) = test_cache();
        let handle = spawn_sweeper(cache.clone(), SWEEP);
        drop(handle);

        time::sleep(Duration::from_millis(10)).await;
        // Only the test's own reference remains once the task exits.
        assert_eq!(Arc::strong_count(&cache), 1);
    }

    #[derive(Debug, Default)]
    struct FaultyClock {
        inner: ManualClock,
        fail: AtomicBool,
    }

    impl Clock for FaultyClock {
        fn now_ms(&self) -> u64 {
            if self.fail.load(Ordering::SeqCst) {
                panic!("clock unavailable");
            }
            self.inner.now_ms()
        }
    }

    #[test]
    fn test_run_sweep_isolates_panics() {
        let clock = Arc::new(FaultyClock::default());
        let cache: CacheManager<Value> =
            CacheManager::with_clock(TtlPolicy::default(), clock.clone());
        cache
            .set(PLATFORM_STATUS, "u1", json!(1), SetOptions::default())
            .unwrap();

        clock.fail.store(true, Ordering::SeqCst);
        assert_eq!(run_sweep(&cache), None);

        clock.fail.store(false, Ordering::SeqCst);
        clock.inner.advance(Duration::from_secs(3600));
        assert_eq!(run_sweep(&cache), Some(1));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");

        let payload: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}

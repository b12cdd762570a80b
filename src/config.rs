//! Configuration Module
//!
//! Handles loading and managing startup configuration from environment
//! variables.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::cache::TtlPolicy;
use crate::error::Result;
use crate::tasks::MAX_INTERVAL;

/// Startup configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults. The TTL policy is fixed once built; changing it needs a restart.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP port of the operations endpoint
    pub server_port: u16,
    /// Sweeper interval in seconds
    pub sweep_interval: u64,
    /// TTL in seconds for cached upstream failures
    pub error_ttl: u64,
    /// Extra or overriding `(category, ttl_seconds)` pairs
    pub category_ttls: Vec<(String, u64)>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Sweeper frequency in seconds, at most one week
    ///   (default: 300)
    /// - `ERROR_TTL` - TTL for failed upstream results in seconds (default: 300)
    /// - `CATEGORY_TTLS` - Comma-separated `name=seconds` pairs added on top of
    ///   the built-in categories (default: none)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            sweep_interval: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| parse_sweep_interval(&v))
                .unwrap_or(defaults.sweep_interval),
            error_ttl: env::var("ERROR_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.error_ttl),
            category_ttls: env::var("CATEGORY_TTLS")
                .map(|v| parse_category_ttls(&v))
                .unwrap_or_default(),
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }

    // == TTL Policy ==
    /// Builds the TTL policy: built-in categories, then configured overrides.
    pub fn ttl_policy(&self) -> Result<TtlPolicy> {
        let mut policy = TtlPolicy::default().with_error_ttl(Duration::from_secs(self.error_ttl))?;
        for (category, secs) in &self.category_ttls {
            policy = policy.with_category(category.clone(), Duration::from_secs(*secs))?;
        }
        Ok(policy)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            sweep_interval: 300,
            error_ttl: 300,
            category_ttls: Vec::new(),
        }
    }
}

/// Parses a sweep interval in seconds, rejecting zero and anything longer
/// than the sweeper's cap.
fn parse_sweep_interval(raw: &str) -> Option<u64> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| (1..=MAX_INTERVAL.as_secs()).contains(secs));
    if parsed.is_none() {
        warn!("Ignoring out-of-range SWEEP_INTERVAL '{}'", raw);
    }
    parsed
}

/// Parses `name=seconds,name=seconds`, skipping malformed pairs.
fn parse_category_ttls(raw: &str) -> Vec<(String, u64)> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let parsed = pair.split_once('=').and_then(|(name, secs)| {
                let name = name.trim();
                let secs = secs.trim().parse::<u64>().ok()?;
                (!name.is_empty() && secs > 0).then(|| (name.to_string(), secs))
            });
            if parsed.is_none() {
                warn!("Ignoring malformed CATEGORY_TTLS entry '{}'", pair);
            }
            parsed
        })
        .collect()
}

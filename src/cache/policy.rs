//! TTL Policy Module
//!
//! Maps data categories to their time-to-live.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::{CacheError, Result};

// == Built-in Categories ==
pub const PLATFORM_STATUS: &str = "platform_status";
pub const ANALYTICS_DATA: &str = "analytics_data";
pub const USER_SITES: &str = "user_sites";
pub const BING_ANALYTICS: &str = "bing_analytics";
pub const GSC_ANALYTICS: &str = "gsc_analytics";

/// TTL applied to failed upstream results, whatever their category.
pub const DEFAULT_ERROR_TTL: Duration = Duration::from_secs(5 * 60);

const MINUTE: u64 = 60;

// == TTL Policy ==
/// Category name to TTL lookup, fixed once the cache is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtlPolicy {
    categories: BTreeMap<String, Duration>,
    error_ttl: Duration,
}

impl TtlPolicy {
    /// Creates a policy with no categories registered.
    pub fn empty(error_ttl: Duration) -> Result<Self> {
        if error_ttl.is_zero() {
            return Err(CacheError::InvalidConfig(
                "Error TTL must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            categories: BTreeMap::new(),
            error_ttl,
        })
    }

    // == Builders ==
    /// Registers or overrides a category.
    pub fn with_category(mut self, category: impl Into<String>, ttl: Duration) -> Result<Self> {
        let category = category.into();
        if category.is_empty() {
            return Err(CacheError::InvalidConfig(
                "Category name cannot be empty".to_string(),
            ));
        }
        if ttl.is_zero() {
            return Err(CacheError::InvalidConfig(format!(
                "TTL for category '{}' must be greater than zero",
                category
            )));
        }
        self.categories.insert(category, ttl);
        Ok(self)
    }

    /// Replaces the error TTL.
    pub fn with_error_ttl(mut self, error_ttl: Duration) -> Result<Self> {
        if error_ttl.is_zero() {
            return Err(CacheError::InvalidConfig(
                "Error TTL must be greater than zero".to_string(),
            ));
        }
        self.error_ttl = error_ttl;
        Ok(self)
    }

    // == Resolve ==
    /// Looks up the TTL for `category`.
    ///
    /// Returns `None` for unregistered categories. For error results the
    /// error TTL is returned instead of the category's own.
    pub fn resolve(&self, category: &str, is_error_result: bool) -> Option<Duration> {
        let ttl = self.categories.get(category)?;
        Some(if is_error_result { self.error_ttl } else { *ttl })
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    pub fn error_ttl(&self) -> Duration {
        self.error_ttl
    }

    /// Registered categories in name order.
    pub fn categories(&self) -> impl Iterator<Item = (&str, Duration)> {
        self.categories.iter().map(|(name, ttl)| (name.as_str(), *ttl))
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        let categories = [
            (PLATFORM_STATUS, 30 * MINUTE),
            (ANALYTICS_DATA, 60 * MINUTE),
            (USER_SITES, 120 * MINUTE),
            (BING_ANALYTICS, 60 * MINUTE),
            (GSC_ANALYTICS, 60 * MINUTE),
        ]
        .into_iter()
        .map(|(name, secs)| (name.to_string(), Duration::from_secs(secs)))
        .collect();

        Self {
            categories,
            error_ttl: DEFAULT_ERROR_TTL,
        }
    }
}

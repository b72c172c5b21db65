//! Cache configuration

use std::time::Duration;

/// Configuration for cache TTL (time-to-live) settings.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use praxis_lib::cache::CacheConfig;
///
/// let config = CacheConfig::default()
///     .with_list_ttl(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for list responses.
    ///
    /// Default: 60 seconds. Invalidation on mutation makes a short TTL a
    /// safety net rather than the consistency mechanism.
    pub list_ttl: Duration,

    /// TTL for autocomplete candidate sets.
    ///
    /// Default: 5 minutes.
    pub autocomplete_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            list_ttl: Duration::from_secs(60),
            autocomplete_ttl: Duration::from_secs(300),
        }
    }
}

impl CacheConfig {
    /// Creates a new cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the list-response TTL.
    pub fn with_list_ttl(mut self, ttl: Duration) -> Self {
        self.list_ttl = ttl;
        self
    }

    /// Sets the autocomplete TTL.
    pub fn with_autocomplete_ttl(mut self, ttl: Duration) -> Self {
        self.autocomplete_ttl = ttl;
        self
    }

    /// Creates a config with caching effectively disabled (zero TTLs).
    pub fn no_cache() -> Self {
        Self {
            list_ttl: Duration::ZERO,
            autocomplete_ttl: Duration::ZERO,
        }
    }
}

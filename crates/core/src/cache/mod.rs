//! In-memory cache for weather lookups.
//!
//! This module provides a bounded, freshness-keyed lookup table:
//!
//! - Keys are normalized city names (see [`key::normalize_city`])
//! - Entries carry an absolute expiry; staleness is checked lazily on read
//! - Capacity is bounded with least-recently-used eviction
//!
//! The resolver only sees the [`WeatherCache`] trait, so the store can be
//! swapped for a shared or distributed cache.

pub mod key;
pub mod memory;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub use key::normalize_city;
pub use memory::MemoryCache;

/// How long a successful lookup stays fresh, in minutes.
pub const CACHE_TTL_MINUTES: i64 = 15;

/// Freshness window for a successful lookup.
pub fn cache_ttl() -> Duration {
    Duration::minutes(CACHE_TTL_MINUTES)
}

/// A cached lookup result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Normalized city name.
    pub key: String,
    /// The plain-text weather description.
    pub value: String,
    /// Instant after which the entry is stale.
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Build an entry that expires `ttl` after `now`.
    pub fn new(key: impl Into<String>, value: impl Into<String>, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self { key: key.into(), value: value.into(), expires_at: now + ttl }
    }

    /// An entry is fresh while its expiry is strictly after `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Store of weather lookups keyed by normalized city name.
///
/// Implementations must be safe for concurrent use. Methods are synchronous so
/// no lock is ever held across an await point.
pub trait WeatherCache: Send + Sync {
    /// Raw entry for `key`, fresh or stale.
    fn get(&self, key: &str) -> Option<CacheEntry>;

    /// Insert or overwrite the entry for `entry.key`.
    fn put(&self, entry: CacheEntry);

    /// Number of entries currently held.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry for `key` only if it is still fresh at `now`.
    fn get_fresh(&self, key: &str, now: DateTime<Utc>) -> Option<CacheEntry> {
        self.get(key).filter(|entry| entry.is_fresh(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_expiry() {
        let now = Utc::now();
        let entry = CacheEntry::new("paris", "Sunny +21°C", now, cache_ttl());
        assert_eq!(entry.expires_at, now + Duration::minutes(15));
        assert!(entry.is_fresh(now));
        assert!(entry.is_fresh(now + Duration::minutes(14)));
    }

    #[test]
    fn test_entry_stale_at_exact_expiry() {
        let now = Utc::now();
        let entry = CacheEntry::new("paris", "Sunny +21°C", now, cache_ttl());
        assert!(!entry.is_fresh(entry.expires_at));
        assert!(!entry.is_fresh(entry.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn test_get_fresh_filters_stale() {
        let cache = MemoryCache::new(10);
        let now = Utc::now();
        cache.put(CacheEntry::new("oslo", "Snow -3°C", now, cache_ttl()));

        assert!(cache.get_fresh("oslo", now).is_some());
        assert!(cache.get_fresh("oslo", now + Duration::minutes(16)).is_none());
        assert!(cache.get("oslo").is_some());
    }
}

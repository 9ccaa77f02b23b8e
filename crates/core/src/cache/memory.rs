//! Bounded in-memory store backed by moka.

use moka::policy::EvictionPolicy;
use moka::sync::Cache;

use super::{CacheEntry, WeatherCache};

/// Default maximum number of cached cities.
pub const DEFAULT_MAX_ENTRIES: u64 = 1_000;

/// In-memory weather cache.
///
/// Capacity is bounded with LRU eviction. Expiry is not delegated to moka:
/// entries carry their own `expires_at` and are judged against the injected
/// clock at read time, so stale entries linger until overwritten or evicted.
#[derive(Clone)]
pub struct MemoryCache {
    entries: Cache<String, CacheEntry>,
}

impl MemoryCache {
    /// Create a cache holding at most `max_entries` cities.
    pub fn new(max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .eviction_policy(EvictionPolicy::lru())
            .build();
        Self { entries }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entry_count", &self.entries.entry_count())
            .finish()
    }
}

impl WeatherCache for MemoryCache {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key)
    }

    fn put(&self, entry: CacheEntry) {
        tracing::debug!(key = %entry.key, expires_at = %entry.expires_at, "caching weather lookup");
        self.entries.insert(entry.key.clone(), entry);
    }

    fn len(&self) -> u64 {
        // moka updates its counters lazily
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::cache_ttl;
    use chrono::Utc;

    fn entry(key: &str, value: &str) -> CacheEntry {
        CacheEntry::new(key, value, Utc::now(), cache_ttl())
    }

    #[test]
    fn test_put_and_get() {
        let cache = MemoryCache::default();
        cache.put(entry("paris", "Sunny +21°C"));

        let got = cache.get("paris").unwrap();
        assert_eq!(got.value, "Sunny +21°C");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_get_missing() {
        let cache = MemoryCache::default();
        assert!(cache.get("atlantis").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_put_overwrites() {
        let cache = MemoryCache::default();
        cache.put(entry("paris", "Sunny +21°C"));
        cache.put(entry("paris", "Rain +14°C"));

        assert_eq!(cache.get("paris").unwrap().value, "Rain +14°C");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_capacity_is_bounded() {
        let cache = MemoryCache::new(4);
        for i in 0..32 {
            cache.put(entry(&format!("city-{i}"), "Clear +10°C"));
        }

        assert!(cache.len() <= 4);
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = MemoryCache::default();
        let other = cache.clone();
        cache.put(entry("lima", "Overcast +18°C"));

        assert!(other.get("lima").is_some());
    }
}

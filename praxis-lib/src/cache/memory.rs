//! In-memory cache implementation using DashMap

use async_trait::async_trait;
use dashmap::DashMap;

use super::CachedValue;
use super::CacheProvider;

/// An in-memory cache backed by a concurrent hash map.
///
/// The default cache implementation. Fast and thread-safe; contents are
/// lost when the process exits, which is the intended lifetime for list
/// responses.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    store: DashMap<String, CachedValue>,
}

impl InMemoryCache {
    /// Creates a new empty in-memory cache.
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Returns the number of entries in the cache (including expired ones).
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[async_trait]
impl CacheProvider for InMemoryCache {
    async fn get(&self, key: &str) -> Option<CachedValue> {
        let entry = self.store.get(key)?;
        let value = entry.value();

        if value.is_expired() {
            drop(entry);
            self.store.remove(key);
            None
        } else {
            Some(value.clone())
        }
    }

    async fn set(&self, key: &str, value: CachedValue) {
        self.store.insert(key.to_string(), value);
    }

    async fn remove(&self, key: &str) {
        self.store.remove(key);
    }

    async fn remove_prefix(&self, prefix: &str) -> usize {
        let mut removed = 0;
        self.store.retain(|key, _| {
            if key.starts_with(prefix) {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    async fn clear(&self) {
        self.store.clear();
    }

    async fn gc(&self) -> usize {
        let mut removed = 0;
        self.store.retain(|_, value| {
            if value.is_expired() {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn remove_prefix_drops_only_matching_keys() {
        let cache = InMemoryCache::new();
        let value = CachedValue::with_ttl(b"{}".to_vec(), Duration::from_secs(60));

        cache.set("list:others/clinics:page=1", value.clone()).await;
        cache.set("list:others/clinics:page=2", value.clone()).await;
        cache.set("list:others/symptoms:page=1", value).await;

        let removed = cache.remove_prefix("list:others/clinics:").await;

        assert_eq!(removed, 2);
        assert!(cache.get("list:others/clinics:page=1").await.is_none());
        assert!(cache.get("list:others/symptoms:page=1").await.is_some());
    }

    #[tokio::test]
    async fn expired_values_are_not_returned() {
        let cache = InMemoryCache::new();
        cache
            .set("k", CachedValue::with_ttl(b"{}".to_vec(), Duration::ZERO))
            .await;

        assert!(cache.get("k").await.is_none());
    }
}

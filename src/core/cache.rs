use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

struct CacheEntry<V> {
    value: V,
    expires_at: Option<Instant>,
}

/// Process-wide response cache for market data lookups.
#[derive(Clone)]
pub struct Cache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<Mutex<HashMap<K, CacheEntry<V>>>>,
    ttl: Option<Duration>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl: None,
        }
    }

    /// Entries older than `ttl` are treated as missing.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl: Some(ttl),
        }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.inner.lock().await;
        let expired = cache
            .get(key)
            .and_then(|entry| entry.expires_at)
            .is_some_and(|at| Instant::now() >= at);
        if expired {
            debug!("Cache EXPIRED");
            cache.remove(key);
            return None;
        }

        let value = cache.get(key).map(|entry| entry.value.clone());
        if value.is_some() {
            debug!("Cache HIT");
        } else {
            debug!("Cache MISS");
        }
        value
    }

    /// Stores `value` and drops every entry that has already expired, so keys
    /// that are never read again do not accumulate.
    pub async fn put(&self, key: K, value: V) {
        let mut cache = self.inner.lock().await;
        let now = Instant::now();
        if self.ttl.is_some() {
            let before = cache.len();
            cache.retain(|_, entry| entry.expires_at.is_none_or(|at| at > now));
            if cache.len() < before {
                debug!(evicted = before - cache.len(), "Cache EVICT");
            }
        }
        debug!("Cache PUT");
        let expires_at = self.ttl.map(|ttl| now + ttl);
        cache.insert(key, CacheEntry { value, expires_at });
    }
}

impl<K, V> Default for Cache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_get_put() {
        let cache = Cache::<String, i32>::new();

        assert!(cache.get(&"key1".to_string()).await.is_none());

        cache.put("key1".to_string(), 123).await;
        assert_eq!(cache.get(&"key1".to_string()).await, Some(123));

        assert!(cache.get(&"key2".to_string()).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_entries_expire() {
        let cache = Cache::<&'static str, i32>::with_ttl(Duration::from_millis(20));
        cache.put("ES0000000001", 7).await;
        assert_eq!(cache.get(&"ES0000000001").await, Some(7));

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get(&"ES0000000001").await.is_none());
    }

    #[tokio::test]
    async fn test_put_evicts_expired_entries() {
        let cache = Cache::<String, i32>::with_ttl(Duration::from_millis(20));
        for i in 0..50 {
            cache.put(format!("SYM{i}"), i).await;
        }
        assert_eq!(cache.inner.lock().await.len(), 50);

        tokio::time::sleep(Duration::from_millis(40)).await;
        cache.put("AAPL".to_string(), 1).await;

        let entries = cache.inner.lock().await;
        assert_eq!(entries.len(), 1);
        assert!(entries.contains_key("AAPL"));
    }
}

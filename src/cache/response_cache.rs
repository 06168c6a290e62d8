//! TTL + FIFO bounded response cache

use super::types::CacheKey;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    inserted_at: Instant,
}

#[derive(Debug)]
struct CacheInner<T> {
    entries: HashMap<CacheKey, CacheEntry<T>>,
    // Insertion order; the front is the eviction candidate.
    order: VecDeque<CacheKey>,
}

/// Bounded cache with fixed TTL and insertion-order eviction
#[derive(Debug)]
pub struct ResponseCache<T> {
    inner: Mutex<CacheInner<T>>,
    capacity: usize,
    ttl: Duration,
}

impl<T: Clone + Send> ResponseCache<T> {
    /// Create a cache with the given capacity and TTL
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity: capacity.max(1),
            ttl,
        }
    }

    /// Look up a fresh entry; expired entries are dropped on access
    pub async fn get(&self, key: &CacheKey) -> Option<T> {
        let mut inner = self.inner.lock().await;
        let expired = match inner.entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                debug!(key = %key.as_str(), "cache hit");
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            inner.entries.remove(key);
            inner.order.retain(|k| k != key);
        }
        None
    }

    /// Insert a value, evicting the oldest entry when full
    ///
    /// Overwriting an existing key keeps its original insertion slot.
    pub async fn put(&self, key: CacheKey, value: T) {
        let mut inner = self.inner.lock().await;

        let entry = CacheEntry {
            value,
            inserted_at: Instant::now(),
        };
        if inner.entries.insert(key.clone(), entry).is_none() {
            inner.order.push_back(key);
        }

        while inner.entries.len() > self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.entries.remove(&oldest);
                debug!(key = %oldest.as_str(), "evicted oldest cache entry");
            } else {
                break;
            }
        }
    }

    /// Drop every entry
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.entries.clear();
        inner.order.clear();
    }

    /// Number of entries currently held, including not-yet-collected expired ones
    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    /// Whether the cache holds no entries
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: usize) -> CacheKey {
        CacheKey::new("explain", "standard", &format!("text {n}"))
    }

    #[tokio::test]
    async fn get_returns_what_put_stored() {
        let cache = ResponseCache::new(10, Duration::from_secs(300));
        cache.put(key(1), "value".to_string()).await;
        assert_eq!(cache.get(&key(1)).await, Some("value".to_string()));
        assert_eq!(cache.get(&key(2)).await, None);
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache = ResponseCache::new(10, Duration::from_millis(50));
        cache.put(key(1), 1u32).await;
        assert_eq!(cache.get(&key(1)).await, Some(1));

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(cache.get(&key(1)).await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn eviction_is_insertion_order() {
        let cache = ResponseCache::new(3, Duration::from_secs(300));
        for n in 0..3 {
            cache.put(key(n), n).await;
        }

        // Re-reading entry 0 must not protect it: eviction is FIFO.
        assert_eq!(cache.get(&key(0)).await, Some(0));

        cache.put(key(3), 3).await;
        assert_eq!(cache.get(&key(0)).await, None);
        assert_eq!(cache.get(&key(1)).await, Some(1));
        assert_eq!(cache.get(&key(3)).await, Some(3));
        assert_eq!(cache.len().await, 3);
    }

    #[tokio::test]
    async fn overwrite_keeps_insertion_slot() {
        let cache = ResponseCache::new(2, Duration::from_secs(300));
        cache.put(key(0), 0).await;
        cache.put(key(1), 1).await;
        cache.put(key(0), 10).await; // overwrite, still oldest

        cache.put(key(2), 2).await;
        assert_eq!(cache.get(&key(0)).await, None);
        assert_eq!(cache.get(&key(1)).await, Some(1));
        assert_eq!(cache.get(&key(2)).await, Some(2));
    }

    #[tokio::test]
    async fn clear_empties_the_cache() {
        let cache = ResponseCache::new(10, Duration::from_secs(300));
        cache.put(key(1), 1).await;
        cache.clear().await;
        assert!(cache.is_empty().await);
        assert_eq!(cache.get(&key(1)).await, None);
    }
}

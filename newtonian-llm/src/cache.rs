//! Bounded cache of classifications with per-entry expiry

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

const MAX_CAPACITY: usize = 10_000;
const MAX_KEY_LENGTH: usize = 2_000;

#[derive(Debug, Clone)]
struct CacheEntry {
    response: String,
    expires_at: Instant,
}

pub struct ResponseCache {
    cache: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity.min(MAX_CAPACITY)).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let mut cache = self.cache.lock();
        let entry = cache.get(key)?;
        if Instant::now() < entry.expires_at {
            return Some(entry.response.clone());
        }
        cache.pop(key);
        None
    }

    pub fn set(&self, key: &str, response: String) {
        if key.len() > MAX_KEY_LENGTH {
            tracing::debug!("Cache key too long, skipping");
            return;
        }

        let entry = CacheEntry {
            response,
            expires_at: Instant::now() + self.ttl,
        };
        self.cache.lock().put(key.to_string(), entry);
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_basic_operations() {
        let cache = ResponseCache::new(10, Duration::from_secs(3600));
        cache.set("the red planet", "mars".to_string());
        assert_eq!(cache.get("the red planet"), Some("mars".to_string()));
        assert_eq!(cache.get("nonexistent"), None);
    }

    #[test]
    fn test_cache_expiry() {
        let cache = ResponseCache::new(10, Duration::ZERO);
        cache.set("key", "value".to_string());
        assert_eq!(cache.get("key"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_capacity_limit() {
        let cache = ResponseCache::new(3, Duration::from_secs(3600));
        for i in 0..5 {
            cache.set(&format!("key{}", i), format!("value{}", i));
        }
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("key0"), None);
        assert_eq!(cache.get("key1"), None);
        assert_eq!(cache.get("key4"), Some("value4".to_string()));
    }

    #[test]
    fn test_zero_capacity_still_caches_one() {
        let cache = ResponseCache::new(0, Duration::from_secs(60));
        cache.set("a", "1".to_string());
        assert_eq!(cache.get("a"), Some("1".to_string()));
    }

    #[test]
    fn test_cache_key_too_large() {
        let cache = ResponseCache::new(10, Duration::from_secs(60));
        let large_key = "a".repeat(MAX_KEY_LENGTH + 1);
        cache.set(&large_key, "value".to_string());
        assert_eq!(cache.get(&large_key), None);
    }
}

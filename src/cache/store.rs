//! The never-raising key-value store.

use super::backend::CacheBackend;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL applied by [`KeyValueCache::set`] when the caller does not pick
    /// one explicitly.
    pub default_ttl: Duration,
    pub enabled: bool,
    /// Entries serializing larger than this are silently not stored.
    pub max_entry_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            enabled: true,
            max_entry_size: 1024 * 1024,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    pub errors: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    deletes: AtomicU64,
    errors: AtomicU64,
}

impl AtomicStats {
    fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            sets: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }
    fn to_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Cache store with the "never raise" contract.
///
/// Backend or serialization failures degrade to a miss (reads) or a no-op
/// (writes), with a `warn!` diagnostic and an error counter bump. Callers
/// branch on `Option`/`bool`, never on an error.
pub struct KeyValueCache {
    config: CacheConfig,
    backend: Box<dyn CacheBackend>,
    stats: Arc<AtomicStats>,
}

impl KeyValueCache {
    pub fn new(config: CacheConfig, backend: Box<dyn CacheBackend>) -> Self {
        Self {
            config,
            backend,
            stats: Arc::new(AtomicStats::new()),
        }
    }

    /// Fetch and deserialize a value. Any failure is a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.config.enabled {
            return None;
        }
        match self.backend.get(key).await {
            Ok(Some(data)) => match serde_json::from_slice(&data) {
                Ok(value) => {
                    self.stats.hits.fetch_add(1, Ordering::Relaxed);
                    Some(value)
                }
                Err(err) => {
                    self.stats.errors.fetch_add(1, Ordering::Relaxed);
                    warn!(key, %err, "cache entry failed to deserialize, treating as miss");
                    None
                }
            },
            Ok(None) => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            Err(err) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                warn!(key, %err, "cache read failed, treating as miss");
                None
            }
        }
    }

    /// Store a value under the default TTL. Returns whether the write
    /// landed.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> bool {
        self.set_with_ttl(key, value, Some(self.config.default_ttl))
            .await
    }

    /// Store a value with an explicit TTL; `None` never expires.
    pub async fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> bool {
        if !self.config.enabled {
            return false;
        }
        let data = match serde_json::to_vec(value) {
            Ok(data) => data,
            Err(err) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                warn!(key, %err, "cache value failed to serialize, not stored");
                return false;
            }
        };
        if data.len() > self.config.max_entry_size {
            debug!(key, size = data.len(), "cache entry over size limit, not stored");
            return false;
        }
        match self.backend.set(key, &data, ttl).await {
            Ok(()) => {
                self.stats.sets.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(err) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                warn!(key, %err, "cache write failed");
                false
            }
        }
    }

    pub async fn delete(&self, key: &str) -> bool {
        if !self.config.enabled {
            return false;
        }
        match self.backend.delete(key).await {
            Ok(deleted) => {
                if deleted {
                    self.stats.deletes.fetch_add(1, Ordering::Relaxed);
                }
                deleted
            }
            Err(err) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                warn!(key, %err, "cache delete failed");
                false
            }
        }
    }

    pub async fn exists(&self, key: &str) -> bool {
        if !self.config.enabled {
            return false;
        }
        match self.backend.exists(key).await {
            Ok(exists) => exists,
            Err(err) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                warn!(key, %err, "cache exists check failed, reporting absent");
                false
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.to_stats()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheBackend, MemoryCache};
    use crate::Error;
    use async_trait::async_trait;

    /// Backend whose every operation fails at the transport layer.
    struct BrokenBackend;

    #[async_trait]
    impl CacheBackend for BrokenBackend {
        async fn get(&self, _: &str) -> crate::Result<Option<Vec<u8>>> {
            Err(Error::upstream(None, "connection refused"))
        }
        async fn set(&self, _: &str, _: &[u8], _: Option<Duration>) -> crate::Result<()> {
            Err(Error::upstream(None, "connection refused"))
        }
        async fn delete(&self, _: &str) -> crate::Result<bool> {
            Err(Error::upstream(None, "connection refused"))
        }
        async fn exists(&self, _: &str) -> crate::Result<bool> {
            Err(Error::upstream(None, "connection refused"))
        }
        async fn clear(&self) -> crate::Result<()> {
            Err(Error::upstream(None, "connection refused"))
        }
        async fn len(&self) -> crate::Result<usize> {
            Err(Error::upstream(None, "connection refused"))
        }
        fn name(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test]
    async fn values_round_trip_through_serialization() {
        let cache = KeyValueCache::new(CacheConfig::default(), Box::new(MemoryCache::new(16)));
        assert!(cache.set("book:1:text", &"hello world".to_string()).await);
        assert_eq!(
            cache.get::<String>("book:1:text").await.as_deref(),
            Some("hello world")
        );
        assert!(cache.exists("book:1:text").await);
        assert!(cache.delete("book:1:text").await);
        assert!(!cache.exists("book:1:text").await);
    }

    #[tokio::test]
    async fn broken_backend_degrades_to_miss() {
        let cache = KeyValueCache::new(CacheConfig::default(), Box::new(BrokenBackend));
        assert_eq!(cache.get::<String>("k").await, None);
        assert!(!cache.set("k", &"v").await);
        assert!(!cache.delete("k").await);
        assert!(!cache.exists("k").await);

        let stats = cache.stats();
        assert_eq!(stats.errors, 4);
        assert_eq!(stats.hits, 0);
    }

    #[tokio::test]
    async fn corrupt_entry_is_a_miss_not_an_error() {
        let backend = MemoryCache::new(16);
        backend.set("k", b"not json", None).await.unwrap();
        let cache = KeyValueCache::new(CacheConfig::default(), Box::new(backend));

        assert_eq!(cache.get::<u64>("k").await, None);
        assert_eq!(cache.stats().errors, 1);
    }

    #[tokio::test]
    async fn disabled_cache_is_inert() {
        let config = CacheConfig::default().with_enabled(false);
        let cache = KeyValueCache::new(config, Box::new(MemoryCache::new(16)));
        assert!(!cache.set("k", &1u32).await);
        assert_eq!(cache.get::<u32>("k").await, None);
    }
}

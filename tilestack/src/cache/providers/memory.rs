//! In-memory cache provider using moka.
//!
//! Moka gives lock-free reads, size-weighted LRU eviction and an async API,
//! which suits a cache hit on every tile request. `gc()` only runs pending
//! maintenance; eviction otherwise happens on its own.

use bytes::Bytes;
use moka::future::Cache as MokaCache;

use crate::cache::traits::{BoxFuture, Cache, GcResult, ServiceCacheError};

/// In-memory cache provider using moka.
pub struct MemoryCacheProvider {
    cache: MokaCache<String, Bytes>,
    max_size_bytes: u64,
}

impl MemoryCacheProvider {
    /// Create a new memory cache provider.
    ///
    /// # Arguments
    ///
    /// * `max_size_bytes` - Maximum total size of stored values
    pub fn new(max_size_bytes: u64) -> Self {
        let cache = MokaCache::builder()
            // Weight each entry by its data size; moka weights are u32
            .weigher(|_key: &String, value: &Bytes| -> u32 {
                value.len().min(u32::MAX as usize) as u32
            })
            .max_capacity(max_size_bytes)
            .build();

        Self {
            cache,
            max_size_bytes,
        }
    }
}

impl Cache for MemoryCacheProvider {
    fn set(&self, key: &str, value: Bytes) -> BoxFuture<'_, Result<(), ServiceCacheError>> {
        let key = key.to_string();
        Box::pin(async move {
            self.cache.insert(key, value).await;
            Ok(())
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Bytes>, ServiceCacheError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.cache.get(&key).await) })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.cache.remove(&key).await.is_some()) })
    }

    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.cache.contains_key(&key)) })
    }

    fn clear(&self) -> BoxFuture<'_, Result<(), ServiceCacheError>> {
        Box::pin(async move {
            self.cache.invalidate_all();
            self.cache.run_pending_tasks().await;
            Ok(())
        })
    }

    fn size_bytes(&self) -> u64 {
        self.cache.weighted_size()
    }

    fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    fn gc(&self) -> BoxFuture<'_, Result<GcResult, ServiceCacheError>> {
        Box::pin(async move {
            let start = std::time::Instant::now();
            let size_before = self.cache.weighted_size();
            let count_before = self.cache.entry_count();

            self.cache.run_pending_tasks().await;

            let size_after = self.cache.weighted_size();
            let count_after = self.cache.entry_count();

            Ok(GcResult {
                entries_removed: count_before.saturating_sub(count_after) as usize,
                bytes_freed: size_before.saturating_sub(size_after),
                duration_ms: start.elapsed().as_millis() as u64,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_provider_set_and_get() {
        let provider = MemoryCacheProvider::new(1_000_000);

        provider.set("key1", Bytes::from_static(&[1, 2, 3])).await.unwrap();

        let value = provider.get("key1").await.unwrap();
        assert_eq!(value.as_deref(), Some(&[1u8, 2, 3][..]));
        assert!(provider.get("nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_provider_delete() {
        let provider = MemoryCacheProvider::new(1_000_000);

        provider.set("key1", Bytes::from_static(&[1])).await.unwrap();
        assert!(provider.contains("key1").await.unwrap());

        assert!(provider.delete("key1").await.unwrap());
        assert!(!provider.contains("key1").await.unwrap());
        assert!(!provider.delete("key1").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_provider_clear() {
        let provider = MemoryCacheProvider::new(1_000_000);
        provider.set("a", Bytes::from_static(&[1])).await.unwrap();
        provider.set("b", Bytes::from_static(&[2])).await.unwrap();

        provider.clear().await.unwrap();

        assert!(provider.get("a").await.unwrap().is_none());
        assert_eq!(provider.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_memory_provider_size_tracking() {
        let provider = MemoryCacheProvider::new(1_000_000);
        provider.set("key1", Bytes::from(vec![0u8; 100])).await.unwrap();
        provider.set("key2", Bytes::from(vec![0u8; 200])).await.unwrap();

        provider.gc().await.unwrap();

        assert_eq!(provider.size_bytes(), 300);
        assert_eq!(provider.entry_count(), 2);
        assert_eq!(provider.max_size_bytes(), 1_000_000);
    }
}

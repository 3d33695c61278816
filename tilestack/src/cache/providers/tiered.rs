//! Two-level cache: a fast front tier backed by a persistent one.
//!
//! Reads try the front first and promote back-tier hits into it. Writes go
//! to both tiers.

use std::sync::Arc;

use bytes::Bytes;
use tracing::warn;

use crate::cache::traits::{BoxFuture, Cache, GcResult, ServiceCacheError};

pub struct TieredCache {
    front: Arc<dyn Cache>,
    back: Arc<dyn Cache>,
}

impl TieredCache {
    pub fn new(front: Arc<dyn Cache>, back: Arc<dyn Cache>) -> Self {
        Self { front, back }
    }
}

impl Cache for TieredCache {
    fn set(&self, key: &str, value: Bytes) -> BoxFuture<'_, Result<(), ServiceCacheError>> {
        let key = key.to_string();
        Box::pin(async move {
            self.front.set(&key, value.clone()).await?;
            self.back.set(&key, value).await
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Bytes>, ServiceCacheError>> {
        let key = key.to_string();
        Box::pin(async move {
            if let Some(value) = self.front.get(&key).await? {
                return Ok(Some(value));
            }
            let found = self.back.get(&key).await?;
            if let Some(ref value) = found {
                if let Err(e) = self.front.set(&key, value.clone()).await {
                    warn!(error = %e, key = %key, "Failed to promote cache entry");
                }
            }
            Ok(found)
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>> {
        let key = key.to_string();
        Box::pin(async move {
            let in_front = self.front.delete(&key).await?;
            let in_back = self.back.delete(&key).await?;
            Ok(in_front || in_back)
        })
    }

    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>> {
        let key = key.to_string();
        Box::pin(async move {
            if self.front.contains(&key).await? {
                return Ok(true);
            }
            self.back.contains(&key).await
        })
    }

    fn clear(&self) -> BoxFuture<'_, Result<(), ServiceCacheError>> {
        Box::pin(async move {
            self.front.clear().await?;
            self.back.clear().await
        })
    }

    // The back tier holds everything the front does
    fn size_bytes(&self) -> u64 {
        self.back.size_bytes()
    }

    fn entry_count(&self) -> u64 {
        self.back.entry_count()
    }

    fn max_size_bytes(&self) -> u64 {
        self.back.max_size_bytes()
    }

    fn gc(&self) -> BoxFuture<'_, Result<GcResult, ServiceCacheError>> {
        Box::pin(async move {
            let front = self.front.gc().await?;
            let back = self.back.gc().await?;
            Ok(GcResult {
                entries_removed: front.entries_removed + back.entries_removed,
                bytes_freed: front.bytes_freed + back.bytes_freed,
                duration_ms: front.duration_ms + back.duration_ms,
            })
        })
    }
}

//! Tile cache client.
//!
//! This client wraps a generic `Cache` with:
//! - Key translation for per-layer tiles and composites
//! - Entry encoding: bincode `{format, data}` so the format tag survives
//! - Metrics injection: cache hit/miss reporting
//!
//! # Key Format
//!
//! - Layer tiles: `tile:{provider}:{zoom}:{x}:{y}` (e.g. `tile:Bing Satellite:7:3:5`)
//! - Composites: `composite:{key}:{zoom}:{x}:{y}` (e.g. `composite:1_0_1.00_2_1_0.50:7:3:5`)

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::cache::traits::Cache;
use crate::compositor::TileImageData;
use crate::coord::TileCoord;
use crate::telemetry::FetchMetrics;

/// Stored form of a tile.
#[derive(Debug, Serialize, Deserialize)]
struct CachedTile {
    format: String,
    data: Vec<u8>,
}

/// Cache client for layer tiles and composites.
#[derive(Clone)]
pub struct TileCacheClient {
    cache: Arc<dyn Cache>,
    metrics: Option<Arc<FetchMetrics>>,
}

impl TileCacheClient {
    /// Create a new tile cache client without metrics.
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self {
            cache,
            metrics: None,
        }
    }

    /// Create a new tile cache client reporting hits and misses.
    pub fn with_metrics(cache: Arc<dyn Cache>, metrics: Arc<FetchMetrics>) -> Self {
        Self {
            cache,
            metrics: Some(metrics),
        }
    }

    /// The underlying generic cache.
    pub fn cache(&self) -> &Arc<dyn Cache> {
        &self.cache
    }

    /// Looks up one provider's tile.
    pub async fn lookup_tile(&self, provider: &str, tile: &TileCoord) -> Option<TileImageData> {
        let found = self.lookup(&Self::tile_key(provider, tile)).await;
        if let Some(ref m) = self.metrics {
            if found.is_some() {
                m.layer_cache_hit();
            } else {
                m.layer_cache_miss();
            }
        }
        found
    }

    /// Stores one provider's tile.
    pub async fn store_tile(&self, provider: &str, tile: &TileCoord, image: &TileImageData) {
        self.store(&Self::tile_key(provider, tile), image).await;
    }

    /// Looks up a composited tile by its layer-stack key.
    pub async fn lookup_composite(&self, key: &str, tile: &TileCoord) -> Option<TileImageData> {
        let found = self.lookup(&Self::composite_key(key, tile)).await;
        if let Some(ref m) = self.metrics {
            if found.is_some() {
                m.composite_cache_hit();
            } else {
                m.composite_cache_miss();
            }
        }
        found
    }

    /// Stores a composited tile under its layer-stack key.
    pub async fn store_composite(&self, key: &str, tile: &TileCoord, image: &TileImageData) {
        self.store(&Self::composite_key(key, tile), image).await;
    }

    async fn lookup(&self, key: &str) -> Option<TileImageData> {
        let bytes = match self.cache.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                trace!(key = %key, "Tile cache miss");
                return None;
            }
            Err(e) => {
                warn!(error = %e, key = %key, "Tile cache get failed");
                return None;
            }
        };

        match bincode::deserialize::<CachedTile>(&bytes) {
            Ok(entry) => {
                let image = TileImageData::new(entry.data, entry.format);
                image.is_valid().then_some(image)
            }
            Err(e) => {
                warn!(error = %e, key = %key, "Discarding undecodable cache entry");
                None
            }
        }
    }

    async fn store(&self, key: &str, image: &TileImageData) {
        if !image.is_valid() {
            return;
        }
        let entry = CachedTile {
            format: image.format.clone(),
            data: image.data.to_vec(),
        };
        let encoded = match bincode::serialize(&entry) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, key = %key, "Failed to encode cache entry");
                return;
            }
        };
        if let Err(e) = self.cache.set(key, Bytes::from(encoded)).await {
            warn!(error = %e, key = %key, "Tile cache set failed");
        }
    }

    pub(crate) fn tile_key(provider: &str, tile: &TileCoord) -> String {
        format!("tile:{}:{}:{}:{}", provider, tile.zoom, tile.x, tile.y)
    }

    pub(crate) fn composite_key(key: &str, tile: &TileCoord) -> String {
        format!("composite:{}:{}:{}:{}", key, tile.zoom, tile.x, tile.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheProvider;

    fn client() -> TileCacheClient {
        TileCacheClient::new(Arc::new(MemoryCacheProvider::new(1_000_000)))
    }

    #[test]
    fn test_key_formats() {
        let tile = TileCoord::new(3, 5, 7);
        assert_eq!(TileCacheClient::tile_key("Bing Satellite", &tile), "tile:Bing Satellite:7:3:5");
        assert_eq!(
            TileCacheClient::composite_key("1_0_1.00_2_1_0.50", &tile),
            "composite:1_0_1.00_2_1_0.50:7:3:5"
        );
    }

    #[tokio::test]
    async fn test_tile_store_and_lookup_keeps_format() {
        let client = client();
        let tile = TileCoord::new(3, 5, 7);
        let image = TileImageData::new(vec![1, 2, 3], "jpg");

        assert!(client.lookup_tile("Osm", &tile).await.is_none());
        client.store_tile("Osm", &tile, &image).await;

        assert_eq!(client.lookup_tile("Osm", &tile).await, Some(image));
        // Namespaced by provider and by kind
        assert!(client.lookup_tile("Other", &tile).await.is_none());
        assert!(client.lookup_composite("Osm", &tile).await.is_none());
    }

    #[tokio::test]
    async fn test_composite_store_and_lookup() {
        let client = client();
        let tile = TileCoord::new(1, 1, 2);
        let image = TileImageData::new(vec![9; 16], "png");

        client.store_composite("1_0_1.00", &tile, &image).await;
        assert_eq!(client.lookup_composite("1_0_1.00", &tile).await, Some(image));
        assert!(client
            .lookup_composite("1_0_1.00", &TileCoord::new(1, 1, 3))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_invalid_images_are_not_stored() {
        let client = client();
        let tile = TileCoord::new(0, 0, 0);

        client.store_tile("Osm", &tile, &TileImageData::invalid()).await;
        assert_eq!(client.cache().entry_count(), 0);
        assert!(client.lookup_tile("Osm", &tile).await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let client = client();
        let tile = TileCoord::new(0, 0, 1);
        client
            .cache()
            .set(&TileCacheClient::tile_key("Osm", &tile), Bytes::from_static(&[0xFF]))
            .await
            .unwrap();

        assert!(client.lookup_tile("Osm", &tile).await.is_none());
    }

    #[tokio::test]
    async fn test_metrics_count_hits_and_misses() {
        let metrics = Arc::new(FetchMetrics::new());
        let client = TileCacheClient::with_metrics(
            Arc::new(MemoryCacheProvider::new(1_000_000)),
            Arc::clone(&metrics),
        );
        let tile = TileCoord::new(0, 0, 1);

        client.lookup_tile("Osm", &tile).await;
        client
            .store_tile("Osm", &tile, &TileImageData::new(vec![1], "png"))
            .await;
        client.lookup_tile("Osm", &tile).await;
        client.lookup_composite("k", &tile).await;

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.layer_cache_hits, 1);
        assert_eq!(snapshot.layer_cache_misses, 1);
        assert_eq!(snapshot.composite_cache_misses, 1);
    }
}

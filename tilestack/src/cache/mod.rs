//! Tile caching
//!
//! A generic string → bytes [`Cache`] trait with memory, disk and tiered
//! providers, plus [`TileCacheClient`] which speaks in providers, tile
//! coordinates and composite keys.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tilestack::cache::{MemoryCacheProvider, TileCacheClient};
//!
//! let client = TileCacheClient::new(Arc::new(MemoryCacheProvider::new(64 << 20)));
//! client.store_tile("Bing Satellite", &tile, &image).await;
//! let hit = client.lookup_tile("Bing Satellite", &tile).await;
//! ```

mod clients;
mod providers;
mod traits;

pub use clients::TileCacheClient;
pub use providers::{DiskCacheProvider, DiskProviderConfig, MemoryCacheProvider, TieredCache};
pub use traits::{BoxFuture, Cache, GcResult, ServiceCacheError};

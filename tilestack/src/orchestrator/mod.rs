//! Multi-layer fetch orchestration
//!
//! Resolves every visible layer of a stack in parallel (per-layer cache
//! first, network on a miss), waits for all of them, then composites the
//! tiles that arrived in z-order. A cached composite short-circuits the
//! whole fan-out.
//!
//! # Concurrency
//!
//! One driver task per request owns all state. Child tasks (cache lookups,
//! downloads) live in a [`JoinSet`](tokio::task::JoinSet) and each yields
//! one layer event keyed by [`MapId`](crate::layer::MapId). A child that
//! panics resolves its layer as failed. Aborting the reply drops the driver,
//! which aborts every child still in flight.
//!
//! ```text
//! composite cache ──hit──► done
//!       │ miss
//!       ▼
//! per layer: cache lookup ──miss──► network ─┐
//!       │ hit                                │
//!       └────────────► countdown ◄───────────┘
//!                          │ zero
//!                          ▼
//!                 compositor (blocking pool) ──► store composite
//! ```

mod types;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::compositor::TileImageData;
use crate::coord::TileCoord;
use crate::layer::{LayerStack, MapId, MapLayer};
use crate::provider::{AsyncHttpClient, TileProvider};
use crate::tile::{fetch_from_network, FetchContext, FetchError, TileData, TileReply, TileRequest};
use types::{LayerEvent, PendingFetchSet};

/// Entry point for composited tile requests.
pub struct MultiLayerFetch;

impl MultiLayerFetch {
    /// Starts fetching `request` as a composite of `stack`'s visible layers.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<C>(ctx: FetchContext<C>, request: TileRequest, stack: &LayerStack) -> TileReply
    where
        C: AsyncHttpClient + 'static,
    {
        ctx.metrics.tile_requested();

        let layers = stack.visible_layers();
        if layers.is_empty() {
            ctx.metrics.tile_failed();
            return TileReply::failed(FetchError::NoVisibleLayers);
        }

        let driver = Driver {
            tile: request.coord(),
            composite_key: stack.generate_cache_key(),
            layers,
            ctx,
        };
        TileReply::spawn(async move {
            let metrics = Arc::clone(&driver.ctx.metrics);
            let result = driver.run().await;
            crate::tile::record_outcome(&metrics, &result);
            result
        })
    }
}

struct Driver<C> {
    ctx: FetchContext<C>,
    tile: TileCoord,
    layers: Vec<MapLayer>,
    composite_key: String,
}

impl<C: AsyncHttpClient + 'static> Driver<C> {
    async fn run(self) -> Result<TileData, FetchError> {
        if let Some(hit) = self.lookup_composite().await {
            debug!(tile = %self.tile, key = %self.composite_key, "Composite cache hit");
            return Ok(TileData::from_image(hit, true));
        }

        let mut children = JoinSet::new();
        let mut fetches = PendingFetchSet::default();
        let mut providers: HashMap<MapId, Arc<dyn TileProvider>> = HashMap::new();

        for layer in &self.layers {
            let map_id = layer.map_id();
            let Some(provider) = self.ctx.providers.provider_for_id(map_id) else {
                debug!(map_id = %map_id, "Skipping layer with unknown provider");
                continue;
            };
            if !provider.supports_zoom(self.tile.zoom) {
                debug!(
                    map_id = %map_id,
                    zoom = self.tile.zoom,
                    min = provider.min_zoom(),
                    max = provider.max_zoom(),
                    "Skipping layer outside its zoom range"
                );
                continue;
            }

            let task = if self.ctx.cache.is_some() {
                children.spawn(self.cache_lookup(map_id, Arc::clone(&provider)))
            } else {
                children.spawn(self.download(map_id, Arc::clone(&provider)))
            };
            fetches.track(map_id, task.id());
            providers.insert(map_id, provider);
        }

        debug!(
            tile = %self.tile,
            layers = self.layers.len(),
            pending = fetches.pending(),
            "Layer fetches issued"
        );

        while !fetches.is_done() {
            let Some(joined) = children.join_next_with_id().await else {
                break;
            };
            let event = match joined {
                Ok((_, event)) => event,
                Err(e) => {
                    if let Some(map_id) = fetches.layer_for_task(e.id()) {
                        warn!(map_id = %map_id, tile = %self.tile, error = %e, "Layer task died");
                        fetches.fail(map_id);
                    }
                    continue;
                }
            };
            match event {
                LayerEvent::CacheHit { map_id, image } => fetches.succeed(map_id, image),
                LayerEvent::CacheMiss { map_id } => {
                    let Some(provider) = providers.get(&map_id) else {
                        fetches.fail(map_id);
                        continue;
                    };
                    if provider.url_for(&self.tile).is_empty() {
                        debug!(map_id = %map_id, tile = %self.tile, "Provider has no URL for tile");
                        fetches.fail(map_id);
                        continue;
                    }
                    let task = children.spawn(self.download(map_id, Arc::clone(provider)));
                    fetches.replace(map_id, task.id());
                }
                LayerEvent::Network { map_id, result } => match result {
                    Ok(image) if image.is_valid() => fetches.succeed(map_id, image),
                    Ok(_) => fetches.fail(map_id),
                    Err(e) => {
                        debug!(map_id = %map_id, tile = %self.tile, error = %e, "Layer failed");
                        fetches.fail(map_id);
                    }
                },
            }
        }

        let Some(pairs) = fetches.take_for_composite(&self.layers) else {
            return Err(FetchError::CompositeFailure(
                "composite already produced".to_string(),
            ));
        };
        self.composite(pairs).await
    }

    async fn lookup_composite(&self) -> Option<TileImageData> {
        if self.composite_key.is_empty() {
            return None;
        }
        let cache = self.ctx.cache.as_ref()?;
        cache.lookup_composite(&self.composite_key, &self.tile).await
    }

    fn cache_lookup(
        &self,
        map_id: MapId,
        provider: Arc<dyn TileProvider>,
    ) -> impl Future<Output = LayerEvent> + Send + 'static {
        let cache = self.ctx.cache.clone();
        let tile = self.tile;
        async move {
            let found = match cache {
                Some(cache) => cache.lookup_tile(provider.name(), &tile).await,
                None => None,
            };
            match found {
                Some(image) => LayerEvent::CacheHit { map_id, image },
                None => LayerEvent::CacheMiss { map_id },
            }
        }
    }

    fn download(
        &self,
        map_id: MapId,
        provider: Arc<dyn TileProvider>,
    ) -> impl Future<Output = LayerEvent> + Send + 'static {
        let ctx = self.ctx.clone();
        let tile = self.tile;
        async move {
            let result = fetch_from_network(
                ctx.http.as_ref(),
                provider.as_ref(),
                &tile,
                ctx.cache.as_ref(),
                &ctx.metrics,
            )
            .await;
            LayerEvent::Network { map_id, result }
        }
    }

    async fn composite(
        &self,
        pairs: Vec<(MapLayer, TileImageData)>,
    ) -> Result<TileData, FetchError> {
        match pairs.len() {
            0 => {
                warn!(tile = %self.tile, layers = self.layers.len(), "Every layer failed");
                Err(FetchError::NoValidTiles)
            }
            1 => {
                let (_, image) = pairs.into_iter().next().ok_or(FetchError::NoValidTiles)?;
                Ok(TileData::from_image(image, false))
            }
            count => {
                let (layers, tiles): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
                let compositor = Arc::clone(&self.ctx.compositor);
                let started = Instant::now();

                let image = tokio::task::spawn_blocking(move || compositor.composite(&layers, &tiles))
                    .await
                    .map_err(|e| FetchError::CompositeFailure(e.to_string()))?;

                self.ctx
                    .metrics
                    .composite_built(started.elapsed().as_micros() as u64);

                if !image.is_valid() {
                    return Err(FetchError::CompositeFailure(
                        "compositor produced no image".to_string(),
                    ));
                }
                info!(
                    tile = %self.tile,
                    layers = count,
                    format = %image.format,
                    bytes = image.data.len(),
                    "Composited tile"
                );

                self.store_composite(&image);
                Ok(TileData::from_image(image, false))
            }
        }
    }

    /// Stores the composite without waiting for the write.
    ///
    /// The write is tracked by the context's background tracker so shutdown
    /// can drain it.
    fn store_composite(&self, image: &TileImageData) {
        if self.composite_key.is_empty() {
            return;
        }
        let Some(cache) = self.ctx.cache.clone() else {
            return;
        };
        let key = self.composite_key.clone();
        let tile = self.tile;
        let image = image.clone();
        self.ctx.background.spawn(async move {
            cache.store_composite(&key, &tile, &image).await;
        });
    }
}

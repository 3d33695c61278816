//! End-to-end tests for the layered fetch pipeline.
//!
//! These drive [`MappingEngine`] and [`MultiLayerFetch`] with a scripted HTTP
//! client and real caches, checking what reaches the network, what reaches
//! the compositor and what is cached.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use image::{Rgba, RgbaImage};
use parking_lot::Mutex;
use tempfile::TempDir;

use tilestack::cache::{Cache, DiskCacheProvider, DiskProviderConfig, MemoryCacheProvider, TileCacheClient};
use tilestack::compositor::{decode_rgba, encode_rgba, Compositor, TileCompositor, TileImageData};
use tilestack::coord::TileCoord;
use tilestack::engine::MappingEngine;
use tilestack::layer::{LayerStack, MapId, MapLayer};
use tilestack::orchestrator::MultiLayerFetch;
use tilestack::provider::{
    AsyncHttpClient, HttpResponse, ProviderError, ProviderRegistry, TileProvider,
};
use tilestack::tile::{FetchContext, FetchError, TileRequest};

// =============================================================================
// Test doubles
// =============================================================================

/// Answers by URL substring; records every URL; can delay responses.
#[derive(Clone, Default)]
struct ScriptedClient {
    routes: Arc<Vec<(String, Result<HttpResponse, ProviderError>)>>,
    delay: Option<Duration>,
    seen: Arc<Mutex<Vec<String>>>,
}

impl ScriptedClient {
    fn new(routes: Vec<(&str, Result<HttpResponse, ProviderError>)>) -> Self {
        Self {
            routes: Arc::new(
                routes
                    .into_iter()
                    .map(|(pattern, response)| (pattern.to_string(), response))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn requests(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

impl AsyncHttpClient for ScriptedClient {
    async fn get(
        &self,
        url: &str,
        _headers: &[(&str, &str)],
    ) -> Result<HttpResponse, ProviderError> {
        self.seen.lock().push(url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.routes
            .iter()
            .find(|(pattern, _)| url.contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| Ok(HttpResponse::status(404, "Not Found")))
    }
}

/// A provider serving `https://{name}.test/{z}/{x}/{y}`.
struct NamedProvider(&'static str);

impl TileProvider for NamedProvider {
    fn name(&self) -> &str {
        self.0
    }

    fn url_for(&self, tile: &TileCoord) -> String {
        format!("https://{}.test/{}", self.0, tile)
    }

    fn min_zoom(&self) -> u8 {
        0
    }

    fn max_zoom(&self) -> u8 {
        19
    }
}

/// Delegates to [`TileCompositor`] and records its inputs.
#[derive(Default)]
struct RecordingCompositor {
    calls: AtomicUsize,
    inputs: Mutex<Vec<(Vec<MapLayer>, Vec<TileImageData>)>>,
}

impl Compositor for RecordingCompositor {
    fn composite(&self, layers: &[MapLayer], tiles: &[TileImageData]) -> TileImageData {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().push((layers.to_vec(), tiles.to_vec()));
        TileCompositor::new().composite(layers, tiles)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn png(color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(8, 8, Rgba(color));
    encode_rgba(&img, "png").unwrap().0
}

fn ok(body: Vec<u8>) -> Result<HttpResponse, ProviderError> {
    Ok(HttpResponse::ok(body))
}

fn registry() -> Arc<ProviderRegistry> {
    let mut registry = ProviderRegistry::new();
    registry.register(MapId(1), Arc::new(NamedProvider("imagery")));
    registry.register(MapId(2), Arc::new(NamedProvider("roads")));
    registry.register(MapId(3), Arc::new(NamedProvider("labels")));
    Arc::new(registry)
}

fn stack(layers: &[(i32, i32, f64)]) -> LayerStack {
    layers
        .iter()
        .map(|&(id, z, opacity)| MapLayer::new(MapId(id), z, opacity, true))
        .collect()
}

fn tile() -> TileCoord {
    TileCoord::new(3, 5, 7)
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_three_layers_one_failing() {
    let client = ScriptedClient::new(vec![
        ("imagery.test", ok(png([255, 0, 0, 255]))),
        ("roads.test", Ok(HttpResponse::status(503, "Service Unavailable"))),
        ("labels.test", ok(png([0, 0, 255, 255]))),
    ]);
    let compositor = Arc::new(RecordingCompositor::default());
    let ctx = FetchContext::new(Arc::new(client.clone()), registry())
        .with_compositor(compositor.clone());

    let layers = stack(&[(1, 0, 1.0), (2, 1, 1.0), (3, 2, 0.5)]);
    let result = MultiLayerFetch::start(ctx, TileRequest::new(MapId(1), 3, 5, 7), &layers)
        .finished()
        .await
        .unwrap();

    assert_eq!(client.requests().len(), 3);
    assert_eq!(compositor.calls.load(Ordering::SeqCst), 1);

    let inputs = compositor.inputs.lock();
    let ids: Vec<_> = inputs[0].0.iter().map(|l| l.map_id()).collect();
    assert_eq!(ids, vec![MapId(1), MapId(3)]);

    let pixel = *decode_rgba(&result.data, &result.format).unwrap().get_pixel(0, 0);
    assert_eq!(pixel, Rgba([128, 0, 128, 255]));
}

#[tokio::test]
async fn test_all_layers_failing() {
    let client = ScriptedClient::new(vec![
        ("imagery.test", Err(ProviderError::HttpError("connection reset".into()))),
        ("roads.test", ok(Vec::new())),
    ]);
    let compositor = Arc::new(RecordingCompositor::default());
    let ctx = FetchContext::new(Arc::new(client), registry()).with_compositor(compositor.clone());

    let result = MultiLayerFetch::start(
        ctx,
        TileRequest::new(MapId(1), 3, 5, 7),
        &stack(&[(1, 0, 1.0), (2, 1, 1.0)]),
    )
    .finished()
    .await;

    assert_eq!(result, Err(FetchError::NoValidTiles));
    assert_eq!(compositor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_layer_cache_hits_feed_compositor_in_z_order() {
    let client = ScriptedClient::new(vec![]);
    let compositor = Arc::new(RecordingCompositor::default());
    let cache: Arc<dyn Cache> = Arc::new(MemoryCacheProvider::new(16 << 20));
    let ctx = FetchContext::new(Arc::new(client.clone()), registry())
        .with_compositor(compositor.clone())
        .with_cache(Arc::clone(&cache));
    let tiles = ctx.cache.clone().unwrap();

    let base = TileImageData::new(png([0, 255, 0, 255]), "png");
    let overlay = TileImageData::new(png([0, 0, 255, 255]), "png");
    tiles.store_tile("imagery", &tile(), &base).await;
    tiles.store_tile("roads", &tile(), &overlay).await;

    // Inserted out of order on purpose
    let mut layers = LayerStack::new();
    layers.add_layer(MapLayer::new(MapId(2), 1, 0.5, true));
    layers.add_layer(MapLayer::new(MapId(1), 0, 1.0, true));
    let key = layers.generate_cache_key();
    assert_eq!(key, "1_0_1.00_2_1_0.50");

    let result = MultiLayerFetch::start(ctx.clone(), TileRequest::new(MapId(1), 3, 5, 7), &layers)
        .finished()
        .await
        .unwrap();

    assert!(!result.cached);
    assert!(client.requests().is_empty());

    {
        let inputs = compositor.inputs.lock();
        assert_eq!(inputs.len(), 1);
        let (ref seen_layers, ref seen_tiles) = inputs[0];
        assert_eq!(seen_layers.len(), 2);
        assert_eq!(seen_layers[0].map_id(), MapId(1));
        assert_eq!(seen_layers[1].map_id(), MapId(2));
        assert_eq!(seen_tiles[0], base);
        assert_eq!(seen_tiles[1], overlay);
    }

    ctx.drain().await;
    assert!(tiles.lookup_composite(&key, &tile()).await.is_some());
    assert!(cache
        .contains(&format!("composite:{}:7:3:5", key))
        .await
        .unwrap());

    // Second request: served from the composite cache, compositor untouched
    let again = MultiLayerFetch::start(ctx, TileRequest::new(MapId(1), 3, 5, 7), &layers)
        .finished()
        .await
        .unwrap();
    assert!(again.cached);
    assert_eq!(again.data, result.data);
    assert_eq!(compositor.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_abort_cancels_outstanding_downloads() {
    let client = ScriptedClient::new(vec![
        ("imagery.test", ok(png([1, 1, 1, 255]))),
        ("roads.test", ok(png([2, 2, 2, 255]))),
    ])
    .with_delay(Duration::from_secs(30));
    let compositor = Arc::new(RecordingCompositor::default());
    let ctx = FetchContext::new(Arc::new(client.clone()), registry())
        .with_compositor(compositor.clone());

    let reply = MultiLayerFetch::start(
        ctx,
        TileRequest::new(MapId(1), 3, 5, 7),
        &stack(&[(1, 0, 1.0), (2, 1, 0.5)]),
    );

    // Let the downloads start
    for _ in 0..200 {
        if client.requests().len() == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    reply.abort();
    // Safe to repeat
    reply.abort();

    let result = tokio::time::timeout(Duration::from_secs(5), reply.finished())
        .await
        .expect("aborted reply should finish promptly");
    assert_eq!(result, Err(FetchError::Aborted));
    assert_eq!(compositor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_no_visible_layers() {
    let ctx = FetchContext::new(Arc::new(ScriptedClient::default()), registry());
    let mut layers = LayerStack::new();
    layers.add_layer(MapLayer::new(MapId(1), 0, 1.0, false));
    layers.add_layer(MapLayer::new(MapId(2), 1, 1.0, false));

    let result = MultiLayerFetch::start(ctx, TileRequest::new(MapId(1), 3, 5, 7), &layers)
        .finished()
        .await;
    assert_eq!(result, Err(FetchError::NoVisibleLayers));
}

#[tokio::test]
async fn test_engine_with_disk_cache_survives_restart() {
    let temp = TempDir::new().unwrap();
    let disk_config = DiskProviderConfig {
        directory: temp.path().to_path_buf(),
        max_size_bytes: 64 << 20,
        gc_interval: None,
    };
    let client = ScriptedClient::new(vec![
        ("imagery.test", ok(png([10, 10, 10, 255]))),
        ("roads.test", ok(png([200, 200, 200, 128]))),
    ]);
    let layers = stack(&[(1, 0, 1.0), (2, 1, 0.75)]);

    let first = {
        let disk = DiskCacheProvider::start(disk_config.clone()).await.unwrap();
        let ctx = FetchContext::new(Arc::new(client.clone()), registry())
            .with_cache(disk.clone() as Arc<dyn Cache>);
        let engine = MappingEngine::new(ctx);
        engine.set_layer_stack(MapId(50), layers.clone());

        let tile = engine.get_tile(MapId(50), 3, 5, 7).unwrap().finished().await.unwrap();
        engine.context().drain().await;
        disk.shutdown().await;
        tile
    };
    assert_eq!(client.requests().len(), 2);

    let disk = DiskCacheProvider::start(disk_config).await.unwrap();
    let ctx = FetchContext::new(Arc::new(client.clone()), registry())
        .with_cache(disk as Arc<dyn Cache>);
    let engine = MappingEngine::new(ctx);
    engine.set_layer_stack(MapId(50), layers);

    let second = engine.get_tile(MapId(50), 3, 5, 7).unwrap().finished().await.unwrap();
    assert!(second.cached);
    assert_eq!(second.data, first.data);
    assert_eq!(client.requests().len(), 2);
}

#[test]
fn test_composite_persisted_before_runtime_exits() {
    let temp = TempDir::new().unwrap();
    let disk_config = DiskProviderConfig {
        directory: temp.path().to_path_buf(),
        max_size_bytes: 64 << 20,
        gc_interval: None,
    };
    let layers = stack(&[(1, 0, 1.0), (2, 1, 0.5)]);
    let key = layers.generate_cache_key();

    for _ in 0..10 {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            let disk = DiskCacheProvider::start(disk_config.clone()).await.unwrap();
            disk.clear().await.unwrap();
            let client = ScriptedClient::new(vec![
                ("imagery.test", ok(png([10, 10, 10, 255]))),
                ("roads.test", ok(png([200, 200, 200, 128]))),
            ]);
            let ctx = FetchContext::new(Arc::new(client), registry())
                .with_cache(disk.clone() as Arc<dyn Cache>);
            let engine = MappingEngine::new(ctx);
            engine.set_layer_stack(MapId(50), layers.clone());

            engine.get_tile(MapId(50), 3, 5, 7).unwrap().finished().await.unwrap();
            engine.context().drain().await;
            disk.shutdown().await;
        });
        drop(runtime);

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let stored = runtime.block_on(async {
            let disk = DiskCacheProvider::start(disk_config.clone()).await.unwrap();
            TileCacheClient::new(disk as Arc<dyn Cache>)
                .lookup_composite(&key, &tile())
                .await
        });
        assert!(stored.is_some(), "composite {key} missing after shutdown");
    }
}

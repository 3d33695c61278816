//! Application bootstrap implementation.
//!
//! Starts services in dependency order: the disk cache first (it owns its
//! GC daemon), then the memory tier in front of it, then the provider
//! registry, HTTP client and routing engine.

use std::sync::Arc;

use tracing::{info, warn};

use super::config::AppConfig;
use super::error::AppError;
use crate::cache::{Cache, DiskCacheProvider, MemoryCacheProvider, TieredCache};
use crate::compositor::TileCompositor;
use crate::engine::MappingEngine;
use crate::layer::MapId;
use crate::provider::{load_no_tile_image, AsyncReqwestClient, ProviderRegistry, ProviderSettings};
use crate::telemetry::FetchMetrics;
use crate::tile::FetchContext;

/// A started tile pipeline.
///
/// # Example
///
/// ```ignore
/// use tilestack::app::{AppConfig, TileStackApp};
///
/// let app = TileStackApp::start(AppConfig::default()).await?;
/// if let Some(reply) = app.engine().get_tile(map_id, x, y, zoom) {
///     let tile = reply.finished().await?;
/// }
/// app.shutdown().await;
/// ```
pub struct TileStackApp {
    engine: MappingEngine<AsyncReqwestClient>,
    disk_cache: Option<Arc<DiskCacheProvider>>,
    cache: Option<Arc<dyn Cache>>,
    composite_map_id: Option<MapId>,
}

impl TileStackApp {
    /// Start the application with the given configuration.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the disk cache or the HTTP client cannot be
    /// created.
    pub async fn start(config: AppConfig) -> Result<Self, AppError> {
        Self::start_with_metrics(config, Arc::new(FetchMetrics::new())).await
    }

    /// Start the application reporting into `metrics`.
    pub async fn start_with_metrics(
        config: AppConfig,
        metrics: Arc<FetchMetrics>,
    ) -> Result<Self, AppError> {
        info!("Starting tile pipeline");

        let (disk_cache, cache) = if config.cache_enabled {
            let disk = DiskCacheProvider::start(config.disk_cache.provider_config())
                .await
                .map_err(AppError::DiskCacheStart)?;
            info!(
                directory = %config.disk_cache.directory.display(),
                max_size_bytes = config.disk_cache.max_size_bytes,
                gc_interval_secs = config.disk_cache.gc_interval_secs,
                "Disk cache started"
            );

            let memory: Arc<dyn Cache> =
                Arc::new(MemoryCacheProvider::new(config.memory_cache.max_size_bytes));
            let tiered: Arc<dyn Cache> = Arc::new(TieredCache::new(
                memory,
                Arc::clone(&disk) as Arc<dyn Cache>,
            ));
            (Some(disk), Some(tiered))
        } else {
            info!("Tile cache disabled");
            (None, None)
        };

        let settings = ProviderSettings {
            tianditu_key: config.tianditu_key.clone(),
            bing_no_tile: config
                .bing_no_tile_file
                .as_deref()
                .and_then(load_no_tile_image),
            tms_url: config.tms_url.clone(),
            tms_extension: config.tms_extension.clone(),
        };
        let registry = Arc::new(ProviderRegistry::with_defaults(&settings));
        info!(providers = registry.len(), "Provider registry built");

        let http = Arc::new(AsyncReqwestClient::with_timeout(config.http_timeout_secs)?);

        let mut ctx = FetchContext::new(http, registry)
            .with_compositor(Arc::new(TileCompositor::new()))
            .with_metrics(metrics);
        if let Some(ref cache) = cache {
            ctx = ctx.with_cache(Arc::clone(cache));
        }

        let engine = MappingEngine::new(ctx);
        let composite_map_id = engine.configure_layers(&config.layers);
        if composite_map_id.is_none() && !config.layers.is_empty() {
            warn!("Layer configuration produced no layers");
        }

        Ok(Self {
            engine,
            disk_cache,
            cache,
            composite_map_id,
        })
    }

    pub fn engine(&self) -> &MappingEngine<AsyncReqwestClient> {
        &self.engine
    }

    pub fn providers(&self) -> &ProviderRegistry {
        self.engine.context().providers.as_ref()
    }

    pub fn metrics(&self) -> &Arc<FetchMetrics> {
        self.engine.metrics()
    }

    /// The memory-over-disk cache, when caching is enabled.
    pub fn cache(&self) -> Option<&Arc<dyn Cache>> {
        self.cache.as_ref()
    }

    pub fn disk_cache(&self) -> Option<&Arc<DiskCacheProvider>> {
        self.disk_cache.as_ref()
    }

    /// Map id the configured layer stack is served under, if any.
    pub fn composite_map_id(&self) -> Option<MapId> {
        self.composite_map_id
    }

    /// Finishes pending cache writes, then stops background services.
    pub async fn shutdown(&self) {
        self.engine.context().drain().await;
        if let Some(disk) = &self.disk_cache {
            disk.shutdown().await;
        }
        info!("Tile pipeline stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(temp: &TempDir) -> AppConfig {
        let mut config = AppConfig::new(temp.path().join("cache"));
        config.disk_cache.gc_interval_secs = 0;
        config
    }

    #[tokio::test]
    async fn test_start_with_cache() {
        let temp = TempDir::new().unwrap();
        let app = TileStackApp::start(config(&temp)).await.unwrap();

        assert!(app.cache().is_some());
        assert!(app.disk_cache().unwrap().directory().exists());
        assert!(app.providers().len() > 10);
        assert!(app.composite_map_id().is_none());
        app.shutdown().await;
    }

    #[tokio::test]
    async fn test_start_without_cache() {
        let temp = TempDir::new().unwrap();
        let app = TileStackApp::start(config(&temp).without_cache()).await.unwrap();

        assert!(app.cache().is_none());
        assert!(app.engine().context().cache.is_none());
    }

    #[tokio::test]
    async fn test_layers_registered_at_start() {
        let temp = TempDir::new().unwrap();
        let mut config = config(&temp).without_cache();
        config.layers.insert("multiLayer".into(), "true".into());
        config.layers.insert("baseLayer".into(), "Bing Satellite".into());
        config
            .layers
            .insert("overlayLayers".into(), "Open Street Map".into());
        config.layers.insert("overlayOpacities".into(), "0.5".into());

        let app = TileStackApp::start(config).await.unwrap();
        let id = app.composite_map_id().unwrap();
        assert_eq!(id, MapId(1));
        assert_eq!(
            app.engine().layer_stack_for(id).unwrap().generate_cache_key(),
            "1_0_1.00_12_1_0.50"
        );
    }
}

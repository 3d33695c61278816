//! Shared dependencies of the fetch paths.

use std::sync::Arc;

use tokio_util::task::TaskTracker;

use crate::cache::{Cache, TileCacheClient};
use crate::compositor::{Compositor, TileCompositor};
use crate::provider::{AsyncHttpClient, ProviderRegistry};
use crate::telemetry::FetchMetrics;

/// Everything a tile fetch needs, cheap to clone into spawned tasks.
pub struct FetchContext<C> {
    pub http: Arc<C>,
    pub providers: Arc<ProviderRegistry>,
    /// Absent when caching is disabled
    pub cache: Option<TileCacheClient>,
    pub compositor: Arc<dyn Compositor>,
    pub metrics: Arc<FetchMetrics>,
    /// Writes that outlive the request that started them
    pub background: TaskTracker,
}

impl<C: AsyncHttpClient> FetchContext<C> {
    /// A context without cache, using [`TileCompositor`].
    pub fn new(http: Arc<C>, providers: Arc<ProviderRegistry>) -> Self {
        Self {
            http,
            providers,
            cache: None,
            compositor: Arc::new(TileCompositor::new()),
            metrics: Arc::new(FetchMetrics::new()),
            background: TaskTracker::new(),
        }
    }

    /// Enables caching through `cache`, reporting to this context's metrics.
    pub fn with_cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = Some(TileCacheClient::with_metrics(
            cache,
            Arc::clone(&self.metrics),
        ));
        self
    }

    pub fn with_compositor(mut self, compositor: Arc<dyn Compositor>) -> Self {
        self.compositor = compositor;
        self
    }

    /// Replaces the metrics sink, rewiring the cache client to it.
    pub fn with_metrics(mut self, metrics: Arc<FetchMetrics>) -> Self {
        self.cache = self
            .cache
            .map(|client| TileCacheClient::with_metrics(Arc::clone(client.cache()), Arc::clone(&metrics)));
        self.metrics = metrics;
        self
    }
}

impl<C> FetchContext<C> {
    /// Waits for every background write started so far.
    ///
    /// Writes started afterwards are still tracked, so this may be called
    /// again.
    pub async fn drain(&self) {
        self.background.close();
        self.background.wait().await;
        self.background.reopen();
    }
}

// Manual impl: `C` itself need not be Clone
impl<C> Clone for FetchContext<C> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            providers: Arc::clone(&self.providers),
            cache: self.cache.clone(),
            compositor: Arc::clone(&self.compositor),
            metrics: Arc::clone(&self.metrics),
            background: self.background.clone(),
        }
    }
}

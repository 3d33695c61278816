//! Request routing
//!
//! [`MappingEngine`] is the front door for tile requests. A map id either
//! names a provider directly, or names a registered [`LayerStack`] whose
//! visible layers decide the path: one visible layer is fetched on its own,
//! two or more go through [`MultiLayerFetch`].

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};

use crate::layer::{LayerParams, LayerStack, MapId};
use crate::orchestrator::MultiLayerFetch;
use crate::provider::AsyncHttpClient;
use crate::telemetry::FetchMetrics;
use crate::tile::{FetchContext, SingleTileFetch, TileReply, TileRequest};

/// Configuration key naming the map id a configured stack is served under.
pub const KEY_COMPOSITE_MAP_ID: &str = "compositeMapId";

/// Routes tile requests to the single-provider or composite path.
pub struct MappingEngine<C> {
    ctx: FetchContext<C>,
    stacks: DashMap<MapId, LayerStack>,
}

impl<C: AsyncHttpClient + 'static> MappingEngine<C> {
    pub fn new(ctx: FetchContext<C>) -> Self {
        Self {
            ctx,
            stacks: DashMap::new(),
        }
    }

    pub fn context(&self) -> &FetchContext<C> {
        &self.ctx
    }

    pub fn metrics(&self) -> &Arc<FetchMetrics> {
        &self.ctx.metrics
    }

    /// Serves `map_id` as a composite of `stack`, replacing any previous one.
    pub fn set_layer_stack(&self, map_id: MapId, stack: LayerStack) {
        debug!(map_id = %map_id, layers = stack.len(), key = %stack.generate_cache_key(), "Layer stack set");
        self.stacks.insert(map_id, stack);
    }

    pub fn remove_layer_stack(&self, map_id: MapId) -> Option<LayerStack> {
        self.stacks.remove(&map_id).map(|(_, stack)| stack)
    }

    /// A copy of the stack registered for `map_id`, if any.
    pub fn layer_stack_for(&self, map_id: MapId) -> Option<LayerStack> {
        self.stacks.get(&map_id).map(|entry| entry.value().clone())
    }

    /// Builds a stack from configuration parameters and registers it.
    ///
    /// The stack is served under `compositeMapId` when that key holds an
    /// integer, otherwise under the map id of its lowest layer. Returns the
    /// id used, or `None` when the configuration yields no layers.
    pub fn configure_layers(&self, params: &LayerParams) -> Option<MapId> {
        let stack = LayerStack::from_configuration(params, self.ctx.providers.as_ref());
        let first = stack.layers().first()?.map_id();

        let map_id = params
            .get(KEY_COMPOSITE_MAP_ID)
            .and_then(|v| v.trim().parse::<i32>().ok())
            .map(MapId)
            .unwrap_or(first);

        info!(
            map_id = %map_id,
            layers = stack.len(),
            key = %stack.generate_cache_key(),
            "Configured layer stack"
        );
        self.stacks.insert(map_id, stack);
        Some(map_id)
    }

    /// Starts a tile request.
    ///
    /// Returns `None` when nothing can be served: the provider is unknown or
    /// cannot serve the tile, or the registered stack has no visible layers.
    /// Must be called from within a tokio runtime.
    pub fn get_tile(&self, map_id: MapId, x: u32, y: u32, zoom: u8) -> Option<TileReply> {
        let request = TileRequest::new(map_id, x, y, zoom);

        // Clone out of the map so no shard lock is held while spawning
        let stack = self.layer_stack_for(map_id).filter(|stack| !stack.is_empty());
        let Some(stack) = stack else {
            return SingleTileFetch::start(self.ctx.clone(), request);
        };

        let visible = stack.visible_layers();
        match visible.as_slice() {
            [] => {
                debug!(map_id = %map_id, "Layer stack has no visible layers");
                None
            }
            [only] => SingleTileFetch::start(self.ctx.clone(), request.with_map_id(only.map_id())),
            _ => Some(MultiLayerFetch::start(self.ctx.clone(), request, &stack)),
        }
    }
}

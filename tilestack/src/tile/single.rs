//! Single-layer fetch: cache lookup, then network.
//!
//! [`fetch_from_network`] is the network leg shared with the multi-layer
//! orchestrator. [`SingleTileFetch`] runs the whole path for one provider.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, trace};

use super::{FetchContext, FetchError, TileData, TileReply, TileRequest};
use crate::cache::TileCacheClient;
use crate::compositor::TileImageData;
use crate::coord::TileCoord;
use crate::provider::{AsyncHttpClient, ProviderError, TileProvider};
use crate::telemetry::FetchMetrics;

/// Builds the request headers for a provider.
fn request_headers(provider: &dyn TileProvider) -> Vec<(&'static str, &str)> {
    let mut headers = vec![("Accept", "*/*")];
    if let Some(referrer) = provider.referrer() {
        headers.push(("Referer", referrer));
    }
    if let Some(token) = provider.token() {
        headers.push(("User-Token", token));
    }
    headers
}

/// Downloads one provider's tile and validates the response.
///
/// Checks run in a fixed order: transport, status, empty body, placeholder
/// sentinel, elevation re-encoding, format detection. A valid tile is
/// stored in the per-layer cache before it is returned.
pub async fn fetch_from_network<C: AsyncHttpClient>(
    http: &C,
    provider: &dyn TileProvider,
    tile: &TileCoord,
    cache: Option<&TileCacheClient>,
    metrics: &FetchMetrics,
) -> Result<TileImageData, FetchError> {
    let url = provider.url_for(tile);
    if url.is_empty() {
        return Err(FetchError::Communication(format!(
            "{} has no URL for tile {}",
            provider.name(),
            tile
        )));
    }

    metrics.network_request();
    let result = download(http, provider, &url).await;
    match result {
        Ok(image) => {
            metrics.downloaded(image.data.len() as u64);
            trace!(provider = provider.name(), tile = %tile, bytes = image.data.len(), "Tile downloaded");
            if let Some(cache) = cache {
                cache.store_tile(provider.name(), tile, &image).await;
            }
            Ok(image)
        }
        Err(e) => {
            metrics.network_failure();
            debug!(provider = provider.name(), tile = %tile, error = %e, "Tile download failed");
            Err(e)
        }
    }
}

async fn download<C: AsyncHttpClient>(
    http: &C,
    provider: &dyn TileProvider,
    url: &str,
) -> Result<TileImageData, FetchError> {
    let headers = request_headers(provider);
    let response = http
        .get(url, &headers)
        .await
        .map_err(|e| FetchError::Communication(e.to_string()))?;

    if !response.is_success() {
        return Err(FetchError::Communication(
            ProviderError::Status {
                code: response.status,
                reason: response.reason,
            }
            .to_string(),
        ));
    }

    let body = response.body;
    if body.is_empty() {
        return Err(FetchError::Parse("Image is empty".to_string()));
    }
    if provider.is_placeholder(&body) {
        return Err(FetchError::Communication(
            "Tile above zoom level".to_string(),
        ));
    }

    let data = if provider.is_elevation() {
        let serialized = provider.serialize(&body);
        if serialized.is_empty() {
            return Err(FetchError::Parse(
                "Failed to serialize terrain tile".to_string(),
            ));
        }
        Bytes::from(serialized)
    } else {
        body
    };

    let format = provider
        .image_format(&data)
        .ok_or_else(|| FetchError::Parse("Unknown image format".to_string()))?;

    Ok(TileImageData::new(data, format))
}

/// Fetch of one tile from one provider.
pub struct SingleTileFetch;

impl SingleTileFetch {
    /// Starts fetching `request.map_id()` from its provider.
    ///
    /// Returns `None` when the request cannot be served at all: the provider
    /// is unknown, the zoom is outside its range, or it has no URL for the
    /// tile.
    pub fn start<C>(ctx: FetchContext<C>, request: TileRequest) -> Option<TileReply>
    where
        C: AsyncHttpClient + 'static,
    {
        let provider = ctx.providers.provider_for_id(request.map_id())?;
        let tile = request.coord();
        if !provider.supports_zoom(tile.zoom) || provider.url_for(&tile).is_empty() {
            debug!(map_id = %request.map_id(), tile = %tile, "Provider cannot serve tile");
            return None;
        }

        ctx.metrics.tile_requested();
        Some(TileReply::spawn(async move {
            let result = Self::run(&ctx, provider, tile).await;
            super::record_outcome(&ctx.metrics, &result);
            result
        }))
    }

    /// Like [`start`](Self::start) but reports why a request cannot be served.
    pub fn check<C: AsyncHttpClient>(
        ctx: &FetchContext<C>,
        request: &TileRequest,
    ) -> Result<(), FetchError> {
        let provider = ctx
            .providers
            .provider_for_id(request.map_id())
            .ok_or(FetchError::UnknownProvider(request.map_id()))?;
        if !provider.supports_zoom(request.zoom()) {
            return Err(FetchError::ZoomOutOfRange {
                zoom: request.zoom(),
                min: provider.min_zoom(),
                max: provider.max_zoom(),
            });
        }
        Ok(())
    }

    async fn run<C: AsyncHttpClient>(
        ctx: &FetchContext<C>,
        provider: Arc<dyn TileProvider>,
        tile: TileCoord,
    ) -> Result<TileData, FetchError> {
        if let Some(cache) = &ctx.cache {
            if let Some(image) = cache.lookup_tile(provider.name(), &tile).await {
                return Ok(TileData::from_image(image, true));
            }
        }
        let image = fetch_from_network(
            ctx.http.as_ref(),
            provider.as_ref(),
            &tile,
            ctx.cache.as_ref(),
            &ctx.metrics,
        )
        .await?;
        Ok(TileData::from_image(image, false))
    }
}

//! USGS National Map imagery provider.
//!
//! Orthoimagery for the United States from the USGS National Map, served
//! through an ArcGIS tile endpoint (`{z}/{y}/{x}`). Public domain, no key.

use super::types::TileProvider;
use crate::coord::TileCoord;

/// Base URL for USGS imagery tiles.
const USGS_BASE_URL: &str =
    "https://basemap.nationalmap.gov/arcgis/rest/services/USGSImageryOnly/MapServer/tile";

/// Maximum zoom level supported by USGS.
const MAX_ZOOM: u8 = 16;

/// USGS imagery provider.
#[derive(Debug, Default)]
pub struct UsgsProvider;

impl UsgsProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TileProvider for UsgsProvider {
    fn name(&self) -> &str {
        "USGS Imagery"
    }

    fn url_for(&self, tile: &TileCoord) -> String {
        format!("{}/{}/{}/{}", USGS_BASE_URL, tile.zoom, tile.y, tile.x)
    }

    fn min_zoom(&self) -> u8 {
        0
    }

    fn max_zoom(&self) -> u8 {
        MAX_ZOOM
    }
}

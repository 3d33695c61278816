//! OpenStreetMap standard tile layer.
//!
//! Subject to the OSM tile usage policy:
//! <https://operations.osmfoundation.org/policies/tiles/>

use super::types::TileProvider;
use crate::coord::TileCoord;

#[derive(Debug, Default)]
pub struct OsmProvider;

impl OsmProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TileProvider for OsmProvider {
    fn name(&self) -> &str {
        "Open Street Map"
    }

    fn url_for(&self, tile: &TileCoord) -> String {
        format!(
            "https://tile.openstreetmap.org/{}/{}/{}.png",
            tile.zoom, tile.x, tile.y
        )
    }

    fn min_zoom(&self) -> u8 {
        0
    }

    fn max_zoom(&self) -> u8 {
        19
    }
}

//! GaoDe (AutoNavi) tile provider.
//!
//! Tiles are mirrored across `webst01..webst04`; the server rejects
//! requests that do not carry the amap referer.

use super::types::TileProvider;
use crate::coord::{server_shard, TileCoord};

const GAODE_SERVERS: u32 = 4;
const GAODE_REFERER: &str = "https://ditu.amap.com/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaoDeStyle {
    Street,
    Satellite,
}

pub struct GaoDeProvider {
    style: GaoDeStyle,
}

impl GaoDeProvider {
    pub fn new(style: GaoDeStyle) -> Self {
        Self { style }
    }

    fn style_id(&self) -> u8 {
        match self.style {
            GaoDeStyle::Street => 7,
            GaoDeStyle::Satellite => 6,
        }
    }
}

impl TileProvider for GaoDeProvider {
    fn name(&self) -> &str {
        match self.style {
            GaoDeStyle::Street => "GaoDe Street",
            GaoDeStyle::Satellite => "GaoDe Satellite",
        }
    }

    fn url_for(&self, tile: &TileCoord) -> String {
        format!(
            "https://webst0{}.is.autonavi.com/appmaptile?style={}&x={}&y={}&z={}",
            server_shard(tile, GAODE_SERVERS) + 1,
            self.style_id(),
            tile.x,
            tile.y,
            tile.zoom
        )
    }

    fn min_zoom(&self) -> u8 {
        1
    }

    fn max_zoom(&self) -> u8 {
        18
    }

    fn referrer(&self) -> Option<&str> {
        Some(GAODE_REFERER)
    }
}

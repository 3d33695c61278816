//! Tianditu (National Platform for Common GeoSpatial Information Services).
//!
//! WMTS endpoint spread over eight `t0..t7` hosts. Every request needs an
//! API key (`tk`); without one the provider yields an empty URL and its
//! tiles are treated as unavailable.

use super::types::TileProvider;
use crate::coord::{server_shard, TileCoord};

const TIANDITU_SERVERS: u32 = 8;
const TIANDITU_REFERER: &str = "https://map.tianditu.gov.cn/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiandituStyle {
    Street,
    Satellite,
    Terrain,
}

impl TiandituStyle {
    /// WMTS layer name, without the `_w` matrix-set suffix.
    fn layer(&self) -> &'static str {
        match self {
            TiandituStyle::Street => "vec",
            TiandituStyle::Satellite => "img",
            TiandituStyle::Terrain => "ter",
        }
    }
}

pub struct TiandituProvider {
    style: TiandituStyle,
    key: String,
}

impl TiandituProvider {
    pub fn new(style: TiandituStyle, key: impl Into<String>) -> Self {
        Self {
            style,
            key: key.into(),
        }
    }
}

impl TileProvider for TiandituProvider {
    fn name(&self) -> &str {
        match self.style {
            TiandituStyle::Street => "Tianditu Street",
            TiandituStyle::Satellite => "Tianditu Satellite",
            TiandituStyle::Terrain => "Tianditu Terrain",
        }
    }

    fn url_for(&self, tile: &TileCoord) -> String {
        if self.key.is_empty() {
            return String::new();
        }
        let layer = self.style.layer();
        format!(
            "http://t{}.tianditu.gov.cn/{}_w/wmts?SERVICE=WMTS&REQUEST=GetTile&VERSION=1.0.0\
             &LAYER={}&STYLE=default&TILEMATRIXSET=w&FORMAT=tiles\
             &TILEMATRIX={}&TILEROW={}&TILECOL={}&tk={}",
            server_shard(tile, TIANDITU_SERVERS),
            layer,
            layer,
            tile.zoom,
            tile.y,
            tile.x,
            self.key
        )
    }

    fn min_zoom(&self) -> u8 {
        1
    }

    fn max_zoom(&self) -> u8 {
        18
    }

    fn referrer(&self) -> Option<&str> {
        Some(TIANDITU_REFERER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_construction() {
        let provider = TiandituProvider::new(TiandituStyle::Satellite, "abc123");
        assert_eq!(
            provider.url_for(&TileCoord::new(3, 5, 7)),
            "http://t5.tianditu.gov.cn/img_w/wmts?SERVICE=WMTS&REQUEST=GetTile&VERSION=1.0.0\
             &LAYER=img&STYLE=default&TILEMATRIXSET=w&FORMAT=tiles\
             &TILEMATRIX=7&TILEROW=5&TILECOL=3&tk=abc123"
        );
    }

    #[test]
    fn test_missing_key_yields_empty_url() {
        let provider = TiandituProvider::new(TiandituStyle::Street, "");
        assert!(provider.url_for(&TileCoord::new(1, 1, 5)).is_empty());
    }
}

//! Google Maps tile provider.
//!
//! Uses the public `vt` endpoint, mirrored across `mt0..mt3`.
//!
//! # Coordinate System
//!
//! Google Maps uses standard Web Mercator XYZ tile coordinates:
//! - X: Column (0 to 2^zoom - 1, west to east)
//! - Y: Row (0 to 2^zoom - 1, north to south)
//! - Z: Zoom level (0 to 22)

use super::types::TileProvider;
use crate::coord::{server_shard, TileCoord};

const GOOGLE_SERVERS: u32 = 4;

/// Google tile layers, by `lyrs` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoogleStyle {
    Satellite,
    Street,
    Terrain,
    Hybrid,
}

impl GoogleStyle {
    fn lyrs(&self) -> char {
        match self {
            GoogleStyle::Satellite => 's',
            GoogleStyle::Street => 'm',
            GoogleStyle::Terrain => 't',
            GoogleStyle::Hybrid => 'y',
        }
    }
}

/// Google Maps provider for one layer.
pub struct GoogleProvider {
    style: GoogleStyle,
}

impl GoogleProvider {
    pub fn new(style: GoogleStyle) -> Self {
        Self { style }
    }
}

impl TileProvider for GoogleProvider {
    fn name(&self) -> &str {
        match self.style {
            GoogleStyle::Satellite => "Google Satellite",
            GoogleStyle::Street => "Google Street",
            GoogleStyle::Terrain => "Google Terrain",
            GoogleStyle::Hybrid => "Google Hybrid",
        }
    }

    fn url_for(&self, tile: &TileCoord) -> String {
        format!(
            "https://mt{}.google.com/vt/lyrs={}&x={}&y={}&z={}",
            server_shard(tile, GOOGLE_SERVERS),
            self.style.lyrs(),
            tile.x,
            tile.y,
            tile.zoom
        )
    }

    fn min_zoom(&self) -> u8 {
        0
    }

    fn max_zoom(&self) -> u8 {
        22
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_construction() {
        let provider = GoogleProvider::new(GoogleStyle::Satellite);
        assert_eq!(
            provider.url_for(&TileCoord::new(3, 5, 7)),
            "https://mt1.google.com/vt/lyrs=s&x=3&y=5&z=7"
        );
    }

    #[test]
    fn test_style_codes() {
        let tile = TileCoord::new(0, 0, 0);
        assert!(GoogleProvider::new(GoogleStyle::Street).url_for(&tile).contains("lyrs=m"));
        assert!(GoogleProvider::new(GoogleStyle::Terrain).url_for(&tile).contains("lyrs=t"));
        assert!(GoogleProvider::new(GoogleStyle::Hybrid).url_for(&tile).contains("lyrs=y"));
    }

    #[test]
    fn test_zoom_range() {
        let provider = GoogleProvider::new(GoogleStyle::Hybrid);
        assert_eq!(provider.name(), "Google Hybrid");
        assert!(provider.supports_zoom(0));
        assert!(provider.supports_zoom(22));
        assert!(!provider.supports_zoom(23));
    }
}

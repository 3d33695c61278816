//! Self-hosted TMS tile sets.
//!
//! A TMS directory stores tiles as `{base}/{z}/{x}/{y}.{ext}` with rows
//! counted from the bottom, so the request row is flipped before use.

use super::types::TileProvider;
use crate::coord::TileCoord;

/// Provider for a TMS tile tree rooted at `base_url`.
#[derive(Debug, Clone)]
pub struct TmsProvider {
    base_url: String,
    extension: String,
    min_zoom: u8,
    max_zoom: u8,
}

impl TmsProvider {
    /// Creates a provider.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Tile tree root, with or without a trailing slash
    /// * `extension` - File extension of the stored tiles (`png`, `jpg`)
    pub fn new(base_url: impl Into<String>, extension: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            extension: extension.into(),
            min_zoom: 0,
            max_zoom: 18,
        }
    }

    pub fn with_zoom_range(mut self, min_zoom: u8, max_zoom: u8) -> Self {
        self.min_zoom = min_zoom.min(max_zoom);
        self.max_zoom = max_zoom.max(min_zoom);
        self
    }
}

impl TileProvider for TmsProvider {
    fn name(&self) -> &str {
        "TMS Local"
    }

    fn url_for(&self, tile: &TileCoord) -> String {
        if self.base_url.is_empty() {
            return String::new();
        }
        match tile.tms_y() {
            Some(row) => format!(
                "{}/{}/{}/{}.{}",
                self.base_url, tile.zoom, tile.x, row, self.extension
            ),
            None => String::new(),
        }
    }

    fn min_zoom(&self) -> u8 {
        self.min_zoom
    }

    fn max_zoom(&self) -> u8 {
        self.max_zoom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_flips_row() {
        let provider = TmsProvider::new("http://tiles.local/set/", "png");
        // zoom 3 has 8 rows; row 5 from the top is row 2 from the bottom
        assert_eq!(
            provider.url_for(&TileCoord::new(3, 5, 3)),
            "http://tiles.local/set/3/3/2.png"
        );
    }

    #[test]
    fn test_out_of_grid_row_yields_empty_url() {
        let provider = TmsProvider::new("http://tiles.local", "jpg");
        assert!(provider.url_for(&TileCoord::new(0, 9, 3)).is_empty());
        assert!(TmsProvider::new("", "png")
            .url_for(&TileCoord::new(0, 0, 1))
            .is_empty());
    }

    #[test]
    fn test_zoom_range() {
        let provider = TmsProvider::new("http://tiles.local", "png").with_zoom_range(4, 12);
        assert!(!provider.supports_zoom(3));
        assert!(provider.supports_zoom(12));
        assert!(!provider.supports_zoom(13));
    }
}

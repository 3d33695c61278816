//! Terrarium elevation tiles.
//!
//! Heights are packed into PNG colour channels as
//! `R * 256 + G + B / 256 - 32768` metres. The provider unpacks them into an
//! [`ElevationGrid`] and stores that bincode-encoded under the `bin` tag.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::TileProvider;
use crate::coord::TileCoord;

/// Format tag for serialized elevation grids.
pub const ELEVATION_FORMAT: &str = "bin";

const TERRARIUM_BASE_URL: &str = "https://s3.amazonaws.com/elevation-tiles-prod/terrarium";

/// Height samples for one tile, row-major from the north-west corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationGrid {
    pub width: u32,
    pub height: u32,
    pub min: f32,
    pub max: f32,
    pub heights: Vec<f32>,
}

impl ElevationGrid {
    /// Decodes a Terrarium PNG into a height grid.
    pub fn from_terrarium(png: &[u8]) -> Option<Self> {
        let rgb = image::load_from_memory(png).ok()?.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return None;
        }

        let heights: Vec<f32> = rgb
            .pixels()
            .map(|p| {
                let [r, g, b] = p.0;
                f32::from(r) * 256.0 + f32::from(g) + f32::from(b) / 256.0 - 32768.0
            })
            .collect();
        let min = heights.iter().copied().fold(f32::INFINITY, f32::min);
        let max = heights.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        Some(Self {
            width,
            height,
            min,
            max,
            heights,
        })
    }

    /// Decodes a grid previously produced by [`TerrariumProvider::serialize`].
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        bincode::deserialize(data).ok()
    }
}

/// Mapzen/AWS Terrarium elevation provider.
#[derive(Debug, Default)]
pub struct TerrariumProvider;

impl TerrariumProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TileProvider for TerrariumProvider {
    fn name(&self) -> &str {
        "Terrarium Elevation"
    }

    fn url_for(&self, tile: &TileCoord) -> String {
        format!(
            "{}/{}/{}/{}.png",
            TERRARIUM_BASE_URL, tile.zoom, tile.x, tile.y
        )
    }

    fn min_zoom(&self) -> u8 {
        0
    }

    fn max_zoom(&self) -> u8 {
        15
    }

    fn is_elevation(&self) -> bool {
        true
    }

    fn image_format(&self, data: &[u8]) -> Option<String> {
        (!data.is_empty()).then(|| ELEVATION_FORMAT.to_string())
    }

    fn serialize(&self, data: &[u8]) -> Vec<u8> {
        let Some(grid) = ElevationGrid::from_terrarium(data) else {
            debug!(bytes = data.len(), "Terrarium tile did not decode");
            return Vec::new();
        };
        bincode::serialize(&grid).unwrap_or_default()
    }
}

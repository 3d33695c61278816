//! Tile compositing
//!
//! Blends an ordered list of layer tiles into one image. The first usable
//! tile becomes the base; every later one is stretched to the base size and
//! painted over it at its layer's opacity. Tiles that are missing or fail to
//! decode are skipped, so a composite degrades to fewer layers instead of
//! failing outright.
//!
//! # Example
//!
//! ```ignore
//! use tilestack::compositor::{Compositor, TileCompositor};
//!
//! let result = TileCompositor::new().composite(&layers, &tiles);
//! if result.is_valid() {
//!     // result.data holds PNG or JPEG bytes, result.format the tag
//! }
//! ```

mod blend;
mod codec;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::layer::MapLayer;

pub use blend::composite_images;
pub use codec::{decode_rgba, encode_rgba, image_format_tag, is_jpeg_tag, JPEG_QUALITY};

/// Encoded tile bytes plus their format tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileImageData {
    pub data: Bytes,
    pub format: String,
}

impl TileImageData {
    pub fn new(data: impl Into<Bytes>, format: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            format: format.into(),
        }
    }

    /// An unusable result.
    pub fn invalid() -> Self {
        Self::default()
    }

    /// True when there are bytes and a format tag.
    pub fn is_valid(&self) -> bool {
        !self.data.is_empty() && !self.format.is_empty()
    }
}

/// Combines per-layer tiles into one tile.
///
/// `layers` and `tiles` are parallel slices in paint order. Implementations
/// return [`TileImageData::invalid`] when nothing usable comes out.
pub trait Compositor: Send + Sync {
    fn composite(&self, layers: &[MapLayer], tiles: &[TileImageData]) -> TileImageData;
}

/// Production compositor: straight-alpha source-over blending.
#[derive(Debug, Clone, Copy, Default)]
pub struct TileCompositor;

impl TileCompositor {
    pub fn new() -> Self {
        Self
    }
}

impl Compositor for TileCompositor {
    fn composite(&self, layers: &[MapLayer], tiles: &[TileImageData]) -> TileImageData {
        if layers.len() != tiles.len() {
            warn!(
                layers = layers.len(),
                tiles = tiles.len(),
                "Layer and tile counts differ"
            );
            return TileImageData::invalid();
        }
        if layers.is_empty() {
            return TileImageData::invalid();
        }

        let usable = |i: usize| layers[i].visible() && tiles[i].is_valid();

        // First visible tile that decodes is the base
        let Some((base_index, mut base)) = (0..layers.len())
            .filter(|&i| usable(i))
            .find_map(|i| decode_rgba(&tiles[i].data, &tiles[i].format).map(|img| (i, img)))
        else {
            debug!("No tile decoded, nothing to composite");
            return TileImageData::invalid();
        };
        let format = tiles[base_index].format.clone();
        let mut blended = 0usize;

        for i in (base_index + 1)..layers.len() {
            if !usable(i) {
                continue;
            }
            let Some(overlay) = decode_rgba(&tiles[i].data, &tiles[i].format) else {
                debug!(map_id = %layers[i].map_id(), "Skipping undecodable layer tile");
                continue;
            };
            base = composite_images(&base, &overlay, layers[i].opacity());
            blended += 1;
        }

        if blended == 0 {
            return tiles[base_index].clone();
        }

        match encode_rgba(&base, &format) {
            Some((data, format)) if !data.is_empty() => TileImageData::new(data, format),
            _ => {
                warn!(format = %format, "Failed to encode composited tile");
                TileImageData::invalid()
            }
        }
    }
}

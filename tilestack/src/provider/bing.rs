//! Bing Maps tile provider
//!
//! Bing addresses tiles by quadkey and mirrors them across four
//! `ecn.t{0..3}` hosts. Areas without imagery are answered with a fixed
//! "no tile" image instead of an error status, so the provider can be given
//! those bytes to recognise them.

use bytes::Bytes;

use super::types::TileProvider;
use crate::coord::{server_shard, tile_to_quadkey, TileCoord};

const BING_SERVERS: u32 = 4;

/// Bing tile styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BingStyle {
    Satellite,
    Road,
    Hybrid,
}

impl BingStyle {
    fn code(&self) -> char {
        match self {
            BingStyle::Satellite => 'a',
            BingStyle::Road => 'r',
            BingStyle::Hybrid => 'h',
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            BingStyle::Road => "png",
            BingStyle::Satellite | BingStyle::Hybrid => "jpeg",
        }
    }
}

/// Bing Maps provider for one style.
pub struct BingProvider {
    style: BingStyle,
    name: &'static str,
    no_tile: Option<Bytes>,
}

impl BingProvider {
    /// Creates a provider.
    ///
    /// # Arguments
    ///
    /// * `style` - Which Bing layer to fetch
    /// * `no_tile` - Bytes of Bing's "no imagery" image, when known
    pub fn new(style: BingStyle, no_tile: Option<Bytes>) -> Self {
        let name = match style {
            BingStyle::Satellite => "Bing Satellite",
            BingStyle::Road => "Bing Road",
            BingStyle::Hybrid => "Bing Hybrid",
        };
        Self {
            style,
            name,
            no_tile,
        }
    }
}

impl TileProvider for BingProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn url_for(&self, tile: &TileCoord) -> String {
        format!(
            "https://ecn.t{}.tiles.virtualearth.net/tiles/{}{}.{}?g=1",
            server_shard(tile, BING_SERVERS),
            self.style.code(),
            tile_to_quadkey(tile),
            self.style.extension()
        )
    }

    fn min_zoom(&self) -> u8 {
        1
    }

    fn max_zoom(&self) -> u8 {
        19
    }

    fn is_placeholder(&self, data: &[u8]) -> bool {
        self.no_tile
            .as_ref()
            .is_some_and(|no_tile| !no_tile.is_empty() && no_tile.as_ref() == data)
    }
}

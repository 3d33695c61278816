//! Tile addressing
//!
//! Tiles are addressed by integer `(x, y, zoom)` in the standard Web Mercator
//! slippy-map pyramid. Providers translate these into their own URL schemes
//! (XYZ paths, Bing quadkeys, flipped TMS rows).

use std::fmt;

/// Highest zoom level any bundled provider serves.
pub const MAX_ZOOM: u8 = 23;

/// Tile coordinates in the Web Mercator / slippy map system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// X coordinate (east-west), 0 at west
    pub x: u32,
    /// Y coordinate (north-south), 0 at north
    pub y: u32,
    /// Zoom level
    pub zoom: u8,
}

impl TileCoord {
    /// Create a new tile coordinate.
    pub fn new(x: u32, y: u32, zoom: u8) -> Self {
        Self { x, y, zoom }
    }

    /// Row index counted from the bottom of the pyramid (TMS convention).
    ///
    /// Returns `None` when `y` lies outside the grid for this zoom level.
    pub fn tms_y(&self) -> Option<u32> {
        let rows = 1u64 << self.zoom.min(31);
        let y = u64::from(self.y);
        (y < rows).then(|| (rows - 1 - y) as u32)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Converts tile coordinates to a Bing Maps quadkey.
///
/// Each zoom level contributes one base-4 digit, most significant first.
/// Zoom 0 produces an empty quadkey.
#[inline]
pub fn tile_to_quadkey(tile: &TileCoord) -> String {
    let mut quadkey = String::with_capacity(tile.zoom as usize);
    for level in (1..=tile.zoom).rev() {
        let mask = 1u32 << (level - 1);
        let mut digit = b'0';
        if tile.x & mask != 0 {
            digit += 1;
        }
        if tile.y & mask != 0 {
            digit += 2;
        }
        quadkey.push(digit as char);
    }
    quadkey
}

/// Picks a server shard for a tile.
///
/// Tile servers are usually mirrored across a handful of hostnames; spreading
/// requests by `(x + 2y) mod n` keeps neighbouring tiles on different hosts
/// while staying deterministic for a given tile.
#[inline]
pub fn server_shard(tile: &TileCoord, servers: u32) -> u32 {
    if servers == 0 {
        return 0;
    }
    ((u64::from(tile.x) + 2 * u64::from(tile.y)) % u64::from(servers)) as u32
}

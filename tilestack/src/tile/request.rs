//! Tile request types.

use crate::coord::TileCoord;
use crate::layer::MapId;

/// Request for one map tile.
///
/// For a composited map `map_id` names the stack; for a plain map it names
/// the provider.
///
/// # Example
///
/// ```
/// use tilestack::layer::MapId;
/// use tilestack::tile::TileRequest;
///
/// let request = TileRequest::new(MapId(1), 3, 5, 7);
/// assert_eq!(request.coord().to_string(), "7/3/5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileRequest {
    map_id: MapId,
    x: u32,
    y: u32,
    zoom: u8,
}

impl TileRequest {
    pub fn new(map_id: MapId, x: u32, y: u32, zoom: u8) -> Self {
        Self { map_id, x, y, zoom }
    }

    pub fn map_id(&self) -> MapId {
        self.map_id
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// The tile address without the map id.
    pub fn coord(&self) -> TileCoord {
        TileCoord::new(self.x, self.y, self.zoom)
    }

    /// The same tile for a different map.
    pub fn with_map_id(self, map_id: MapId) -> Self {
        Self { map_id, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let request = TileRequest::new(MapId(4), 10, 20, 12);
        assert_eq!(request.map_id(), MapId(4));
        assert_eq!(request.x(), 10);
        assert_eq!(request.y(), 20);
        assert_eq!(request.zoom(), 12);
        assert_eq!(request.coord(), TileCoord::new(10, 20, 12));
    }

    #[test]
    fn test_with_map_id_keeps_coordinates() {
        let request = TileRequest::new(MapId(4), 10, 20, 12).with_map_id(MapId(9));
        assert_eq!(request.map_id(), MapId(9));
        assert_eq!(request.coord(), TileCoord::new(10, 20, 12));
    }

    #[test]
    fn test_hash() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(TileRequest::new(MapId(1), 1, 1, 1));
        set.insert(TileRequest::new(MapId(1), 1, 1, 1));
        set.insert(TileRequest::new(MapId(2), 1, 1, 1));
        assert_eq!(set.len(), 2);
    }
}

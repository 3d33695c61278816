//! Layer value types

use std::fmt;

/// Opaque provider identity.
///
/// Non-negative values identify a registered provider; `-1` is the sentinel
/// used for "no layer".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapId(pub i32);

impl MapId {
    /// The invalid sentinel id.
    pub const INVALID: MapId = MapId(-1);

    /// Returns true for ids that can refer to a provider.
    pub fn is_valid(&self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for MapId {
    fn from(value: i32) -> Self {
        MapId(value)
    }
}

/// One layer of a composited map.
///
/// A layer is immutable once built; edits produce a new value that replaces
/// the old one in its [`LayerStack`](super::LayerStack).
#[derive(Debug, Clone)]
pub struct MapLayer {
    map_id: MapId,
    z_order: i32,
    opacity: f64,
    visible: bool,
    layer_name: String,
}

impl MapLayer {
    /// Creates a layer. Opacity is clamped to `[0, 1]`; NaN becomes 1.0.
    pub fn new(map_id: MapId, z_order: i32, opacity: f64, visible: bool) -> Self {
        Self {
            map_id,
            z_order,
            opacity: clamp_opacity(opacity),
            visible,
            layer_name: String::new(),
        }
    }

    /// Returns a copy of this layer carrying a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.layer_name = name.into();
        self
    }

    pub fn map_id(&self) -> MapId {
        self.map_id
    }

    pub fn z_order(&self) -> i32 {
        self.z_order
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Display name, empty when the layer was built without one.
    pub fn layer_name(&self) -> &str {
        &self.layer_name
    }

    /// True unless this is the "no layer" sentinel.
    pub fn is_valid(&self) -> bool {
        self.map_id.is_valid()
    }
}

impl Default for MapLayer {
    fn default() -> Self {
        Self::new(MapId::INVALID, 0, 1.0, true)
    }
}

// The display name does not take part in equality.
impl PartialEq for MapLayer {
    fn eq(&self, other: &Self) -> bool {
        self.map_id == other.map_id
            && self.z_order == other.z_order
            && self.opacity == other.opacity
            && self.visible == other.visible
    }
}

pub(crate) fn clamp_opacity(opacity: f64) -> f64 {
    if opacity.is_nan() {
        1.0
    } else {
        opacity.clamp(0.0, 1.0)
    }
}

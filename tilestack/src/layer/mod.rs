//! Map layers and layer stacks
//!
//! A [`LayerStack`] describes which providers are painted on top of each
//! other for one logical map, in what order, and at what opacity. It also
//! derives the composite cache key that identifies a visible-layer
//! configuration.
//!
//! # Example
//!
//! ```
//! use tilestack::layer::{LayerStack, MapId, MapLayer};
//!
//! let mut stack = LayerStack::new();
//! stack.add_layer(MapLayer::new(MapId(2), 1, 0.5, true));
//! stack.add_layer(MapLayer::new(MapId(1), 0, 1.0, true));
//!
//! assert_eq!(stack.generate_cache_key(), "1_0_1.00_2_1_0.50");
//! ```

mod config;
mod stack;
mod types;

pub use config::{
    LayerParams, ProviderLookup, KEY_BASE_LAYER, KEY_LAYERS, KEY_LAYER_CONFIG, KEY_MULTI_LAYER,
    KEY_MULTI_LAYER_ENABLED, KEY_OPACITIES, KEY_OVERLAY_LAYERS, KEY_OVERLAY_OPACITIES,
};
pub use stack::LayerStack;
pub use types::{MapId, MapLayer};

pub(crate) use types::clamp_opacity;

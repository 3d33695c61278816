//! Building a [`LayerStack`] from key/value configuration.
//!
//! Three mutually exclusive shapes are recognised, tried in this order:
//!
//! 1. `baseLayer` + `overlayLayers` (+ optional `overlayOpacities`)
//! 2. `layers` (+ optional `opacities`)
//! 3. `layerConfig`, a JSON array of `{name, opacity, zOrder, visible}`
//!
//! Nothing is built unless `multiLayer` (or `multiLayerEnabled`) is truthy.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, warn};

use super::stack::LayerStack;
use super::types::{MapId, MapLayer};

/// Raw configuration parameters, e.g. the `[layers]` section of the config file.
pub type LayerParams = HashMap<String, String>;

pub const KEY_MULTI_LAYER: &str = "multiLayer";
pub const KEY_MULTI_LAYER_ENABLED: &str = "multiLayerEnabled";
pub const KEY_BASE_LAYER: &str = "baseLayer";
pub const KEY_OVERLAY_LAYERS: &str = "overlayLayers";
pub const KEY_OVERLAY_OPACITIES: &str = "overlayOpacities";
pub const KEY_LAYERS: &str = "layers";
pub const KEY_OPACITIES: &str = "opacities";
pub const KEY_LAYER_CONFIG: &str = "layerConfig";

/// Resolves configured layer names to provider ids.
pub trait ProviderLookup {
    /// Returns the map id of the provider called `name`, if one exists.
    fn map_id_for_name(&self, name: &str) -> Option<MapId>;
}

#[derive(Debug, Deserialize)]
struct LayerEntry {
    name: String,
    #[serde(default = "default_opacity")]
    opacity: f64,
    #[serde(default, rename = "zOrder")]
    z_order: Option<i64>,
    #[serde(default = "default_visible")]
    visible: bool,
}

fn default_opacity() -> f64 {
    1.0
}

fn default_visible() -> bool {
    true
}

impl LayerStack {
    /// Builds a stack from configuration parameters.
    ///
    /// Unknown layer names are skipped. Opacity strings that do not parse or
    /// fall outside `[0, 1]` become 1.0. Returns an empty stack when the
    /// feature flag is missing or false.
    pub fn from_configuration<L: ProviderLookup + ?Sized>(
        params: &LayerParams,
        lookup: &L,
    ) -> LayerStack {
        let mut stack = LayerStack::new();

        if !multi_layer_enabled(params) {
            return stack;
        }

        if let (Some(base), Some(overlays)) = (
            params.get(KEY_BASE_LAYER),
            params.get(KEY_OVERLAY_LAYERS),
        ) {
            let opacities = split_list(params.get(KEY_OVERLAY_OPACITIES));

            match lookup.map_id_for_name(base.trim()) {
                Some(id) => stack.add_layer(MapLayer::new(id, 0, 1.0, true).with_name(base.trim())),
                None => debug!(layer = %base, "Unknown base layer skipped"),
            }

            for (i, name) in split_list(Some(overlays)).iter().enumerate() {
                let opacity = parse_opacity(opacities.get(i).map(String::as_str));
                match lookup.map_id_for_name(name) {
                    Some(id) => stack.add_layer(
                        MapLayer::new(id, i as i32 + 1, opacity, true).with_name(name.as_str()),
                    ),
                    None => debug!(layer = %name, "Unknown overlay layer skipped"),
                }
            }
        } else if let Some(names) = params.get(KEY_LAYERS) {
            let opacities = split_list(params.get(KEY_OPACITIES));

            for (i, name) in split_list(Some(names)).iter().enumerate() {
                let opacity = parse_opacity(opacities.get(i).map(String::as_str));
                match lookup.map_id_for_name(name) {
                    Some(id) => stack.add_layer(
                        MapLayer::new(id, i as i32, opacity, true).with_name(name.as_str()),
                    ),
                    None => debug!(layer = %name, "Unknown layer skipped"),
                }
            }
        } else if let Some(json) = params.get(KEY_LAYER_CONFIG) {
            let entries: Vec<serde_json::Value> = match serde_json::from_str(json) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(error = %e, "Ignoring malformed layerConfig");
                    return stack;
                }
            };

            for value in entries {
                let Ok(entry) = serde_json::from_value::<LayerEntry>(value) else {
                    continue;
                };
                let Some(id) = lookup.map_id_for_name(entry.name.trim()) else {
                    debug!(layer = %entry.name, "Unknown layer skipped");
                    continue;
                };
                let z_order = match entry.z_order {
                    Some(z) if z >= 0 => z.min(i64::from(i32::MAX)) as i32,
                    _ => stack.len() as i32,
                };
                stack.add_layer(
                    MapLayer::new(id, z_order, entry.opacity, entry.visible)
                        .with_name(entry.name.trim()),
                );
            }
        }

        stack
    }
}

fn multi_layer_enabled(params: &LayerParams) -> bool {
    if let Some(flag) = params.get(KEY_MULTI_LAYER) {
        return matches!(
            flag.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        );
    }
    params
        .get(KEY_MULTI_LAYER_ENABLED)
        .is_some_and(|flag| flag.trim().eq_ignore_ascii_case("true"))
}

fn split_list(value: Option<&String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_opacity(value: Option<&str>) -> f64 {
    match value.map(|v| v.trim().parse::<f64>()) {
        Some(Ok(o)) if (0.0..=1.0).contains(&o) => o,
        _ => 1.0,
    }
}

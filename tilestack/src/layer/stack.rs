//! Ordered, de-duplicated layer collection

use super::types::{MapId, MapLayer};

/// Separator between the fields of a composite cache key.
const KEY_SEPARATOR: &str = "_";

/// An ordered set of layers composited together for one logical map.
///
/// Entries are unique by [`MapId`] and always sorted ascending by z-order,
/// so iteration order is paint order. Ties on z-order are broken by map id,
/// which keeps the order independent of insertion history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerStack {
    layers: Vec<MapLayer>,
}

impl LayerStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a layer, replacing any existing entry with the same map id.
    pub fn add_layer(&mut self, layer: MapLayer) {
        self.remove_layer(layer.map_id());
        self.layers.push(layer);
        self.sort();
    }

    /// Removes the layer with the given map id, if present.
    pub fn remove_layer(&mut self, map_id: MapId) {
        self.layers.retain(|layer| layer.map_id() != map_id);
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// All layers in paint order.
    pub fn layers(&self) -> &[MapLayer] {
        &self.layers
    }

    /// Layer at `index`, or the invalid sentinel when out of range.
    pub fn layer(&self, index: usize) -> MapLayer {
        self.layers.get(index).cloned().unwrap_or_default()
    }

    /// Layer with the given map id, or the invalid sentinel.
    pub fn layer_by_map_id(&self, map_id: MapId) -> MapLayer {
        self.layers
            .iter()
            .find(|layer| layer.map_id() == map_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Visible layers in paint order.
    pub fn visible_layers(&self) -> Vec<MapLayer> {
        self.layers.iter().filter(|l| l.visible()).cloned().collect()
    }

    /// Builds the composite cache key for the visible layers.
    ///
    /// Each visible layer contributes `mapId`, `zOrder` and its opacity with
    /// two decimals, e.g. `1_0_1.00_2_1_0.50`. An empty string means there
    /// is nothing to look up.
    pub fn generate_cache_key(&self) -> String {
        self.layers
            .iter()
            .filter(|layer| layer.visible())
            .flat_map(|layer| {
                [
                    layer.map_id().to_string(),
                    layer.z_order().to_string(),
                    format!("{:.2}", layer.opacity()),
                ]
            })
            .collect::<Vec<_>>()
            .join(KEY_SEPARATOR)
    }

    fn sort(&mut self) {
        self.layers
            .sort_by_key(|layer| (layer.z_order(), layer.map_id()));
    }
}

impl FromIterator<MapLayer> for LayerStack {
    fn from_iter<I: IntoIterator<Item = MapLayer>>(iter: I) -> Self {
        let mut stack = LayerStack::new();
        for layer in iter {
            stack.add_layer(layer);
        }
        stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn layer(id: i32, z: i32, opacity: f64, visible: bool) -> MapLayer {
        MapLayer::new(MapId(id), z, opacity, visible)
    }

    #[test]
    fn test_add_layer_keeps_z_order() {
        let mut stack = LayerStack::new();
        stack.add_layer(layer(5, 2, 1.0, true));
        stack.add_layer(layer(1, 0, 1.0, true));
        stack.add_layer(layer(9, 1, 1.0, true));

        let ids: Vec<i32> = stack.layers().iter().map(|l| l.map_id().0).collect();
        assert_eq!(ids, vec![1, 9, 5]);
    }

    #[test]
    fn test_add_layer_replaces_same_map_id() {
        let mut stack = LayerStack::new();
        stack.add_layer(layer(1, 0, 1.0, true));
        stack.add_layer(layer(1, 4, 0.3, false));

        assert_eq!(stack.len(), 1);
        assert_eq!(stack.layer(0), layer(1, 4, 0.3, false));
    }

    #[test]
    fn test_add_identical_layer_twice_is_idempotent() {
        let mut stack = LayerStack::new();
        stack.add_layer(layer(2, 1, 0.5, true));
        let before = stack.clone();
        stack.add_layer(layer(2, 1, 0.5, true));

        assert_eq!(stack.len(), 1);
        assert_eq!(stack, before);
    }

    #[test]
    fn test_remove_layer() {
        let mut stack: LayerStack = [layer(1, 0, 1.0, true), layer(2, 1, 1.0, true)]
            .into_iter()
            .collect();
        stack.remove_layer(MapId(1));
        assert_eq!(stack.len(), 1);

        // Absent id is a no-op
        stack.remove_layer(MapId(42));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_lookup_returns_sentinel_when_absent() {
        let stack: LayerStack = [layer(1, 0, 1.0, true)].into_iter().collect();
        assert_eq!(stack.layer_by_map_id(MapId(1)).map_id(), MapId(1));
        assert_eq!(stack.layer_by_map_id(MapId(2)).map_id(), MapId::INVALID);
        assert_eq!(stack.layer(3).map_id(), MapId::INVALID);
    }

    #[test]
    fn test_cache_key_format() {
        let stack: LayerStack = [layer(1, 0, 1.0, true), layer(2, 1, 0.5, true)]
            .into_iter()
            .collect();
        assert_eq!(stack.generate_cache_key(), "1_0_1.00_2_1_0.50");
    }

    #[test]
    fn test_cache_key_skips_invisible_layers() {
        let stack: LayerStack = [
            layer(1, 0, 1.0, true),
            layer(3, 1, 0.7, false),
            layer(2, 2, 0.5, true),
        ]
        .into_iter()
        .collect();
        assert_eq!(stack.generate_cache_key(), "1_0_1.00_2_2_0.50");
    }

    #[test]
    fn test_cache_key_empty_cases() {
        assert_eq!(LayerStack::new().generate_cache_key(), "");

        let hidden: LayerStack = [layer(1, 0, 1.0, false)].into_iter().collect();
        assert_eq!(hidden.generate_cache_key(), "");
    }

    #[test]
    fn test_cache_key_rounds_opacity_to_two_decimals() {
        let a: LayerStack = [layer(1, 0, 0.501, true)].into_iter().collect();
        let b: LayerStack = [layer(1, 0, 0.499, true)].into_iter().collect();
        assert_eq!(a.generate_cache_key(), b.generate_cache_key());

        let c: LayerStack = [layer(1, 0, 0.52, true)].into_iter().collect();
        assert_ne!(a.generate_cache_key(), c.generate_cache_key());
    }

    fn arb_layers() -> impl Strategy<Value = Vec<(i32, i32, u8, bool)>> {
        // Unique map ids; opacity expressed in hundredths
        proptest::collection::btree_map(0i32..50, (-5i32..5, 0u8..=100, any::<bool>()), 0..8)
            .prop_map(|m| m.into_iter().map(|(id, (z, o, v))| (id, z, o, v)).collect())
    }

    proptest! {
        #[test]
        fn prop_cache_key_independent_of_insertion_order(entries in arb_layers(), seed in any::<u64>()) {
            let forward: LayerStack = entries
                .iter()
                .map(|&(id, z, o, v)| layer(id, z, f64::from(o) / 100.0, v))
                .collect();

            let mut shuffled = entries.clone();
            // Deterministic rotation driven by the seed
            if !shuffled.is_empty() {
                let k = (seed as usize) % shuffled.len();
                shuffled.rotate_left(k);
                shuffled.reverse();
            }
            let backward: LayerStack = shuffled
                .iter()
                .map(|&(id, z, o, v)| layer(id, z, f64::from(o) / 100.0, v))
                .collect();

            prop_assert_eq!(forward.generate_cache_key(), backward.generate_cache_key());
        }

        #[test]
        fn prop_cache_key_changes_with_visible_opacity(entries in arb_layers()) {
            let stack: LayerStack = entries
                .iter()
                .map(|&(id, z, o, v)| layer(id, z, f64::from(o) / 100.0, v))
                .collect();

            if let Some(target) = stack.visible_layers().first().cloned() {
                let shifted = if target.opacity() >= 0.5 {
                    target.opacity() - 0.2
                } else {
                    target.opacity() + 0.2
                };
                let mut edited = stack.clone();
                edited.add_layer(MapLayer::new(target.map_id(), target.z_order(), shifted, true));
                prop_assert_ne!(stack.generate_cache_key(), edited.generate_cache_key());
            }
        }

        #[test]
        fn prop_stack_is_sorted_and_unique(entries in arb_layers()) {
            let stack: LayerStack = entries
                .iter()
                .map(|&(id, z, o, v)| layer(id, z, f64::from(o) / 100.0, v))
                .collect();

            let zs: Vec<i32> = stack.layers().iter().map(|l| l.z_order()).collect();
            let mut sorted = zs.clone();
            sorted.sort();
            prop_assert_eq!(zs, sorted);

            let mut ids: Vec<MapId> = stack.layers().iter().map(|l| l.map_id()).collect();
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), stack.len());
        }
    }
}

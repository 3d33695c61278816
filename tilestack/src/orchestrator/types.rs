//! Orchestrator bookkeeping types.

use std::collections::HashMap;

use tokio::task;

use crate::compositor::TileImageData;
use crate::layer::{MapId, MapLayer};
use crate::tile::FetchError;

/// Completion of one layer's child task.
#[derive(Debug)]
pub(crate) enum LayerEvent {
    /// The per-layer cache held the tile
    CacheHit { map_id: MapId, image: TileImageData },
    /// The per-layer cache did not; the network must be asked
    CacheMiss { map_id: MapId },
    /// The network request finished
    Network {
        map_id: MapId,
        result: Result<TileImageData, FetchError>,
    },
}

/// Per-request fetch state, owned by the request's driver task.
///
/// Each counted layer has at most one child in flight: a cache lookup, or
/// the network request that replaced it after a miss. A layer completes
/// exactly once, and the composite step is latched so it runs at most once.
#[derive(Default)]
pub(crate) struct PendingFetchSet {
    in_flight: HashMap<MapId, task::Id>,
    results: HashMap<MapId, TileImageData>,
    pending: usize,
    composited: bool,
}

impl PendingFetchSet {
    /// Starts tracking a new layer.
    pub(crate) fn track(&mut self, map_id: MapId, task: task::Id) {
        if self.in_flight.insert(map_id, task).is_none() {
            self.pending += 1;
        }
    }

    /// Puts `task` in the layer's slot without counting it again.
    pub(crate) fn replace(&mut self, map_id: MapId, task: task::Id) {
        if let Some(slot) = self.in_flight.get_mut(&map_id) {
            *slot = task;
        }
    }

    /// Records a usable tile and completes the layer.
    pub(crate) fn succeed(&mut self, map_id: MapId, image: TileImageData) {
        if self.complete(map_id) {
            self.results.insert(map_id, image);
        }
    }

    /// Completes the layer without a tile.
    pub(crate) fn fail(&mut self, map_id: MapId) {
        self.complete(map_id);
    }

    /// False when the layer was not in flight.
    fn complete(&mut self, map_id: MapId) -> bool {
        if self.in_flight.remove(&map_id).is_some() {
            self.pending -= 1;
            true
        } else {
            false
        }
    }

    /// The layer whose current child is `task`.
    pub(crate) fn layer_for_task(&self, task: task::Id) -> Option<MapId> {
        self.in_flight
            .iter()
            .find(|(_, id)| **id == task)
            .map(|(map_id, _)| *map_id)
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending
    }

    pub(crate) fn is_done(&self) -> bool {
        self.pending == 0
    }

    /// Pairs results with their layers in stack order.
    ///
    /// Returns `None` once it has already handed results out.
    pub(crate) fn take_for_composite(
        &mut self,
        layers: &[MapLayer],
    ) -> Option<Vec<(MapLayer, TileImageData)>> {
        if self.composited {
            return None;
        }
        self.composited = true;
        Some(
            layers
                .iter()
                .filter_map(|layer| {
                    self.results
                        .remove(&layer.map_id())
                        .map(|image| (layer.clone(), image))
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_id() -> task::Id {
        tokio::spawn(async {}).id()
    }

    fn image(byte: u8) -> TileImageData {
        TileImageData::new(vec![byte], "png")
    }

    #[tokio::test]
    async fn test_countdown() {
        let mut set = PendingFetchSet::default();
        set.track(MapId(1), task_id());
        set.track(MapId(2), task_id());
        assert_eq!(set.pending(), 2);

        // A cache miss swaps the slot without recounting
        set.replace(MapId(2), task_id());
        assert_eq!(set.pending(), 2);

        set.succeed(MapId(1), image(1));
        set.fail(MapId(2));
        assert!(set.is_done());
    }

    #[tokio::test]
    async fn test_duplicate_completion_is_ignored() {
        let mut set = PendingFetchSet::default();
        set.track(MapId(1), task_id());
        set.track(MapId(2), task_id());

        set.fail(MapId(1));
        set.fail(MapId(1));
        set.succeed(MapId(1), image(1));
        assert_eq!(set.pending(), 1);
        assert!(!set.is_done());

        // Untracked layers neither count down nor record results
        set.succeed(MapId(7), image(7));
        assert_eq!(set.pending(), 1);

        set.succeed(MapId(2), image(2));
        assert!(set.is_done());
        let layers = vec![
            MapLayer::new(MapId(1), 0, 1.0, true),
            MapLayer::new(MapId(2), 1, 1.0, true),
        ];
        let pairs = set.take_for_composite(&layers).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0.map_id(), MapId(2));
    }

    #[tokio::test]
    async fn test_layer_for_task_follows_replacement() {
        let mut set = PendingFetchSet::default();
        let lookup = task_id();
        let download = task_id();
        set.track(MapId(3), lookup);

        assert_eq!(set.layer_for_task(lookup), Some(MapId(3)));
        set.replace(MapId(3), download);
        assert_eq!(set.layer_for_task(lookup), None);
        assert_eq!(set.layer_for_task(download), Some(MapId(3)));

        set.fail(MapId(3));
        assert_eq!(set.layer_for_task(download), None);
    }

    #[tokio::test]
    async fn test_composite_is_latched_and_ordered() {
        let layers = vec![
            MapLayer::new(MapId(1), 0, 1.0, true),
            MapLayer::new(MapId(2), 1, 0.5, true),
            MapLayer::new(MapId(3), 2, 0.5, true),
        ];
        let mut set = PendingFetchSet::default();
        for layer in &layers {
            set.track(layer.map_id(), task_id());
        }
        set.succeed(MapId(3), image(3));
        set.fail(MapId(2));
        set.succeed(MapId(1), image(1));

        let pairs = set.take_for_composite(&layers).unwrap();
        let ids: Vec<_> = pairs.iter().map(|(l, _)| l.map_id()).collect();
        assert_eq!(ids, vec![MapId(1), MapId(3)]);

        assert!(set.take_for_composite(&layers).is_none());
    }
}

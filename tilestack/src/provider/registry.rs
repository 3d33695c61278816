//! Provider registry
//!
//! Maps [`MapId`]s and display names to provider instances. The default
//! registry assigns ids in a fixed order starting at 1, so configuration and
//! caches keyed by id stay stable across runs.

use std::sync::Arc;

use bytes::Bytes;

use super::arcgis::{ArcGisProvider, EsriService};
use super::bing::{BingProvider, BingStyle};
use super::elevation::TerrariumProvider;
use super::gaode::{GaoDeProvider, GaoDeStyle};
use super::google::{GoogleProvider, GoogleStyle};
use super::osm::OsmProvider;
use super::tianditu::{TiandituProvider, TiandituStyle};
use super::tms::TmsProvider;
use super::types::TileProvider;
use super::usgs::UsgsProvider;
use crate::layer::{MapId, ProviderLookup};

/// Settings consumed when building the default provider set.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    /// API key for Tianditu; without one those providers serve nothing.
    pub tianditu_key: String,
    /// Bing's "no imagery" image, if known.
    pub bing_no_tile: Option<Bytes>,
    /// Root URL of a self-hosted TMS tile tree.
    pub tms_url: String,
    /// File extension of the TMS tiles.
    pub tms_extension: String,
}

/// Lookup table from map id to provider.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    entries: Vec<(MapId, Arc<dyn TileProvider>)>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every bundled provider.
    pub fn with_defaults(settings: &ProviderSettings) -> Self {
        let tms_extension = if settings.tms_extension.is_empty() {
            "png"
        } else {
            settings.tms_extension.as_str()
        };

        let providers: Vec<Arc<dyn TileProvider>> = vec![
            Arc::new(BingProvider::new(
                BingStyle::Satellite,
                settings.bing_no_tile.clone(),
            )),
            Arc::new(BingProvider::new(BingStyle::Road, settings.bing_no_tile.clone())),
            Arc::new(BingProvider::new(
                BingStyle::Hybrid,
                settings.bing_no_tile.clone(),
            )),
            Arc::new(GoogleProvider::new(GoogleStyle::Satellite)),
            Arc::new(GoogleProvider::new(GoogleStyle::Street)),
            Arc::new(GoogleProvider::new(GoogleStyle::Terrain)),
            Arc::new(GoogleProvider::new(GoogleStyle::Hybrid)),
            Arc::new(ArcGisProvider::new(EsriService::WorldImagery)),
            Arc::new(ArcGisProvider::new(EsriService::WorldStreetMap)),
            Arc::new(ArcGisProvider::new(EsriService::WorldTopoMap)),
            Arc::new(UsgsProvider::new()),
            Arc::new(OsmProvider::new()),
            Arc::new(GaoDeProvider::new(GaoDeStyle::Street)),
            Arc::new(GaoDeProvider::new(GaoDeStyle::Satellite)),
            Arc::new(TiandituProvider::new(
                TiandituStyle::Street,
                settings.tianditu_key.clone(),
            )),
            Arc::new(TiandituProvider::new(
                TiandituStyle::Satellite,
                settings.tianditu_key.clone(),
            )),
            Arc::new(TiandituProvider::new(
                TiandituStyle::Terrain,
                settings.tianditu_key.clone(),
            )),
            Arc::new(TerrariumProvider::new()),
            Arc::new(TmsProvider::new(settings.tms_url.clone(), tms_extension)),
        ];

        let mut registry = Self::new();
        for (i, provider) in providers.into_iter().enumerate() {
            registry.register(MapId(i as i32 + 1), provider);
        }
        registry
    }

    /// Adds or replaces the provider for `map_id`.
    pub fn register(&mut self, map_id: MapId, provider: Arc<dyn TileProvider>) {
        self.entries.retain(|(id, _)| *id != map_id);
        self.entries.push((map_id, provider));
    }

    /// Provider registered under `map_id`.
    pub fn provider_for_id(&self, map_id: MapId) -> Option<Arc<dyn TileProvider>> {
        self.entries
            .iter()
            .find(|(id, _)| *id == map_id)
            .map(|(_, provider)| Arc::clone(provider))
    }

    /// Provider whose name matches `name`, ignoring case.
    pub fn provider_for_name(&self, name: &str) -> Option<(MapId, Arc<dyn TileProvider>)> {
        let name = name.trim();
        self.entries
            .iter()
            .find(|(_, provider)| provider.name().eq_ignore_ascii_case(name))
            .map(|(id, provider)| (*id, Arc::clone(provider)))
    }

    /// Registered providers in id order.
    pub fn iter(&self) -> impl Iterator<Item = (MapId, &Arc<dyn TileProvider>)> {
        let mut entries: Vec<_> = self.entries.iter().map(|(id, p)| (*id, p)).collect();
        entries.sort_by_key(|(id, _)| *id);
        entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ProviderLookup for ProviderRegistry {
    fn map_id_for_name(&self, name: &str) -> Option<MapId> {
        self.provider_for_name(name).map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::TileCoord;

    #[test]
    fn test_default_ids_start_at_one_in_fixed_order() {
        let registry = ProviderRegistry::with_defaults(&ProviderSettings::default());

        assert_eq!(registry.provider_for_id(MapId(1)).unwrap().name(), "Bing Satellite");
        assert_eq!(registry.provider_for_id(MapId(4)).unwrap().name(), "Google Satellite");
        assert_eq!(registry.provider_for_id(MapId(12)).unwrap().name(), "Open Street Map");
        assert!(registry.provider_for_id(MapId(0)).is_none());
        assert!(registry.provider_for_id(MapId::INVALID).is_none());

        let ids: Vec<i32> = registry.iter().map(|(id, _)| id.0).collect();
        assert_eq!(ids, (1..=registry.len() as i32).collect::<Vec<_>>());
    }

    #[test]
    fn test_lookup_by_name_ignores_case() {
        let registry = ProviderRegistry::with_defaults(&ProviderSettings::default());

        assert_eq!(registry.map_id_for_name("bing road"), Some(MapId(2)));
        assert_eq!(registry.map_id_for_name("  Esri World Topo "), Some(MapId(10)));
        assert_eq!(registry.map_id_for_name("Nowhere Maps"), None);
    }

    #[test]
    fn test_settings_reach_providers() {
        let settings = ProviderSettings {
            tianditu_key: "k".to_string(),
            bing_no_tile: Some(Bytes::from_static(b"nope")),
            tms_url: "http://tiles.local".to_string(),
            tms_extension: String::new(),
        };
        let registry = ProviderRegistry::with_defaults(&settings);
        let tile = TileCoord::new(1, 1, 2);

        let (_, tianditu) = registry.provider_for_name("Tianditu Street").unwrap();
        assert!(tianditu.url_for(&tile).ends_with("tk=k"));

        let (_, bing) = registry.provider_for_name("Bing Hybrid").unwrap();
        assert!(bing.is_placeholder(b"nope"));

        let (_, tms) = registry.provider_for_name("TMS Local").unwrap();
        assert_eq!(tms.url_for(&tile), "http://tiles.local/2/1/2.png");
    }

    #[test]
    fn test_register_replaces_existing_id() {
        let mut registry = ProviderRegistry::new();
        registry.register(MapId(1), Arc::new(OsmProvider::new()));
        registry.register(MapId(1), Arc::new(UsgsProvider::new()));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.provider_for_id(MapId(1)).unwrap().name(), "USGS Imagery");
    }
}

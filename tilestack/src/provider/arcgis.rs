//! Esri ArcGIS Online basemaps.
//!
//! # URL Pattern
//!
//! `https://server.arcgisonline.com/ArcGIS/rest/services/{service}/MapServer/tile/{z}/{y}/{x}`
//!
//! - Row before column in the path
//! - No authentication required for the public tier
//!
//! # Terms of Use
//!
//! The basemaps are provided by Esri and are subject to their terms of use.
//! See: <https://www.esri.com/en-us/legal/terms/full-master-agreement>

use super::types::TileProvider;
use crate::coord::TileCoord;

/// Base URL for ArcGIS Online map services.
const ARCGIS_BASE_URL: &str = "https://server.arcgisonline.com/ArcGIS/rest/services";

/// Esri basemap services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EsriService {
    WorldImagery,
    WorldStreetMap,
    WorldTopoMap,
}

impl EsriService {
    fn path(&self) -> &'static str {
        match self {
            EsriService::WorldImagery => "World_Imagery",
            EsriService::WorldStreetMap => "World_Street_Map",
            EsriService::WorldTopoMap => "World_Topo_Map",
        }
    }
}

/// ArcGIS Online basemap provider.
pub struct ArcGisProvider {
    service: EsriService,
}

impl ArcGisProvider {
    pub fn new(service: EsriService) -> Self {
        Self { service }
    }
}

impl TileProvider for ArcGisProvider {
    fn name(&self) -> &str {
        match self.service {
            EsriService::WorldImagery => "Esri World Imagery",
            EsriService::WorldStreetMap => "Esri World Street",
            EsriService::WorldTopoMap => "Esri World Topo",
        }
    }

    fn url_for(&self, tile: &TileCoord) -> String {
        format!(
            "{}/{}/MapServer/tile/{}/{}/{}",
            ARCGIS_BASE_URL,
            self.service.path(),
            tile.zoom,
            tile.y,
            tile.x
        )
    }

    fn min_zoom(&self) -> u8 {
        0
    }

    // Imagery is available up to zoom 19 in most areas
    fn max_zoom(&self) -> u8 {
        19
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name() {
        let provider = ArcGisProvider::new(EsriService::WorldImagery);
        assert_eq!(provider.name(), "Esri World Imagery");
    }

    #[test]
    fn test_supports_zoom() {
        let provider = ArcGisProvider::new(EsriService::WorldTopoMap);
        assert!(provider.supports_zoom(0));
        assert!(provider.supports_zoom(19));
        assert!(!provider.supports_zoom(20));
    }

    #[test]
    fn test_url_construction() {
        let provider = ArcGisProvider::new(EsriService::WorldImagery);
        assert_eq!(
            provider.url_for(&TileCoord::new(200, 100, 15)),
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/15/100/200"
        );

        let street = ArcGisProvider::new(EsriService::WorldStreetMap);
        assert!(street
            .url_for(&TileCoord::new(0, 0, 0))
            .contains("/World_Street_Map/MapServer/tile/0/0/0"));
    }
}

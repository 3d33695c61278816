//! Tile provider abstraction
//!
//! A provider describes one tile server: its URL scheme, zoom range and
//! response quirks. Providers do no I/O; the fetch layer issues requests
//! through an [`AsyncHttpClient`].
//!
//! # Example
//!
//! ```
//! use tilestack::coord::TileCoord;
//! use tilestack::layer::MapId;
//! use tilestack::provider::{ProviderRegistry, ProviderSettings};
//!
//! let registry = ProviderRegistry::with_defaults(&ProviderSettings::default());
//! let provider = registry.provider_for_id(MapId(1)).unwrap();
//! let url = provider.url_for(&TileCoord::new(3, 5, 3));
//! assert!(url.contains("a213"));
//! ```

mod arcgis;
mod bing;
mod elevation;
mod gaode;
mod google;
mod http;
mod osm;
mod placeholder;
mod registry;
mod tianditu;
mod tms;
mod types;
mod usgs;

pub use arcgis::{ArcGisProvider, EsriService};
pub use bing::{BingProvider, BingStyle};
pub use elevation::{ElevationGrid, TerrariumProvider, ELEVATION_FORMAT};
pub use gaode::{GaoDeProvider, GaoDeStyle};
pub use google::{GoogleProvider, GoogleStyle};
pub use http::{AsyncHttpClient, AsyncReqwestClient, HttpResponse, DEFAULT_TIMEOUT_SECS};
pub use osm::OsmProvider;
pub use placeholder::{error_tile, load_no_tile_image, TILE_SIZE};
pub use registry::{ProviderRegistry, ProviderSettings};
pub use tianditu::{TiandituProvider, TiandituStyle};
pub use tms::TmsProvider;
pub use types::{ProviderError, TileProvider};
pub use usgs::UsgsProvider;

#[cfg(test)]
pub use http::tests::{MockAsyncHttpClient, RecordedRequest};

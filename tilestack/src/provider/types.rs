//! Provider types and traits

use std::fmt;

use crate::compositor::image_format_tag;
use crate::coord::TileCoord;

/// Errors that can occur during provider operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// HTTP request failed before a response arrived
    HttpError(String),
    /// Server answered with a non-success status
    Status { code: u16, reason: String },
    /// Invalid response data from provider
    InvalidResponse(String),
    /// Provider-specific error
    ProviderSpecific(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            ProviderError::Status { code, reason } => {
                if reason.is_empty() {
                    write!(f, "HTTP {}", code)
                } else {
                    write!(f, "HTTP {} {}", code, reason)
                }
            }
            ProviderError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            ProviderError::ProviderSpecific(msg) => write!(f, "Provider error: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Capability interface shared by every tile source.
///
/// A provider is a pure description of a tile server: how to build a URL for
/// a tile, which zoom levels it serves, and how to interpret what comes
/// back. It performs no I/O itself; the fetch layer issues the request.
pub trait TileProvider: Send + Sync {
    /// Returns the provider's name, used as the per-layer cache namespace.
    fn name(&self) -> &str;

    /// Builds the request URL for a tile.
    ///
    /// An empty string means the provider cannot serve this tile.
    fn url_for(&self, tile: &TileCoord) -> String;

    /// Returns the minimum supported zoom level.
    fn min_zoom(&self) -> u8;

    /// Returns the maximum supported zoom level.
    fn max_zoom(&self) -> u8;

    /// Checks if this provider supports the given zoom level.
    fn supports_zoom(&self, zoom: u8) -> bool {
        zoom >= self.min_zoom() && zoom <= self.max_zoom()
    }

    /// True for providers whose payload is height data rather than imagery.
    fn is_elevation(&self) -> bool {
        false
    }

    /// True when `data` is the server's "no tile here" placeholder image.
    fn is_placeholder(&self, _data: &[u8]) -> bool {
        false
    }

    /// Short format tag (`png`, `jpg`, ...) for a response body.
    fn image_format(&self, data: &[u8]) -> Option<String> {
        image_format_tag(data)
    }

    /// Converts a raw response body into the stored representation.
    ///
    /// Imagery is stored as-is. Elevation providers re-encode; an empty
    /// result signals that conversion failed.
    fn serialize(&self, data: &[u8]) -> Vec<u8> {
        data.to_vec()
    }

    /// Value for the `Referer` header, if the server requires one.
    fn referrer(&self) -> Option<&str> {
        None
    }

    /// Value for the `User-Token` header, if the server requires one.
    fn token(&self) -> Option<&str> {
        None
    }
}

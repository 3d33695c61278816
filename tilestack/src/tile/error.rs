//! Terminal errors delivered through a [`TileReply`](super::TileReply).

use thiserror::Error;

use crate::layer::MapId;

/// Why a tile request finished without an image.
///
/// Failures of individual layers inside a composite are absorbed; only the
/// outcome of the whole request surfaces here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The layer stack had no visible layers
    #[error("no visible layers")]
    NoVisibleLayers,

    /// No provider is registered for the map id
    #[error("unknown provider {0}")]
    UnknownProvider(MapId),

    /// The provider does not serve this zoom level
    #[error("zoom {zoom} outside provider range {min}..={max}")]
    ZoomOutOfRange { zoom: u8, min: u8, max: u8 },

    /// Transport failure, bad status or placeholder response
    #[error("communication error: {0}")]
    Communication(String),

    /// The response could not be interpreted
    #[error("parse error: {0}")]
    Parse(String),

    /// Every layer failed
    #[error("no valid tiles to composite")]
    NoValidTiles,

    /// The compositor produced no image
    #[error("composite failed: {0}")]
    CompositeFailure(String),

    /// The request was cancelled
    #[error("request aborted")]
    Aborted,
}

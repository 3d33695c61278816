//! Tile requests and the single-provider fetch path.
//!
//! A request yields a [`TileReply`], a handle that completes once with a
//! [`TileData`] or a [`FetchError`] and cancels its work when dropped.

mod context;
mod error;
mod reply;
mod request;
mod single;

pub use context::FetchContext;
pub use error::FetchError;
pub use reply::{TileData, TileReply};
pub use request::TileRequest;
pub use single::{fetch_from_network, SingleTileFetch};

use crate::telemetry::FetchMetrics;

/// Counts a finished request as served or failed. Aborts are not counted.
pub(crate) fn record_outcome(metrics: &FetchMetrics, result: &Result<TileData, FetchError>) {
    match result {
        Ok(_) => metrics.tile_served(),
        Err(FetchError::Aborted) => {}
        Err(_) => metrics.tile_failed(),
    }
}

//! Fetch pipeline telemetry.
//!
//! Lock-free atomic counters updated by the fetch paths and cache client,
//! read through point-in-time snapshots.
//!
//! # Architecture
//!
//! ```text
//! Fetch paths ─────► FetchMetrics ─────► FetchSnapshot ─────► CLI
//!                    (atomic counters)   (point-in-time copy)
//! ```
//!
//! # Example
//!
//! ```
//! use tilestack::telemetry::FetchMetrics;
//!
//! let metrics = FetchMetrics::new();
//! metrics.tile_requested();
//! metrics.layer_cache_hit();
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.tiles_requested, 1);
//! assert_eq!(snapshot.layer_cache_hit_rate(), 1.0);
//! ```

mod metrics;
mod snapshot;

pub use metrics::FetchMetrics;
pub use snapshot::FetchSnapshot;

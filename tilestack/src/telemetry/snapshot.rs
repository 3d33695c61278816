//! Point-in-time telemetry snapshot.

use std::fmt;
use std::time::Duration;

/// Immutable copy of [`FetchMetrics`](super::FetchMetrics) for display.
#[derive(Clone, Debug, Default)]
pub struct FetchSnapshot {
    pub uptime: Duration,
    pub tiles_requested: u64,
    pub tiles_served: u64,
    pub tiles_failed: u64,
    pub composite_cache_hits: u64,
    pub composite_cache_misses: u64,
    pub layer_cache_hits: u64,
    pub layer_cache_misses: u64,
    pub network_requests: u64,
    pub network_failures: u64,
    pub bytes_downloaded: u64,
    pub composites_built: u64,
    pub composite_time_us: u64,
}

impl FetchSnapshot {
    /// Fraction of layer cache lookups that hit (0.0 when none were made).
    pub fn layer_cache_hit_rate(&self) -> f64 {
        rate(self.layer_cache_hits, self.layer_cache_misses)
    }

    /// Fraction of composite cache lookups that hit.
    pub fn composite_cache_hit_rate(&self) -> f64 {
        rate(self.composite_cache_hits, self.composite_cache_misses)
    }

    /// Mean compositor run time, if any composite was built.
    pub fn mean_composite_time(&self) -> Option<Duration> {
        (self.composites_built > 0)
            .then(|| Duration::from_micros(self.composite_time_us / self.composites_built))
    }
}

fn rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

impl fmt::Display for FetchSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Tiles: {} requested, {} served, {} failed",
            self.tiles_requested, self.tiles_served, self.tiles_failed
        )?;
        writeln!(
            f,
            "Composite cache: {:.1}% hit ({} / {})",
            self.composite_cache_hit_rate() * 100.0,
            self.composite_cache_hits,
            self.composite_cache_hits + self.composite_cache_misses
        )?;
        writeln!(
            f,
            "Layer cache: {:.1}% hit ({} / {})",
            self.layer_cache_hit_rate() * 100.0,
            self.layer_cache_hits,
            self.layer_cache_hits + self.layer_cache_misses
        )?;
        write!(
            f,
            "Network: {} requests, {} failed, {} bytes; {} composites",
            self.network_requests,
            self.network_failures,
            self.bytes_downloaded,
            self.composites_built
        )
    }
}

//! Lock-free atomic metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use super::FetchSnapshot;

/// Counters for the tile fetch pipeline.
///
/// All operations use `Relaxed` ordering; the counters are independent
/// measurements.
#[derive(Debug)]
pub struct FetchMetrics {
    start_time: Instant,

    // === Requests ===
    tiles_requested: AtomicU64,
    tiles_served: AtomicU64,
    tiles_failed: AtomicU64,

    // === Cache ===
    composite_cache_hits: AtomicU64,
    composite_cache_misses: AtomicU64,
    layer_cache_hits: AtomicU64,
    layer_cache_misses: AtomicU64,

    // === Network ===
    network_requests: AtomicU64,
    network_failures: AtomicU64,
    bytes_downloaded: AtomicU64,

    // === Compositing ===
    composites_built: AtomicU64,
    composite_time_us: AtomicU64,
}

impl FetchMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            tiles_requested: AtomicU64::new(0),
            tiles_served: AtomicU64::new(0),
            tiles_failed: AtomicU64::new(0),
            composite_cache_hits: AtomicU64::new(0),
            composite_cache_misses: AtomicU64::new(0),
            layer_cache_hits: AtomicU64::new(0),
            layer_cache_misses: AtomicU64::new(0),
            network_requests: AtomicU64::new(0),
            network_failures: AtomicU64::new(0),
            bytes_downloaded: AtomicU64::new(0),
            composites_built: AtomicU64::new(0),
            composite_time_us: AtomicU64::new(0),
        }
    }

    pub fn tile_requested(&self) {
        self.tiles_requested.fetch_add(1, Ordering::Relaxed);
    }

    pub fn tile_served(&self) {
        self.tiles_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn tile_failed(&self) {
        self.tiles_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn composite_cache_hit(&self) {
        self.composite_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn composite_cache_miss(&self) {
        self.composite_cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn layer_cache_hit(&self) {
        self.layer_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn layer_cache_miss(&self) {
        self.layer_cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a network request being issued.
    pub fn network_request(&self) {
        self.network_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn network_failure(&self) {
        self.network_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful download of `bytes` bytes.
    pub fn downloaded(&self, bytes: u64) {
        self.bytes_downloaded.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a compositor run and how long it took.
    pub fn composite_built(&self, duration_us: u64) {
        self.composites_built.fetch_add(1, Ordering::Relaxed);
        self.composite_time_us
            .fetch_add(duration_us, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters.
    pub fn snapshot(&self) -> FetchSnapshot {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        FetchSnapshot {
            uptime: self.start_time.elapsed(),
            tiles_requested: load(&self.tiles_requested),
            tiles_served: load(&self.tiles_served),
            tiles_failed: load(&self.tiles_failed),
            composite_cache_hits: load(&self.composite_cache_hits),
            composite_cache_misses: load(&self.composite_cache_misses),
            layer_cache_hits: load(&self.layer_cache_hits),
            layer_cache_misses: load(&self.layer_cache_misses),
            network_requests: load(&self.network_requests),
            network_failures: load(&self.network_failures),
            bytes_downloaded: load(&self.bytes_downloaded),
            composites_built: load(&self.composites_built),
            composite_time_us: load(&self.composite_time_us),
        }
    }
}

impl Default for FetchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

//! Core traits for the generic cache service.
//!
//! The `Cache` trait provides a domain-agnostic key-value interface. Tile
//! concepts (providers, coordinates, composite keys) are layered on top by
//! [`TileCacheClient`](super::TileCacheClient).
//!
//! # Design Principles
//!
//! - **String keys**: Human-readable for debugging
//! - **Bytes values**: Cheap to clone out of a memory cache
//! - **Self-contained GC**: Providers manage their own eviction
//! - **Dyn-compatible**: Uses `Pin<Box<dyn Future>>` for `Arc<dyn Cache>`

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use thiserror::Error;

/// Result of a garbage collection operation.
#[derive(Debug, Clone, Default)]
pub struct GcResult {
    /// Number of entries removed during GC.
    pub entries_removed: usize,
    /// Total bytes freed during GC.
    pub bytes_freed: u64,
    /// Duration of the GC operation in milliseconds.
    pub duration_ms: u64,
}

impl fmt::Display for GcResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GC: removed {} entries, freed {} bytes in {}ms",
            self.entries_removed, self.bytes_freed, self.duration_ms
        )
    }
}

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum ServiceCacheError {
    /// I/O error during cache operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored bytes could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Failed to spawn background task.
    #[error("Failed to spawn task: {0}")]
    SpawnError(String),
}

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Generic cache interface for key-value storage.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`; one store is shared by every
/// in-flight tile request.
pub trait Cache: Send + Sync {
    /// Store a value, replacing any existing one.
    fn set(&self, key: &str, value: Bytes) -> BoxFuture<'_, Result<(), ServiceCacheError>>;

    /// Retrieve a value by key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(data))` if the key exists
    /// - `Ok(None)` if the key is not found
    /// - `Err(_)` if an error occurs
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Bytes>, ServiceCacheError>>;

    /// Delete a value by key. Returns whether it existed.
    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>>;

    /// Check if a key exists without retrieving the value.
    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>>;

    /// Remove every entry.
    fn clear(&self) -> BoxFuture<'_, Result<(), ServiceCacheError>>;

    /// Current size of the cache in bytes (may be approximate).
    fn size_bytes(&self) -> u64;

    /// Current number of entries (may be approximate).
    fn entry_count(&self) -> u64;

    /// Maximum configured size in bytes.
    fn max_size_bytes(&self) -> u64;

    /// Trigger garbage collection manually.
    ///
    /// For providers with automatic eviction this just runs pending
    /// maintenance; disk providers evict the oldest files until under the
    /// limit.
    fn gc(&self) -> BoxFuture<'_, Result<GcResult, ServiceCacheError>>;
}

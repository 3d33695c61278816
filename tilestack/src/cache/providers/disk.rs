//! On-disk cache provider.
//!
//! Each entry is one file named by the SHA-256 of its key. Writes go to a
//! temporary file first and are renamed into place, so readers never see a
//! partial tile.
//!
//! # Eviction
//!
//! A background daemon (owned by the provider, stopped by
//! [`DiskCacheProvider::shutdown`]) periodically deletes the files with the
//! oldest modification time until the cache is back under 90% of its limit.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use bytes::Bytes;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::traits::{BoxFuture, Cache, GcResult, ServiceCacheError};

/// Fraction of the limit left after eviction, leaving headroom for writes.
const EVICTION_TARGET_PERCENTAGE: f64 = 0.9;

const ENTRY_EXTENSION: &str = "tile";

/// Disk provider configuration.
#[derive(Debug, Clone)]
pub struct DiskProviderConfig {
    pub directory: PathBuf,
    pub max_size_bytes: u64,
    /// How often the eviction daemon runs; `None` disables it.
    pub gc_interval: Option<Duration>,
}

/// On-disk cache provider with internal garbage collection.
pub struct DiskCacheProvider {
    directory: PathBuf,
    max_size_bytes: u64,
    cached_size: AtomicU64,
    cached_count: AtomicU64,
    gc_handle: Mutex<Option<JoinHandle<()>>>,
    shutdown: CancellationToken,
}

impl DiskCacheProvider {
    /// Opens (creating if needed) the cache directory and starts the GC daemon.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be created or scanned.
    pub async fn start(config: DiskProviderConfig) -> Result<Arc<Self>, ServiceCacheError> {
        tokio::fs::create_dir_all(&config.directory).await?;

        let provider = Arc::new(Self {
            directory: config.directory.clone(),
            max_size_bytes: config.max_size_bytes,
            cached_size: AtomicU64::new(0),
            cached_count: AtomicU64::new(0),
            gc_handle: Mutex::new(None),
            shutdown: CancellationToken::new(),
        });

        provider.rescan().await?;

        if let Some(interval) = config.gc_interval {
            let daemon = Arc::clone(&provider);
            let handle = tokio::spawn(async move { daemon.run_gc_daemon(interval).await });
            *provider.gc_handle.lock() = Some(handle);
        }

        info!(
            dir = %config.directory.display(),
            max_bytes = config.max_size_bytes,
            size = provider.size_bytes(),
            entries = provider.entry_count(),
            "Disk cache provider started"
        );

        Ok(provider)
    }

    /// Cache directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Stops the GC daemon, waiting for an in-progress cycle to finish.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let handle = self.gc_handle.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
        debug!("Disk cache provider shut down");
    }

    async fn run_gc_daemon(&self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        // First tick fires immediately; startup already scanned
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.run_gc_cycle().await {
                        warn!(error = %e, "Disk cache GC cycle failed");
                    }
                }
            }
        }
    }

    /// Recomputes size and entry count from the directory contents.
    async fn rescan(&self) -> Result<(), ServiceCacheError> {
        let directory = self.directory.clone();
        let files = tokio::task::spawn_blocking(move || collect_cache_files(&directory))
            .await
            .map_err(|e| ServiceCacheError::SpawnError(e.to_string()))?;

        self.cached_size
            .store(files.iter().map(|(_, _, size)| size).sum(), Ordering::Relaxed);
        self.cached_count
            .store(files.len() as u64, Ordering::Relaxed);
        Ok(())
    }

    async fn run_gc_cycle(&self) -> Result<GcResult, ServiceCacheError> {
        let start = Instant::now();
        let directory = self.directory.clone();
        let max_bytes = self.max_size_bytes;

        let (removed, freed, remaining, count) =
            tokio::task::spawn_blocking(move || evict_oldest(&directory, max_bytes))
                .await
                .map_err(|e| ServiceCacheError::SpawnError(e.to_string()))?;

        self.cached_size.store(remaining, Ordering::Relaxed);
        self.cached_count.store(count, Ordering::Relaxed);

        let result = GcResult {
            entries_removed: removed,
            bytes_freed: freed,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        if removed > 0 {
            info!(%result, remaining_bytes = remaining, "Disk cache evicted entries");
        }
        Ok(result)
    }

    fn adjust_size(&self, added: u64, removed: u64) {
        let _ = self
            .cached_size
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |size| {
                Some(size.saturating_add(added).saturating_sub(removed))
            });
    }

    fn key_to_filename(key: &str) -> String {
        let digest = Sha256::digest(key.as_bytes());
        let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        format!("{}.{}", hex, ENTRY_EXTENSION)
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.directory.join(Self::key_to_filename(key))
    }
}

/// Cache files in `dir` with their mtime and size.
fn collect_cache_files(dir: &Path) -> Vec<(PathBuf, SystemTime, u64)> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext == ENTRY_EXTENSION)
        })
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            metadata.is_file().then(|| {
                let mtime = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                (entry.path(), mtime, metadata.len())
            })
        })
        .collect()
}

/// Deletes the oldest files until the total is under the eviction target.
///
/// Returns `(removed, bytes_freed, bytes_remaining, entries_remaining)`.
fn evict_oldest(dir: &Path, max_bytes: u64) -> (usize, u64, u64, u64) {
    let mut files = collect_cache_files(dir);
    let mut total: u64 = files.iter().map(|(_, _, size)| size).sum();
    let mut count = files.len() as u64;

    if total <= max_bytes {
        return (0, 0, total, count);
    }

    let target = (max_bytes as f64 * EVICTION_TARGET_PERCENTAGE) as u64;
    files.sort_by_key(|(_, mtime, _)| *mtime);

    let mut removed = 0;
    let mut freed = 0;
    for (path, _, size) in files {
        if total <= target {
            break;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => {
                total -= size;
                freed += size;
                count -= 1;
                removed += 1;
            }
            Err(e) => debug!(path = %path.display(), error = %e, "Failed to evict cache file"),
        }
    }
    (removed, freed, total, count)
}

impl Cache for DiskCacheProvider {
    fn set(&self, key: &str, value: Bytes) -> BoxFuture<'_, Result<(), ServiceCacheError>> {
        let path = self.key_path(key);
        Box::pin(async move {
            let existed = tokio::fs::metadata(&path).await.map(|m| m.len()).ok();

            let temp_path = path.with_extension("tmp");
            tokio::fs::write(&temp_path, &value).await?;
            tokio::fs::rename(&temp_path, &path).await?;

            self.adjust_size(value.len() as u64, existed.unwrap_or(0));
            if existed.is_none() {
                self.cached_count.fetch_add(1, Ordering::Relaxed);
            }
            Ok(())
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Bytes>, ServiceCacheError>> {
        let path = self.key_path(key);
        Box::pin(async move {
            match tokio::fs::read(&path).await {
                Ok(data) => Ok(Some(Bytes::from(data))),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(ServiceCacheError::Io(e)),
            }
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>> {
        let path = self.key_path(key);
        Box::pin(async move {
            let size = tokio::fs::metadata(&path).await.map(|m| m.len()).unwrap_or(0);
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    self.adjust_size(0, size);
                    let _ = self.cached_count.fetch_update(
                        Ordering::Relaxed,
                        Ordering::Relaxed,
                        |n| Some(n.saturating_sub(1)),
                    );
                    Ok(true)
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
                Err(e) => Err(ServiceCacheError::Io(e)),
            }
        })
    }

    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>> {
        let path = self.key_path(key);
        Box::pin(async move { Ok(tokio::fs::try_exists(&path).await.unwrap_or(false)) })
    }

    fn clear(&self) -> BoxFuture<'_, Result<(), ServiceCacheError>> {
        Box::pin(async move {
            let directory = self.directory.clone();
            tokio::task::spawn_blocking(move || {
                for (path, _, _) in collect_cache_files(&directory) {
                    if let Err(e) = std::fs::remove_file(&path) {
                        debug!(path = %path.display(), error = %e, "Failed to remove cache file");
                    }
                }
            })
            .await
            .map_err(|e| ServiceCacheError::SpawnError(e.to_string()))?;
            self.rescan().await
        })
    }

    fn size_bytes(&self) -> u64 {
        self.cached_size.load(Ordering::Relaxed)
    }

    fn entry_count(&self) -> u64 {
        self.cached_count.load(Ordering::Relaxed)
    }

    fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    fn gc(&self) -> BoxFuture<'_, Result<GcResult, ServiceCacheError>> {
        Box::pin(async move { self.run_gc_cycle().await })
    }
}

impl Drop for DiskCacheProvider {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

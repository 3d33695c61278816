//! Application configuration for `TileStackApp`.
//!
//! `AppConfig` gathers everything needed to start the application: cache
//! sizing, HTTP timeout, provider settings and the layer parameters.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::DiskProviderConfig;
use crate::config::{
    default_cache_directory, ConfigFile, DEFAULT_DISK_CACHE_SIZE, DEFAULT_GC_INTERVAL_SECS,
    DEFAULT_MEMORY_CACHE_SIZE,
};
use crate::layer::LayerParams;
use crate::provider::DEFAULT_TIMEOUT_SECS;

/// Memory cache configuration for the application.
#[derive(Debug, Clone)]
pub struct MemoryCacheAppConfig {
    pub max_size_bytes: u64,
}

impl Default for MemoryCacheAppConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MEMORY_CACHE_SIZE as u64,
        }
    }
}

/// Disk cache configuration for the application.
#[derive(Debug, Clone)]
pub struct DiskCacheAppConfig {
    pub directory: PathBuf,
    pub max_size_bytes: u64,
    /// 0 disables the GC daemon
    pub gc_interval_secs: u64,
}

impl DiskCacheAppConfig {
    pub fn new(directory: PathBuf) -> Self {
        Self {
            directory,
            max_size_bytes: DEFAULT_DISK_CACHE_SIZE as u64,
            gc_interval_secs: DEFAULT_GC_INTERVAL_SECS,
        }
    }

    pub(crate) fn provider_config(&self) -> DiskProviderConfig {
        DiskProviderConfig {
            directory: self.directory.clone(),
            max_size_bytes: self.max_size_bytes,
            gc_interval: (self.gc_interval_secs > 0)
                .then(|| Duration::from_secs(self.gc_interval_secs)),
        }
    }
}

/// Application configuration combining all component configs.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// When false, every request goes to the network.
    pub cache_enabled: bool,
    pub memory_cache: MemoryCacheAppConfig,
    pub disk_cache: DiskCacheAppConfig,
    pub http_timeout_secs: u64,
    pub tianditu_key: String,
    pub bing_no_tile_file: Option<PathBuf>,
    pub tms_url: String,
    pub tms_extension: String,
    /// Layer stack parameters, see [`crate::layer::LayerStack::from_configuration`].
    pub layers: LayerParams,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(default_cache_directory())
    }
}

impl AppConfig {
    /// Default settings with the disk cache under `cache_dir`.
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_enabled: true,
            memory_cache: MemoryCacheAppConfig::default(),
            disk_cache: DiskCacheAppConfig::new(cache_dir),
            http_timeout_secs: DEFAULT_TIMEOUT_SECS,
            tianditu_key: String::new(),
            bing_no_tile_file: None,
            tms_url: String::new(),
            tms_extension: String::new(),
            layers: LayerParams::new(),
        }
    }

    /// Translates a loaded configuration file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self {
            cache_enabled: config.cache.enabled,
            memory_cache: MemoryCacheAppConfig {
                max_size_bytes: config.cache.memory_size as u64,
            },
            disk_cache: DiskCacheAppConfig {
                directory: config.cache.directory.clone(),
                max_size_bytes: config.cache.disk_size as u64,
                gc_interval_secs: config.cache.gc_interval_secs,
            },
            http_timeout_secs: config.http.timeout_secs,
            tianditu_key: config.providers.tianditu_key.clone(),
            bing_no_tile_file: config.providers.bing_no_tile_file.clone(),
            tms_url: config.providers.tms_url.clone(),
            tms_extension: config.providers.tms_extension.clone(),
            layers: config.layers.clone(),
        }
    }

    pub fn without_cache(mut self) -> Self {
        self.cache_enabled = false;
        self
    }
}

//! User configuration.
//!
//! An INI file with `[cache]`, `[http]`, `[providers]` and `[layers]`
//! sections. Missing keys fall back to defaults; `[layers]` is handed to
//! [`LayerStack::from_configuration`](crate::layer::LayerStack::from_configuration)
//! unchanged.
//!
//! # Example
//!
//! ```ini
//! [cache]
//! directory = ~/.cache/tilestack
//! memory_size = 256MB
//! disk_size = 2GB
//!
//! [http]
//! timeout_secs = 10
//!
//! [layers]
//! multiLayer = true
//! baseLayer = Bing Satellite
//! overlayLayers = Open Street Map
//! overlayOpacities = 0.5
//! ```

mod file;
mod parser;
mod size;

pub use file::{
    config_directory, config_file_path, default_cache_directory, CacheSettings, ConfigFile,
    ConfigFileError, HttpSettings, ProvidersSettings, DEFAULT_DISK_CACHE_SIZE,
    DEFAULT_GC_INTERVAL_SECS, DEFAULT_MEMORY_CACHE_SIZE,
};
pub use size::{format_size, parse_size, SizeParseError};

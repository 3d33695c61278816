//! Configuration file handling for ~/.config/tilestack/config.ini.
//!
//! Loads and saves user configuration with sensible defaults. Parsing lives
//! in [`super::parser`].

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use crate::layer::LayerParams;
use crate::provider::DEFAULT_TIMEOUT_SECS;

/// Default memory cache size (256 MB).
pub const DEFAULT_MEMORY_CACHE_SIZE: usize = 256 * 1024 * 1024;

/// Default disk cache size (2 GB).
pub const DEFAULT_DISK_CACHE_SIZE: usize = 2 * 1024 * 1024 * 1024;

/// Default interval between disk cache GC passes.
pub const DEFAULT_GC_INTERVAL_SECS: u64 = 300;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    pub enabled: bool,
    pub directory: PathBuf,
    pub memory_size: usize,
    pub disk_size: usize,
    /// Seconds between disk GC passes; 0 disables the daemon
    pub gc_interval_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: default_cache_directory(),
            memory_size: DEFAULT_MEMORY_CACHE_SIZE,
            disk_size: DEFAULT_DISK_CACHE_SIZE,
            gc_interval_secs: DEFAULT_GC_INTERVAL_SECS,
        }
    }
}

/// `[http]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpSettings {
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[providers]` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProvidersSettings {
    pub tianditu_key: String,
    /// Image Bing serves where it has no imagery
    pub bing_no_tile_file: Option<PathBuf>,
    pub tms_url: String,
    pub tms_extension: String,
}

/// The whole configuration file.
///
/// `[layers]` is passed through verbatim as layer-stack parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub cache: CacheSettings,
    pub http: HttpSettings,
    pub providers: ProvidersSettings,
    pub layers: LayerParams,
}

impl ConfigFile {
    /// Load configuration from the default path.
    ///
    /// A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        self.to_ini()
            .write_to_file(path)
            .map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        ini.with_section(Some("cache"))
            .set("enabled", self.cache.enabled.to_string())
            .set("directory", self.cache.directory.to_string_lossy())
            .set("memory_size", self.cache.memory_size.to_string())
            .set("disk_size", self.cache.disk_size.to_string())
            .set("gc_interval_secs", self.cache.gc_interval_secs.to_string());
        ini.with_section(Some("http"))
            .set("timeout_secs", self.http.timeout_secs.to_string());
        ini.with_section(Some("providers"))
            .set("tianditu_key", self.providers.tianditu_key.as_str())
            .set(
                "bing_no_tile_file",
                self.providers
                    .bing_no_tile_file
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            )
            .set("tms_url", self.providers.tms_url.as_str())
            .set("tms_extension", self.providers.tms_extension.as_str());

        let mut layers: Vec<_> = self.layers.iter().collect();
        layers.sort();
        for (key, value) in layers {
            ini.with_section(Some("layers")).set(key.as_str(), value.as_str());
        }
        ini
    }
}

/// Get the path to the config directory (~/.config/tilestack).
pub fn config_directory() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tilestack")
}

/// Get the path to the config file (~/.config/tilestack/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

/// Default tile cache directory (~/.cache/tilestack).
pub fn default_cache_directory() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tilestack")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();
        assert!(config.cache.enabled);
        assert_eq!(config.cache.memory_size, DEFAULT_MEMORY_CACHE_SIZE);
        assert_eq!(config.cache.disk_size, DEFAULT_DISK_CACHE_SIZE);
        assert_eq!(config.http.timeout_secs, 10);
        assert!(config.layers.is_empty());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.cache.directory = temp.path().join("tiles");
        config.cache.memory_size = 1 << 20;
        config.http.timeout_secs = 3;
        config.providers.tianditu_key = "abc123".to_string();
        config
            .layers
            .insert("multiLayer".to_string(), "true".to_string());
        config
            .layers
            .insert("layers".to_string(), "Bing Satellite,Open Street Map".to_string());

        config.save_to(&path).unwrap();
        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_file_path() {
        let path = config_file_path();
        assert!(path.ends_with("tilestack/config.ini"));
    }
}

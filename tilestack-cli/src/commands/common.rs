//! Common helpers shared across CLI commands.

use std::path::Path;

use tilestack::config::ConfigFile;
use tilestack::layer::MapId;
use tilestack::provider::{ProviderRegistry, ProviderSettings};

use crate::error::CliError;

/// Loads the configuration from `path`, or the default location.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::Config(format!(
                    "config file '{}' does not exist",
                    path.display()
                )));
            }
            ConfigFile::load_from(path)?
        }
        None => ConfigFile::load()?,
    };
    Ok(config)
}

/// Provider registry for listing and name lookup; no placeholder images.
pub fn registry_from_config(config: &ConfigFile) -> ProviderRegistry {
    ProviderRegistry::with_defaults(&ProviderSettings {
        tianditu_key: config.providers.tianditu_key.clone(),
        bing_no_tile: None,
        tms_url: config.providers.tms_url.clone(),
        tms_extension: config.providers.tms_extension.clone(),
    })
}

/// Resolves a `--map` argument: a numeric id, or a provider name.
pub fn resolve_map(map: &str, registry: &ProviderRegistry) -> Result<MapId, CliError> {
    if let Ok(id) = map.trim().parse::<i32>() {
        return Ok(MapId(id));
    }
    registry
        .provider_for_name(map)
        .map(|(id, _)| id)
        .ok_or_else(|| CliError::UnknownMap(map.to_string()))
}

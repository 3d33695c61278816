//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use std::path::PathBuf;

use ini::Ini;

use super::file::{ConfigFile, ConfigFileError};
use super::size::parse_size;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("enabled") {
            config.cache.enabled = parse_bool(v);
        }
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.cache.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("memory_size") {
            config.cache.memory_size = size_value("cache", "memory_size", v)?;
        }
        if let Some(v) = section.get("disk_size") {
            config.cache.disk_size = size_value("cache", "disk_size", v)?;
        }
        if let Some(v) = section.get("gc_interval_secs") {
            config.cache.gc_interval_secs = seconds_value("cache", "gc_interval_secs", v)?;
        }
    }

    // [http] section
    if let Some(section) = ini.section(Some("http")) {
        if let Some(v) = section.get("timeout_secs") {
            let secs = seconds_value("http", "timeout_secs", v)?;
            if secs == 0 {
                return Err(invalid("http", "timeout_secs", v, "must be at least 1"));
            }
            config.http.timeout_secs = secs;
        }
    }

    // [providers] section
    if let Some(section) = ini.section(Some("providers")) {
        if let Some(v) = section.get("tianditu_key") {
            config.providers.tianditu_key = v.trim().to_string();
        }
        if let Some(v) = section.get("bing_no_tile_file") {
            let v = v.trim();
            if !v.is_empty() {
                config.providers.bing_no_tile_file = Some(expand_tilde(v));
            }
        }
        if let Some(v) = section.get("tms_url") {
            config.providers.tms_url = v.trim().to_string();
        }
        if let Some(v) = section.get("tms_extension") {
            config.providers.tms_extension = v.trim().trim_start_matches('.').to_string();
        }
    }

    // [layers] section, passed through
    if let Some(section) = ini.section(Some("layers")) {
        for (key, value) in section.iter() {
            config.layers.insert(key.to_string(), value.to_string());
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn size_value(section: &str, key: &str, value: &str) -> Result<usize, ConfigFileError> {
    parse_size(value).map_err(|_| {
        invalid(
            section,
            key,
            value,
            "expected format like '2GB', '500MB', or '1024KB'",
        )
    })
}

fn seconds_value(section: &str, key: &str, value: &str) -> Result<u64, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, "expected a whole number of seconds"))
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

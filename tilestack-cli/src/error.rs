//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use tilestack::app::AppError;
use tilestack::cache::ServiceCacheError;
use tilestack::config::ConfigFileError;
use tilestack::layer::MapId;
use tilestack::tile::FetchError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to load the configuration file
    ConfigFile(ConfigFileError),
    /// Failed to start the pipeline
    Startup(AppError),
    /// The map id or name does not resolve to anything servable
    UnknownMap(String),
    /// The request cannot be served at this address
    Unservable { map_id: MapId, reason: String },
    /// The tile request failed
    Fetch(FetchError),
    /// A cache operation failed
    Cache(ServiceCacheError),
    /// Failed to write output file
    FileWrite { path: String, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::UnknownMap(_) => {
                eprintln!();
                eprintln!("Run `tilestack providers` to list map ids and names.");
            }
            CliError::Fetch(FetchError::NoVisibleLayers) => {
                eprintln!();
                eprintln!("Check the [layers] section of your config.ini.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Startup(e) => write!(f, "Failed to start: {}", e),
            CliError::UnknownMap(map) => write!(f, "Unknown map '{}'", map),
            CliError::Unservable { map_id, reason } => {
                write!(f, "Map {} cannot serve this tile: {}", map_id, reason)
            }
            CliError::Fetch(e) => write!(f, "Failed to fetch tile: {}", e),
            CliError::Cache(e) => write!(f, "Cache operation failed: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Startup(e) => Some(e),
            CliError::Fetch(e) => Some(e),
            CliError::Cache(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::Startup(e)
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        CliError::Fetch(e)
    }
}

impl From<ServiceCacheError> for CliError {
    fn from(e: ServiceCacheError) -> Self {
        CliError::Cache(e)
    }
}

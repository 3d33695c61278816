//! Application error types.

use std::fmt;

use crate::cache::ServiceCacheError;
use crate::provider::ProviderError;

/// Errors that can occur during application startup.
#[derive(Debug)]
pub enum AppError {
    /// Failed to start the disk cache.
    DiskCacheStart(ServiceCacheError),

    /// Failed to build the HTTP client.
    HttpClient(ProviderError),

    /// Configuration error.
    Config(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DiskCacheStart(e) => {
                write!(f, "Failed to start disk cache: {}", e)
            }
            AppError::HttpClient(e) => {
                write!(f, "Failed to create HTTP client: {}", e)
            }
            AppError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::DiskCacheStart(e) => Some(e),
            AppError::HttpClient(e) => Some(e),
            AppError::Config(_) => None,
        }
    }
}

impl From<ServiceCacheError> for AppError {
    fn from(e: ServiceCacheError) -> Self {
        AppError::DiskCacheStart(e)
    }
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        AppError::HttpClient(e)
    }
}

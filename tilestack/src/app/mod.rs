//! Application bootstrap and lifecycle management.
//!
//! [`TileStackApp`] turns an [`AppConfig`] into a running pipeline: caches,
//! provider registry, HTTP client and the [`MappingEngine`](crate::engine::MappingEngine)
//! with the configured layer stack registered.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                     TileStackApp                      │
//! │                                                       │
//! │  1. DiskCacheProvider (owns GC daemon)                │
//! │  2. MemoryCacheProvider ──► TieredCache (memory/disk) │
//! │  3. ProviderRegistry + AsyncReqwestClient             │
//! │  4. MappingEngine + configured LayerStack             │
//! └───────────────────────────────────────────────────────┘
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::TileStackApp;
pub use config::{AppConfig, DiskCacheAppConfig, MemoryCacheAppConfig};
pub use error::AppError;

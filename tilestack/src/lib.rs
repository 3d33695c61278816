//! tilestack - layered map tile fetching and compositing
//!
//! Fetches raster tiles from third-party tile servers, caches them on disk
//! and in memory, and alpha-composites an ordered stack of layers into one
//! tile that is cached under its own key.
//!
//! # High-Level API
//!
//! The [`app`] module wires everything together:
//!
//! ```ignore
//! use tilestack::app::{AppConfig, TileStackApp};
//! use tilestack::config::ConfigFile;
//!
//! let config = AppConfig::from_config_file(&ConfigFile::load()?);
//! let app = TileStackApp::start(config).await?;
//!
//! let map_id = app.composite_map_id().unwrap_or(tilestack::layer::MapId(1));
//! if let Some(reply) = app.engine().get_tile(map_id, 3, 5, 7) {
//!     let tile = reply.finished().await?;
//!     println!("{} bytes of {}", tile.data.len(), tile.format);
//! }
//! ```

pub mod app;
pub mod cache;
pub mod compositor;
pub mod config;
pub mod coord;
pub mod engine;
pub mod layer;
pub mod logging;
pub mod orchestrator;
pub mod provider;
pub mod telemetry;
pub mod tile;

/// Version of the tilestack library and CLI.
///
/// Synchronized across the workspace; injected from `Cargo.toml` at
/// compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

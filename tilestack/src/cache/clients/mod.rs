//! Domain-specific cache clients.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │  TileCacheClient                     │
//! │                                      │
//! │  (provider, TileCoord) → tile key    │
//! │  (stack key, TileCoord) → comp. key  │
//! │  {format, data} bincode entries      │
//! └──────────────────┬───────────────────┘
//!                    │
//!                    ▼
//! ┌──────────────────────────────────────┐
//! │  Arc<dyn Cache>                      │
//! │  string → Bytes                      │
//! └──────────────────────────────────────┘
//! ```

mod tile;

pub use tile::TileCacheClient;

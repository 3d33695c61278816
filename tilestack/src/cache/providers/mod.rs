//! Cache provider implementations.
//!
//! Each provider implements the `Cache` trait and manages its own eviction.
//!
//! - [`MemoryCacheProvider`]: In-memory LRU cache using moka
//! - [`DiskCacheProvider`]: On-disk cache with background GC daemon
//! - [`TieredCache`]: Memory in front of disk

mod disk;
mod memory;
mod tiered;

pub use disk::{DiskCacheProvider, DiskProviderConfig};
pub use memory::MemoryCacheProvider;
pub use tiered::TieredCache;

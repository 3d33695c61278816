//! Cache management CLI commands.

use clap::Subcommand;
use tilestack::cache::{Cache, DiskCacheProvider, DiskProviderConfig};
use tilestack::config::{format_size, ConfigFile};

use crate::error::CliError;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Clear the disk cache, removing all cached tiles
    Clear,
    /// Show disk cache statistics
    Stats,
    /// Evict the oldest tiles until the cache is under its size limit
    Gc,
}

/// Run a cache subcommand.
pub async fn run(action: CacheAction, config: &ConfigFile) -> Result<(), CliError> {
    let cache_dir = &config.cache.directory;
    let disk = DiskCacheProvider::start(DiskProviderConfig {
        directory: cache_dir.clone(),
        max_size_bytes: config.cache.disk_size as u64,
        gc_interval: None,
    })
    .await?;

    match action {
        CacheAction::Clear => {
            println!("Clearing disk cache at: {}", cache_dir.display());
            let entries = disk.entry_count();
            let bytes = disk.size_bytes();
            disk.clear().await?;
            println!(
                "Deleted {} tiles, freed {}",
                entries,
                format_size(bytes as usize)
            );
        }
        CacheAction::Stats => {
            println!("Disk cache: {}", cache_dir.display());
            println!("  Tiles: {}", disk.entry_count());
            println!(
                "  Size:  {} of {}",
                format_size(disk.size_bytes() as usize),
                format_size(disk.max_size_bytes() as usize)
            );
        }
        CacheAction::Gc => {
            let result = disk.gc().await?;
            println!("{}", result);
        }
    }

    disk.shutdown().await;
    Ok(())
}

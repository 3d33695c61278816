//! Fetch one tile through the pipeline and save it.

use std::path::{Path, PathBuf};

use clap::Args;
use tilestack::app::{AppConfig, TileStackApp};
use tilestack::config::{format_size, ConfigFile};
use tilestack::provider::error_tile;
use tilestack::tile::{SingleTileFetch, TileRequest};
use tracing::{info, warn};

use super::common::resolve_map;
use crate::error::CliError;

/// Arguments for `tilestack fetch`.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Map id or provider name (defaults to the configured layer stack)
    #[arg(long)]
    pub map: Option<String>,

    /// Tile column
    #[arg(long)]
    pub x: u32,

    /// Tile row
    #[arg(long)]
    pub y: u32,

    /// Zoom level
    #[arg(long)]
    pub zoom: u8,

    /// Output file (defaults to tile_{zoom}_{x}_{y}.{format})
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Bypass the tile cache
    #[arg(long)]
    pub no_cache: bool,

    /// Print fetch statistics afterwards
    #[arg(long)]
    pub stats: bool,

    /// Write the error placeholder tile when the fetch fails
    #[arg(long)]
    pub error_tile: bool,
}

/// Run the fetch command.
pub async fn run(args: FetchArgs, config: ConfigFile) -> Result<(), CliError> {
    let mut app_config = AppConfig::from_config_file(&config);
    if args.no_cache {
        app_config = app_config.without_cache();
    }
    let app = TileStackApp::start(app_config).await?;

    let map_id = match args.map.as_deref() {
        Some(map) => resolve_map(map, app.providers())?,
        None => app.composite_map_id().ok_or_else(|| {
            CliError::Config("no layer stack configured; pass --map".to_string())
        })?,
    };

    let Some(reply) = app.engine().get_tile(map_id, args.x, args.y, args.zoom) else {
        let request = TileRequest::new(map_id, args.x, args.y, args.zoom);
        let reason = match SingleTileFetch::check(app.engine().context(), &request) {
            Err(e) => e.to_string(),
            Ok(()) => "no visible layer or no URL for this tile".to_string(),
        };
        app.shutdown().await;
        return Err(CliError::Unservable { map_id, reason });
    };

    let result = reply.finished().await;
    app.shutdown().await;
    let tile = match result {
        Ok(tile) => tile,
        Err(e) if args.error_tile => {
            let path = output_path(&args, "png");
            warn!(error = %e, path = %path.display(), "Fetch failed, writing error tile");
            write_tile(&path, &error_tile())?;
            eprintln!("Wrote error tile to {}", path.display());
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    let path = output_path(&args, &tile.format);
    write_tile(&path, &tile.data)?;

    info!(path = %path.display(), bytes = tile.data.len(), "Tile written");
    println!(
        "{} ({}, {}{})",
        path.display(),
        tile.format,
        format_size(tile.data.len()),
        if tile.cached { ", cached" } else { "" }
    );

    if args.stats {
        println!();
        println!("{}", app.metrics().snapshot());
    }
    Ok(())
}

fn output_path(args: &FetchArgs, format: &str) -> PathBuf {
    args.output.clone().unwrap_or_else(|| {
        PathBuf::from(format!(
            "tile_{}_{}_{}.{}",
            args.zoom, args.x, args.y, format
        ))
    })
}

fn write_tile(path: &Path, data: &[u8]) -> Result<(), CliError> {
    std::fs::write(path, data).map_err(|error| CliError::FileWrite {
        path: path.display().to_string(),
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        fetch: FetchArgs,
    }

    fn parse(args: &[&str]) -> FetchArgs {
        TestCli::parse_from(std::iter::once("fetch").chain(args.iter().copied())).fetch
    }

    #[test]
    fn test_default_output_path() {
        let args = parse(&["--x", "3", "--y", "5", "--zoom", "7"]);
        assert!(!args.error_tile);
        assert_eq!(output_path(&args, "jpg"), PathBuf::from("tile_7_3_5.jpg"));
    }

    #[test]
    fn test_error_tile_written_to_output() {
        let temp = tempfile::TempDir::new().unwrap();
        let out = temp.path().join("failed.png");
        let args = parse(&[
            "--x",
            "3",
            "--y",
            "5",
            "--zoom",
            "7",
            "--error-tile",
            "--output",
            out.to_str().unwrap(),
        ]);
        assert!(args.error_tile);

        let path = output_path(&args, "png");
        write_tile(&path, &error_tile()).unwrap();

        let written = std::fs::read(&out).unwrap();
        assert!(written.starts_with(b"\x89PNG\r\n\x1a\n"));
    }
}

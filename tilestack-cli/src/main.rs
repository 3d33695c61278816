//! tilestack CLI - Command-line interface
//!
//! Fetches single or composited map tiles and manages the tile cache.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tilestack::logging::{default_log_dir, default_log_file, init_logging};

use commands::cache::CacheAction;
use commands::common::load_config;
use commands::fetch::FetchArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "tilestack")]
#[command(version = tilestack::VERSION)]
#[command(about = "Fetch, cache and composite layered raster map tiles", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ~/.config/tilestack/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one tile and write it to a file
    Fetch(FetchArgs),
    /// List bundled tile providers
    Providers,
    /// Show the configured layer stack and its composite key
    Layers,
    /// Manage the disk cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    let _logging = match init_logging(&default_log_dir(), default_log_file(), level) {
        Ok(guard) => guard,
        Err(e) => CliError::LoggingInit(e.to_string()).exit(),
    };

    if let Err(e) = run(cli).await {
        e.exit();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Fetch(args) => commands::fetch::run(args, config).await,
        Commands::Providers => {
            commands::providers::run(&config);
            Ok(())
        }
        Commands::Layers => {
            commands::layers::run(&config);
            Ok(())
        }
        Commands::Cache { action } => commands::cache::run(action, &config).await,
    }
}

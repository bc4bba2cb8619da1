//! Tender-Dates main entry point
//!
//! Running with no arguments collects the first two search results pages of
//! the procurement portal and prints the publication date of every tender found.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tender_dates::config::{load_config_with_hash, Config};
use tender_dates::crawler::crawl;
use tracing_subscriber::EnvFilter;

/// Tender-Dates: publication dates for public procurement notices
///
/// Collects tender links from the portal's search results and reads the
/// publication date from each tender's XML printable form.
#[derive(Parser, Debug)]
#[command(name = "tender-dates")]
#[command(version = "1.0.0")]
#[command(about = "Publication dates for public procurement notices", long_about = None)]
struct Cli {
    /// Optional TOML configuration file; built-in defaults are used otherwise
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    crawl(config).await.context("Run failed")?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tender_dates=info,warn"),
            1 => EnvFilter::new("tender_dates=debug,info"),
            2 => EnvFilter::new("tender_dates=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

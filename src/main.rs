//! Unique-Ledger main entry point
//!
//! This is the command-line interface for the Unique-Ledger item scraper.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use unique_ledger::config::{load_config_with_hash, Config};
use unique_ledger::crawler::{output_path, scrape};

/// Unique-Ledger: scrapes unique item records from a wiki
///
/// Reads the index page, fetches every linked item page through a local cache,
/// classifies each item, and writes a category-ordered JSON document.
#[derive(Parser, Debug)]
#[command(name = "unique-ledger")]
#[command(version)]
#[command(about = "Scrapes unique item records from a wiki", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Ignore cached pages (responses are still written to the cache)
    #[arg(long)]
    no_cache: bool,

    /// Only process the first N discovered items
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    limit: Option<u64>,

    /// Validate config and show the effective settings without scraping
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    apply_overrides(&mut config, &cli);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    match scrape(config, !cli.quiet).await {
        Ok(_) => {
            tracing::info!("Run completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("unique_ledger=info,warn"),
            1 => EnvFilter::new("unique_ledger=debug,info"),
            _ => EnvFilter::new("unique_ledger=trace,debug"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if cli.no_cache {
        config.cache.use_cache = false;
    }

    if let Some(limit) = cli.limit {
        config.scraper.test_mode = true;
        config.scraper.test_amount = usize::try_from(limit).unwrap_or(usize::MAX);
    }
}

/// Handles the --dry-run mode: shows what a run would do
fn handle_dry_run(config: &Config) {
    println!("=== Unique-Ledger Dry Run ===\n");

    println!("Source:");
    println!("  Index page: {}", config.index_url());
    println!("  Concurrency limit: {}", config.scraper.concurrency_limit);
    println!("  Request timeout: {}s", config.scraper.request_timeout_secs);
    match config.item_limit() {
        Some(limit) => println!("  Test mode: first {} items", limit),
        None => println!("  Test mode: off"),
    }

    println!("\nCache:");
    println!("  Directory: {}", config.cache.dir);
    println!("  Expiry: {}s", config.cache.expiry_secs);
    println!("  Read from cache: {}", config.cache.use_cache);

    println!("\nRetry:");
    println!("  Attempts: {}", config.retry.retry_limit);
    println!("  Backoff factor: {}", config.retry.backoff_factor);

    println!("\nOutput:");
    println!("  Results: {}", output_path(config).display());
    println!("  Images: {}", config.output.image_dir);

    println!("\nCategories ({}):", config.categories.len());
    for category in &config.categories {
        println!("  - {}", category);
    }

    println!("\nLocations ({}):", config.locations.len());
    for location in &config.locations {
        println!("  - {}", location);
    }

    println!("\n✓ Configuration is valid");
}

//! Kudzu main entry point
//!
//! Command-line interface for the kudzu mirroring crawler: seed addresses
//! come in as program arguments, every fetched page is mirrored into the
//! repository directory.

use clap::Parser;
use kudzu::config::{load_config, validate, Config};
use kudzu::crawler::Crawler;
use kudzu::treatment::{SaveToRepository, Treatment};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Kudzu: a recursive, concurrent mirroring crawler
///
/// Fetches the given seed addresses, mirrors each page under the repository
/// root, and recursively follows discovered links up to the configured
/// depth.
#[derive(Parser, Debug)]
#[command(name = "kudzu")]
#[command(version)]
#[command(about = "A recursive, concurrent mirroring crawler", long_about = None)]
struct Cli {
    /// Seed addresses to start crawling from
    #[arg(value_name = "SEEDS", required = true)]
    seeds: Vec<String>,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum crawl depth; zero fetches seeds only, negative is unbounded
    #[arg(short, long, allow_hyphen_values = true)]
    depth: Option<i64>,

    /// Directory mirrored pages are written under
    #[arg(short, long, value_name = "DIR")]
    repository: Option<PathBuf>,

    /// Cap on matches taken per policy matcher; negative for unlimited
    #[arg(long, allow_hyphen_values = true)]
    max_follow_through: Option<i64>,

    /// Fetch each address at most once
    #[arg(long)]
    deduplicate: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    // CLI flags override file values.
    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(limit) = cli.max_follow_through {
        config.crawler.max_follow_through = limit;
    }
    if cli.deduplicate {
        config.crawler.deduplicate = true;
    }
    if let Some(repository) = &cli.repository {
        config.repository.root = repository.display().to_string();
    }

    // Overrides can invalidate a previously valid configuration.
    validate(&config)?;

    tracing::info!(
        seeds = cli.seeds.len(),
        max_depth = config.crawler.max_depth,
        repository = %config.repository.root,
        "starting crawl"
    );

    let treatments: Vec<Box<dyn Treatment>> = vec![Box::new(SaveToRepository::new(
        config.repository.root.clone(),
    ))];

    let crawler = Arc::new(Crawler::new(&config, cli.seeds, treatments)?);
    crawler.start_crawl().await;

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kudzu=info,warn"),
            1 => EnvFilter::new("kudzu=debug,info"),
            2 => EnvFilter::new("kudzu=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

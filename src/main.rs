//! Sumi-Scroll main entry point
//!
//! This is the command-line interface for the Sumi-Scroll book crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sumi_scroll::config::{load_ruleset_with_hash, validate};
use sumi_scroll::crawler::Coordinator;
use sumi_scroll::output::print_summary;
use sumi_scroll::url::parse_page_url;
use tracing_subscriber::EnvFilter;

/// Sumi-Scroll: a paginated book crawler
///
/// Sumi-Scroll reads a book's chapter index (across index pagination),
/// downloads every chapter (across chapter pagination) and writes the whole
/// book to a single text file named after its title.
#[derive(Parser, Debug)]
#[command(name = "sumi-scroll")]
#[command(version)]
#[command(about = "Crawl a paginated book into one text file", long_about = None)]
struct Cli {
    /// URL of the book's main chapter index page
    #[arg(value_name = "URL")]
    url: String,

    /// Path to the TOML site ruleset
    #[arg(long, value_name = "PATH", default_value = "config.toml")]
    config: PathBuf,

    /// Maximum number of chapters downloaded at once (overrides the ruleset)
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Directory the book file is written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

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

    let index_url = parse_page_url(&cli.url)
        .with_context(|| format!("Invalid book URL: {}", cli.url))?;

    tracing::info!("Loading ruleset from: {}", cli.config.display());
    let (mut rules, hash) = load_ruleset_with_hash(&cli.config)
        .with_context(|| format!("Failed to load ruleset {}", cli.config.display()))?;
    tracing::info!("Ruleset loaded successfully (hash: {})", hash);

    if let Some(concurrency) = cli.concurrency {
        rules.concurrency = concurrency;
        validate(&rules).context("Invalid --concurrency")?;
    }

    tracing::info!(
        "Crawling {} with up to {} concurrent chapters",
        index_url,
        rules.concurrency
    );

    let coordinator = Coordinator::new(rules).context("Failed to initialize crawler")?;
    let summary = match coordinator.run(&index_url, &cli.output_dir).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if !cli.quiet {
        print_summary(&summary);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_scroll=info,warn"),
            1 => EnvFilter::new("sumi_scroll=debug,info"),
            2 => EnvFilter::new("sumi_scroll=trace,debug"),
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

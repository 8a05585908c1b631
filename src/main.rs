//! Mailtrawl main entry point
//!
//! This is the command-line interface for the Mailtrawl email harvester.

use anyhow::Context;
use clap::Parser;
use mailtrawl::config::{load_config_with_hash, validate, Config};
use mailtrawl::crawler::Coordinator;
use mailtrawl::output::{aggregate, print_statistics, save_report, SaveOutcome};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Mailtrawl: a polite same-site email harvester
///
/// Mailtrawl crawls a website from a seed URL, collects the email addresses
/// published on its pages together with the text around them, and saves one
/// row per unique address to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "mailtrawl")]
#[command(version)]
#[command(about = "A polite same-site email harvester", long_about = None)]
struct Cli {
    /// Seed URL; only pages on its host are crawled
    #[arg(short, long, value_name = "URL")]
    url: String,

    /// Maximum number of pages to visit [default: 100]
    #[arg(short, long, value_name = "N")]
    max_pages: Option<usize>,

    /// CSV file to write [default: emails_data.csv]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds [default: 10]
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Minimum delay between requests to the same host, in milliseconds [default: 1000]
    #[arg(long, value_name = "MS")]
    delay: Option<u64>,

    /// Also write logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(max_pages) = self.max_pages {
            config.crawler.max_pages = max_pages;
        }
        if let Some(output) = &self.output {
            config.output.csv_path = output.display().to_string();
        }
        if let Some(timeout) = self.timeout {
            config.crawler.request_timeout = timeout.saturating_mul(1000);
        }
        if let Some(delay) = self.delay {
            config.crawler.politeness_delay = delay;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path).with_context(|| {
                format!("Failed to load configuration from {}", path.display())
            })?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);
    validate(&config).context("Invalid configuration")?;

    handle_crawl(&cli.url, config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// With `log_file` set, every event is also appended to that file without
/// ANSI colors.
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mailtrawl=info,warn"),
            1 => EnvFilter::new("mailtrawl=debug,info"),
            2 => EnvFilter::new("mailtrawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(false).with_file(false))
        .with(file_layer)
        .init();

    Ok(())
}

/// Handles the main crawl operation
///
/// Ctrl-C cancels the crawl; whatever was found up to that point is still
/// saved.
async fn handle_crawl(seed: &str, config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} (max {} pages, {}ms politeness delay)",
        seed,
        config.crawler.max_pages,
        config.crawler.politeness_delay
    );

    let mut coordinator =
        Coordinator::new(seed, &config).with_context(|| format!("Failed to start crawl of {}", seed))?;

    let token = coordinator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping crawl");
            token.cancel();
        }
    });

    let results = coordinator.run().await;
    let report = aggregate(results);
    tracing::info!("Found {} unique email addresses in total", report.len());

    let output_path = PathBuf::from(&config.output.csv_path);
    if let SaveOutcome::Empty = save_report(&report, &output_path) {
        println!("No email addresses found on {}", seed);
    }

    println!();
    print_statistics(&coordinator.statistics());

    Ok(())
}

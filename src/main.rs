//! Sitemap-Usage main entry point
//!
//! This is the command-line interface for the sitemap link-usage auditor.

use anyhow::Context;
use clap::Parser;
use sitemap_usage::config::{load_config_with_hash, validate, Config};
use sitemap_usage::crawler::crawl;
use sitemap_usage::output::{print_statistics, writers_from_config, CrawlStatistics};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitemap-Usage: find orphaned and broken sitemap pages
///
/// Sitemap-Usage reads a site's sitemap index, crawls every listed page in
/// paced batches, and reports how often each page is linked from the other
/// pages of its sitemap.
#[derive(Parser, Debug)]
#[command(name = "sitemap-usage")]
#[command(version = "1.0.0")]
#[command(about = "A sitemap link-usage auditor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Crawl this sitemap index instead of the configured one
    #[arg(long, value_name = "URL")]
    index_url: Option<String>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(index_url) = cli.index_url {
        tracing::info!("Overriding sitemap index with {}", index_url);
        config.sitemap.index_url = index_url;
        validate(&config).context("Invalid --index-url")?;
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(&config, &config_hash).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_usage=info,warn"),
            1 => EnvFilter::new("sitemap_usage=debug,info"),
            2 => EnvFilter::new("sitemap_usage=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Sitemap-Usage Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Batch size: {}", config.crawler.batch_size);
    println!("  Inter-batch delay: {}ms", config.crawler.inter_batch_delay);
    println!("  Request timeout: {}ms", config.crawler.request_timeout);

    println!("\nSitemap:");
    println!("  Index URL: {}", config.sitemap.index_url);
    println!(
        "  Excluded segments: {}",
        if config.sitemap.excluded_segments.is_empty() {
            "(none)".to_string()
        } else {
            config.sitemap.excluded_segments.join(", ")
        }
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Summary: {}", config.output.summary_path);
    if let Some(json_path) = &config.output.json_path {
        println!("  JSON report: {}", json_path);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, config_hash: &str) -> anyhow::Result<()> {
    let report = crawl(config, config_hash)
        .await
        .with_context(|| format!("Crawl of {} failed", config.sitemap.index_url))?;

    tracing::info!(
        "Crawl completed: {} sitemaps, {} pages",
        report.groups.len(),
        report.total_pages()
    );

    print_statistics(&CrawlStatistics::from_report(&report));

    for writer in writers_from_config(&config.output) {
        writer
            .write_report(&report)
            .with_context(|| format!("Failed to write {} report", writer.format()))?;
        println!("✓ {} report written to: {}", writer.format(), writer.path().display());
    }

    Ok(())
}

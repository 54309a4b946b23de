//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and error classification
//! - HTML parsing and link extraction
//! - Batch scheduling with a join barrier and pacing delay
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use fetcher::{build_http_client, HttpFetcher, PageSource};
pub use parser::{parse_html, ParsedPage};
pub use scheduler::{commit_findings, CrawlScheduler};

use crate::config::Config;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Load the sitemap index and its child sitemaps
/// 3. Crawl each sitemap group in batches
/// 4. Return the completed groups with run metadata
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `config_hash` - Hash of the configuration file
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed successfully
/// * `Err(UsageError)` - The crawl could not start or the index failed
pub async fn crawl(config: &Config, config_hash: &str) -> Result<CrawlReport> {
    run_crawl(config, config_hash).await
}

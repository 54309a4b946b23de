//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator loads the sitemap groups once, then hands each group to
//! the batch scheduler strictly one after another.

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, HttpFetcher};
use crate::crawler::scheduler::CrawlScheduler;
use crate::sitemap::SitemapLoader;
use crate::state::SitemapGroup;
use crate::url::UrlFilter;
use crate::{ConfigError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// The completed result of one crawl run
///
/// This is everything the reporting layer consumes.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    /// The sitemap index the run started from
    pub index_url: String,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// SHA-256 of the configuration file that produced the run
    pub config_hash: String,

    /// Completed groups in crawl order
    pub groups: Vec<SitemapGroup>,
}

impl CrawlReport {
    /// Returns the wall-clock duration of the run
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Returns the number of pages across all groups
    pub fn total_pages(&self) -> usize {
        self.groups.iter().map(SitemapGroup::len).sum()
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    index_url: Url,
    loader: SitemapLoader,
    scheduler: CrawlScheduler,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(UsageError)` - Bad index URL or HTTP client construction failed
    pub fn new(config: &Config) -> Result<Self> {
        let index_url = parse_index_url(config)?;
        let client = build_http_client(&config.user_agent, &config.crawler)?;

        let filter = UrlFilter::new(&index_url, &config.sitemap.excluded_segments);
        let fetcher = HttpFetcher::new(client.clone(), filter);

        Ok(Self {
            index_url,
            loader: SitemapLoader::new(client, config.sitemap.excluded_segments.clone()),
            scheduler: CrawlScheduler::from_config(Arc::new(fetcher), &config.crawler),
        })
    }

    /// Returns the sitemap index URL the crawl starts from
    pub fn index_url(&self) -> &Url {
        &self.index_url
    }

    /// Runs the crawl
    ///
    /// This is the core crawling logic that:
    /// 1. Loads the sitemap index and seeds one registry per child sitemap
    /// 2. Crawls each group in order, waiting for one before the next
    /// 3. Returns the completed groups
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SitemapGroup>)` - Every record is Ok or Error
    /// * `Err(UsageError)` - The sitemap index could not be loaded
    pub async fn run(&self) -> Result<Vec<SitemapGroup>> {
        let start_time = Instant::now();
        let groups = self.loader.load_groups(&self.index_url).await?;

        for (index, group) in groups.iter().enumerate() {
            tracing::info!(
                "Group {}/{}: {} ({})",
                index + 1,
                groups.len(),
                group.name,
                group.source_url
            );
            self.scheduler.crawl_group(group).await;
        }

        let total_pages: usize = groups.iter().map(SitemapGroup::len).sum();
        let elapsed = start_time.elapsed();
        tracing::info!(
            "Crawl complete: {} groups, {} pages in {:.2}s",
            groups.len(),
            total_pages,
            elapsed.as_secs_f64()
        );

        Ok(groups)
    }
}

fn parse_index_url(config: &Config) -> Result<Url> {
    Url::parse(&config.sitemap.index_url).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid index_url '{}': {}",
            config.sitemap.index_url, e
        ))
        .into()
    })
}

/// Runs a crawl and wraps the result with run metadata
///
/// # Arguments
///
/// * `config` - The validated crawler configuration
/// * `config_hash` - Hash of the configuration file, recorded in the report
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed
/// * `Err(UsageError)` - Crawl could not start
pub async fn run_crawl(config: &Config, config_hash: &str) -> Result<CrawlReport> {
    let coordinator = Coordinator::new(config)?;

    let started_at = Utc::now();
    tracing::info!("Starting crawl of {}", coordinator.index_url());

    let groups = coordinator.run().await?;

    Ok(CrawlReport {
        index_url: coordinator.index_url().to_string(),
        started_at,
        finished_at: Utc::now(),
        config_hash: config_hash.to_string(),
        groups,
    })
}

//! Batch scheduler for crawling one sitemap group
//!
//! This module handles:
//! - Partitioning a group's pages into fixed-size batches
//! - Fetching every page of a batch concurrently
//! - Waiting for the whole batch before starting the next one
//! - Pacing batches with a fixed delay
//! - Committing findings into the shared registry

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::PageSource;
use crate::state::{PageFindings, PageRegistry, PageStatus, SitemapGroup};
use crate::url::NormalizedUrl;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Status description stored on pages whose fetch task died
const TASK_FAILURE: &str = "Fetch task failed";

/// Scheduler that crawls a group one batch at a time
///
/// Within a batch every fetch runs as its own tokio task. The batch is a join
/// barrier: no page of batch N+1 is requested before every page of batch N
/// has committed its findings.
pub struct CrawlScheduler {
    source: Arc<dyn PageSource>,
    batch_size: usize,
    inter_batch_delay: Duration,
}

impl CrawlScheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `source` - Fetches and analyzes pages
    /// * `batch_size` - Pages fetched concurrently per batch (at least 1)
    /// * `inter_batch_delay` - Pause between consecutive batches
    pub fn new(source: Arc<dyn PageSource>, batch_size: usize, inter_batch_delay: Duration) -> Self {
        Self {
            source,
            batch_size: batch_size.max(1),
            inter_batch_delay,
        }
    }

    /// Creates a scheduler using the crawler section of the configuration
    pub fn from_config(source: Arc<dyn PageSource>, config: &CrawlerConfig) -> Self {
        Self::new(
            source,
            config.batch_size as usize,
            config.inter_batch_delay(),
        )
    }

    /// Crawls every page of a group, updating its registry in place
    ///
    /// On return no record of the group is still pending.
    pub async fn crawl_group(&self, group: &SitemapGroup) {
        let targets: Vec<(NormalizedUrl, String)> = group
            .pages
            .entries()
            .map(|(url, location)| (url.clone(), location.to_string()))
            .collect();
        if targets.is_empty() {
            tracing::info!("Group {} has no pages, nothing to crawl", group.name);
            return;
        }

        let batch_count = targets.len().div_ceil(self.batch_size);
        let start_time = Instant::now();

        tracing::info!(
            "Crawling group {}: {} pages in {} batches",
            group.name,
            targets.len(),
            batch_count
        );

        for (batch_index, batch) in targets.chunks(self.batch_size).enumerate() {
            self.run_batch(&group.pages, batch).await;

            tracing::info!(
                "Progress [{}]: batch {}/{} done, {} of {} pages crawled",
                group.name,
                batch_index + 1,
                batch_count,
                batch_index * self.batch_size + batch.len(),
                targets.len()
            );

            let is_last = batch_index + 1 == batch_count;
            if !is_last && !self.inter_batch_delay.is_zero() {
                tokio::time::sleep(self.inter_batch_delay).await;
            }
        }

        tracing::info!(
            "Finished group {} in {:.2}s",
            group.name,
            start_time.elapsed().as_secs_f64()
        );
    }

    /// Fetches one batch concurrently and waits for all of it
    ///
    /// Each entry pairs a registry key with the location to request.
    async fn run_batch(&self, registry: &Arc<PageRegistry>, batch: &[(NormalizedUrl, String)]) {
        let mut tasks = JoinSet::new();

        for (url, location) in batch {
            let source = Arc::clone(&self.source);
            let registry = Arc::clone(registry);
            let url = url.clone();
            let location = location.clone();

            tasks.spawn(async move {
                tracing::debug!("Fetching {}", location);
                let findings = source.fetch(&url, &location).await;
                commit_findings(&registry, &findings);
            });
        }

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                tracing::warn!("Fetch task failed: {}", e);
            }
        }

        // A task that died before committing leaves its page pending
        for (url, _) in batch {
            let still_pending = registry
                .get(url.as_str())
                .is_some_and(|record| record.status == PageStatus::Pending);

            if still_pending {
                tracing::warn!("Marking {} as failed, its fetch task did not finish", url);
                registry.complete(&PageFindings::network_failure(
                    url.clone(),
                    TASK_FAILURE.to_string(),
                ));
            }
        }
    }
}

/// Merges one page's findings into the registry
///
/// Writes the page's own fields first, then credits every internal link
/// target that is part of the registry. Targets outside the registry are
/// dropped.
///
/// # Returns
///
/// The number of references credited
pub fn commit_findings(registry: &PageRegistry, findings: &PageFindings) -> usize {
    if !registry.complete(findings) {
        tracing::warn!("Ignoring duplicate or unknown result for {}", findings.url);
        return 0;
    }

    tracing::debug!(
        "{} -> {} ({} internal, {} external links)",
        findings.url,
        findings.status_code,
        findings.internal_link_count(),
        findings.external_link_count()
    );

    let mut credited = 0;
    for target in findings.internal_links() {
        if registry.record_reference(target.as_str(), &findings.url) {
            credited += 1;
        } else {
            tracing::trace!("Dangling link from {} to {}", findings.url, target);
        }
    }

    credited
}

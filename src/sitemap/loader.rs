//! Sitemap loader
//!
//! Turns a sitemap index into ordered, seeded [`SitemapGroup`]s:
//! - the index itself must load, or the run is aborted
//! - each child sitemap loads independently and is skipped on failure
//! - page URLs are filtered by origin and reserved segments
//! - each page is keyed by its normalized URL but fetched where declared
//! - groups are ordered by the sitemap's filename stem

use crate::sitemap::parser::{parse_sitemap, SitemapDocument};
use crate::state::{PageRegistry, SitemapGroup};
use crate::url::{normalize_url, UrlFilter};
use crate::{SitemapError, SitemapResult};
use reqwest::Client;
use url::Url;

/// Loads sitemap groups over HTTP
pub struct SitemapLoader {
    client: Client,
    excluded_segments: Vec<String>,
}

impl SitemapLoader {
    /// Creates a loader
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client shared with the page fetcher
    /// * `excluded_segments` - Path segments marking asset URLs
    pub fn new(client: Client, excluded_segments: Vec<String>) -> Self {
        Self {
            client,
            excluded_segments,
        }
    }

    /// Loads every group declared by the sitemap index
    ///
    /// A `<urlset>` served at `index_url` is accepted as a single group.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SitemapGroup>)` - Groups sorted by short name, all records pending
    /// * `Err(SitemapError)` - The index could not be fetched or parsed
    pub async fn load_groups(&self, index_url: &Url) -> SitemapResult<Vec<SitemapGroup>> {
        let filter = UrlFilter::new(index_url, &self.excluded_segments);

        tracing::info!("Loading sitemap index: {}", index_url);
        let document = self.fetch_document(index_url.as_str()).await?;

        let mut groups = match document {
            SitemapDocument::UrlSet(locs) => {
                tracing::info!("{} is a plain sitemap, using it as the only group", index_url);
                vec![self.build_group(index_url.as_str(), &locs, &filter)]
            }
            SitemapDocument::Index(children) => {
                tracing::info!("Sitemap index lists {} child sitemaps", children.len());
                self.load_children(&children, &filter).await
            }
        };

        groups.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::info!(
            "Loaded {} groups with {} pages in total",
            groups.len(),
            groups.iter().map(SitemapGroup::len).sum::<usize>()
        );

        Ok(groups)
    }

    /// Loads child sitemaps one after another, skipping failures
    async fn load_children(&self, children: &[String], filter: &UrlFilter) -> Vec<SitemapGroup> {
        let mut groups = Vec::with_capacity(children.len());

        for child in children {
            let child_url = match Url::parse(child) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Skipping sitemap with invalid URL {}: {}", child, e);
                    continue;
                }
            };

            if !filter.is_same_origin(&child_url) {
                tracing::warn!("Skipping sitemap outside the crawl origin: {}", child_url);
                continue;
            }

            match self.fetch_document(child_url.as_str()).await {
                Ok(SitemapDocument::UrlSet(locs)) => {
                    let group = self.build_group(child_url.as_str(), &locs, filter);
                    tracing::debug!(
                        "Sitemap {} ({}) contributed {} pages",
                        group.name,
                        group.source_url,
                        group.len()
                    );
                    groups.push(group);
                }
                Ok(SitemapDocument::Index(_)) => {
                    tracing::warn!("Skipping nested sitemap index: {}", child_url);
                }
                Err(e) => {
                    tracing::warn!("Skipping sitemap: {}", e);
                }
            }
        }

        groups
    }

    /// Fetches and parses one sitemap document
    async fn fetch_document(&self, url: &str) -> SitemapResult<SitemapDocument> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| SitemapError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SitemapError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| SitemapError::Request {
                url: url.to_string(),
                source,
            })?;

        parse_sitemap(&body).map_err(|source| SitemapError::Parse {
            url: url.to_string(),
            source,
        })
    }

    /// Seeds a registry from a sitemap's `<loc>` values
    fn build_group(&self, source_url: &str, locs: &[String], filter: &UrlFilter) -> SitemapGroup {
        let mut registry = PageRegistry::new();

        for loc in locs {
            let url = match Url::parse(loc) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Ignoring invalid sitemap URL {}: {}", loc, e);
                    continue;
                }
            };

            if !filter.is_same_origin(&url) {
                tracing::debug!("Ignoring sitemap URL outside the crawl origin: {}", url);
                continue;
            }

            if filter.is_excluded(&url) {
                tracing::trace!("Ignoring asset URL: {}", url);
                continue;
            }

            if !registry.insert_declared(normalize_url(url.as_str()), loc.clone()) {
                tracing::trace!("Duplicate sitemap URL: {}", url);
            }
        }

        SitemapGroup::new(source_url, short_name(source_url), registry)
    }
}

/// Returns the filename stem of a sitemap URL
///
/// # Examples
///
/// ```
/// use sitemap_usage::sitemap::short_name;
///
/// assert_eq!(short_name("https://example.com/page-sitemap.xml"), "page-sitemap");
/// assert_eq!(short_name("https://example.com/sitemaps/posts.xml.gz"), "posts");
/// ```
pub fn short_name(sitemap_url: &str) -> String {
    let without_query = sitemap_url
        .split(['?', '#'])
        .next()
        .unwrap_or(sitemap_url);

    let filename = without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(without_query);

    let filename = filename.strip_suffix(".gz").unwrap_or(filename);

    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => filename.to_string(),
    }
}

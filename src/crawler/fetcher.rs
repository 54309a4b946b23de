//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Error classification into page findings

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::parser::parse_html;
use crate::state::{PageFindings, PageStatus, ResponseCode};
use crate::url::{NormalizedUrl, UrlFilter};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed for a single page
const MAX_REDIRECTS: usize = 10;

/// Anything that can turn a page URL into findings
///
/// The scheduler only depends on this trait, so a crawl can be driven by
/// something other than live HTTP.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches and analyzes one page
    ///
    /// `location` is the URL to request, as its sitemap declared it. The
    /// findings are keyed by `url`. Never fails: transport and HTTP errors
    /// are reported as [`PageStatus::Error`] findings.
    async fn fetch(&self, url: &NormalizedUrl, location: &str) -> PageFindings;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - Supplies the per-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sitemap_usage::config::{CrawlerConfig, UserAgentConfig};
/// use sitemap_usage::crawler::build_http_client;
///
/// let user_agent = UserAgentConfig {
///     crawler_name: "SitemapUsage".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
/// let crawler = CrawlerConfig {
///     batch_size: 5,
///     inter_batch_delay: 200,
///     request_timeout: 30_000,
/// };
///
/// let client = build_http_client(&user_agent, &crawler).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(crawler.request_timeout())
        .connect_timeout(crawler.request_timeout().min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over HTTP and analyzes HTML responses
pub struct HttpFetcher {
    client: Client,
    filter: UrlFilter,
}

impl HttpFetcher {
    /// Creates a fetcher
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client to use
    /// * `filter` - Classifies links as internal or external
    pub fn new(client: Client, filter: UrlFilter) -> Self {
        Self { client, filter }
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    /// Fetches a page and reports what it found
    ///
    /// # Request Flow
    ///
    /// 1. Send GET request to the declared location, following up to 10 redirects
    /// 2. Non-2xx status → Error with the HTTP code
    /// 3. Non-HTML Content-Type → Ok with empty metadata
    /// 4. Otherwise parse the body against the final URL
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Timeout | Error, "Request timeout" |
    /// | Connection failure | Error, "Connection refused" |
    /// | Redirect chain > 10 | Error, "Too many redirects" |
    /// | HTTP 4xx/5xx | Error, status code |
    /// | HTTP 2xx | Ok, status code |
    async fn fetch(&self, url: &NormalizedUrl, location: &str) -> PageFindings {
        let response = match self.client.get(location).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Request for {} failed: {}", url, e);
                return PageFindings::network_failure(url.clone(), describe_error(&e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} returned HTTP {}", url, status.as_u16());
            return PageFindings::http_error(url.clone(), status.as_u16());
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase);

        if let Some(content_type) = &content_type {
            if !is_html(content_type) {
                tracing::debug!("{} is not HTML ({}), skipping analysis", url, content_type);
                return PageFindings::ok_without_content(url.clone(), status.as_u16());
            }
        }

        let final_url: Url = response.url().clone();

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Reading body of {} failed: {}", url, e);
                return PageFindings::network_failure(url.clone(), describe_error(&e));
            }
        };

        if final_url.as_str() != location {
            tracing::trace!("{} resolved to {}", location, final_url);
        }

        let parsed = parse_html(&body, &final_url, &self.filter);

        PageFindings {
            url: url.clone(),
            status: PageStatus::Ok,
            status_code: ResponseCode::Http(status.as_u16()),
            title: parsed.title,
            meta_description: parsed.meta_description,
            canonical: parsed.canonical,
            word_count: parsed.word_count,
            links: parsed.links,
        }
    }
}

fn is_html(content_type: &str) -> bool {
    content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
}

/// Turns a transport error into the description stored on the page
fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_redirect() {
        "Too many redirects".to_string()
    } else if error.is_connect() {
        "Connection refused".to_string()
    } else {
        error.to_string()
    }
}

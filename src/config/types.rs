use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Sitemap-Usage
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub sitemap: SitemapConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler pacing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of pages fetched concurrently per batch
    #[serde(rename = "batch-size")]
    pub batch_size: u32,

    /// Pause between two batches of the same group (milliseconds)
    #[serde(rename = "inter-batch-delay")]
    pub inter_batch_delay: u64,

    /// Per-request timeout (milliseconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl CrawlerConfig {
    pub fn inter_batch_delay(&self) -> Duration {
        Duration::from_millis(self.inter_batch_delay)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout)
    }
}

/// Sitemap source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SitemapConfig {
    /// URL of the sitemap index; its origin is the crawl origin
    #[serde(rename = "index-url")]
    pub index_url: String,

    /// Path segments marking asset URLs that are never crawled
    #[serde(rename = "excluded-segments", default = "default_excluded_segments")]
    pub excluded_segments: Vec<String>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the user agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the markdown summary file
    #[serde(rename = "summary-path")]
    pub summary_path: String,

    /// Optional path for a JSON export of the full report
    #[serde(rename = "json-path", default)]
    pub json_path: Option<String>,
}

fn default_request_timeout() -> u64 {
    30_000
}

fn default_excluded_segments() -> Vec<String> {
    vec!["wp-content".to_string()]
}

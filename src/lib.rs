//! Sitemap-Usage: a sitemap link-usage auditor
//!
//! This crate loads a site's sitemap index, crawls every declared page in
//! paced batches, and builds a link-usage graph that tells which sitemap pages
//! are orphaned, broken, or under-linked.

pub mod config;
pub mod crawler;
pub mod output;
pub mod sitemap;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sitemap-Usage operations
///
/// Only run-level failures surface here. Page-level failures are recorded on
/// the page's [`state::PageRecord`] instead.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Sitemap loading errors
///
/// Fatal when raised for the sitemap index, skipped with a warning when
/// raised for a child sitemap.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Request for {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("Sitemap {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to parse sitemap {url}: {source}")]
    Parse {
        url: String,
        source: SitemapParseError,
    },
}

/// Why a sitemap body could not be read as a sitemap
#[derive(Debug, Error)]
pub enum SitemapParseError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unexpected sitemap structure: {0}")]
    Structure(#[from] quick_xml::DeError),

    #[error("unexpected root element <{0}>")]
    UnexpectedRoot(String),

    #[error("document has no root element")]
    NoRoot,
}

/// Result type alias for Sitemap-Usage operations
pub type Result<T> = std::result::Result<T, UsageError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for sitemap document parsing
pub type SitemapParseResult<T> = std::result::Result<T, SitemapParseError>;

/// Result type alias for sitemap operations
pub type SitemapResult<T> = std::result::Result<T, SitemapError>;

// Re-export commonly used types
pub use config::Config;
pub use state::{PageRecord, PageRegistry, PageStatus, ResponseCode, SitemapGroup};
pub use crate::url::{normalize_url, NormalizedUrl, UrlFilter};

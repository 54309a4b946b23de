//! URL handling module for Sitemap-Usage
//!
//! This module provides URL identity normalization and the filter that decides
//! which URLs belong to a crawl (same origin, no reserved asset segments).

mod filter;
mod normalize;

// Re-export main types
pub use filter::UrlFilter;
pub use normalize::{normalize_url, NormalizedUrl};

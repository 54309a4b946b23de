//! Sitemap module for discovering the pages to crawl
//!
//! This module handles:
//! - Fetching the sitemap index and its child sitemaps
//! - Parsing `<sitemapindex>` and `<urlset>` documents
//! - Seeding one pending registry per child sitemap

mod loader;
mod parser;

pub use loader::{short_name, SitemapLoader};
pub use parser::{parse_sitemap, SitemapDocument};

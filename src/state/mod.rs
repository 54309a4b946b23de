//! State module for the link-usage graph
//!
//! This module holds the data the crawl produces and the reporting layer
//! consumes.
//!
//! # Components
//!
//! - `PageRecord`: crawl result and usage counters of one sitemap URL
//! - `PageFindings`: what a single fetch learned, before it is committed
//! - `PageRegistry`: per-group records with per-record locking
//! - `SitemapGroup`: one child sitemap and its registry

mod findings;
mod group;
mod page_record;
mod registry;

// Re-export main types
pub use findings::{LinkKind, OutboundLink, PageFindings};
pub use group::SitemapGroup;
pub use page_record::{PageRecord, PageStatus, ResponseCode};
pub use registry::PageRegistry;

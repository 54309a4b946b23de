use crate::state::{PageRecord, PageRegistry};
use serde::Serialize;
use std::sync::Arc;

/// The pages declared by one child sitemap
///
/// Groups never share records: a URL listed by two sitemaps has an
/// independent record in each group.
#[derive(Debug, Clone, Serialize)]
pub struct SitemapGroup {
    /// URL of the child sitemap
    pub source_url: String,

    /// Filename stem of the sitemap, used for ordering and display
    pub name: String,

    /// The group's link-usage graph
    pub pages: Arc<PageRegistry>,
}

impl SitemapGroup {
    /// Creates a group around a seeded registry
    pub fn new(source_url: impl Into<String>, name: impl Into<String>, pages: PageRegistry) -> Self {
        Self {
            source_url: source_url.into(),
            name: name.into(),
            pages: Arc::new(pages),
        }
    }

    /// Returns copies of all records in sitemap order
    pub fn records(&self) -> Vec<PageRecord> {
        self.pages.snapshot()
    }

    /// Returns the number of pages in the group
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns whether the group has no pages
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

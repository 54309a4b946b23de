//! Page record definitions for the link-usage graph
//!
//! A `PageRecord` is created at `Pending` when its URL is read from a sitemap,
//! receives its own crawl result exactly once, and collects usage credit from
//! other pages of the same group any number of times.

use crate::state::PageFindings;
use crate::url::NormalizedUrl;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Crawl status of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    /// Declared in a sitemap, not fetched yet
    Pending,

    /// Fetched with a 2xx response
    Ok,

    /// Network failure, timeout or non-2xx response
    Error,
}

impl PageStatus {
    /// Returns true if the page has received its crawl result
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns the lowercase string form used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the server (or the network) answered for a page
///
/// Serialized untagged: a number for HTTP responses, a string for failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseCode {
    /// An HTTP status code
    Http(u16),

    /// A description of a request that never produced a response
    Failure(String),
}

impl ResponseCode {
    /// Returns the HTTP status, if there was a response
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Http(code) => Some(*code),
            Self::Failure(_) => None,
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(code) => write!(f, "{}", code),
            Self::Failure(description) => f.write_str(description),
        }
    }
}

/// Crawl result and usage counters for one sitemap URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRecord {
    /// Normalized URL, the record's identity
    pub url: NormalizedUrl,

    pub status: PageStatus,

    /// `None` while the page is pending
    pub status_code: Option<ResponseCode>,

    pub title: String,
    pub meta_description: String,
    pub canonical: String,

    /// Whitespace-delimited tokens of visible body text
    pub word_count: u64,

    /// Same-origin anchors on this page, including dangling ones
    pub internal_link_count: u64,

    pub external_link_count: u64,

    /// Total references from other sitemap pages of the same group
    ///
    /// Always equal to the sum of `used_by_pages` values.
    pub used_count: u64,

    /// Referrer URL to number of anchors pointing here
    ///
    /// Ordered by referrer URL, not by when the reference was found. Batches
    /// finish in arbitrary order, so URL order is the only stable one.
    pub used_by_pages: BTreeMap<NormalizedUrl, u64>,
}

impl PageRecord {
    /// Creates a pending record with empty fields and zero counters
    pub fn pending(url: NormalizedUrl) -> Self {
        Self {
            url,
            status: PageStatus::Pending,
            status_code: None,
            title: String::new(),
            meta_description: String::new(),
            canonical: String::new(),
            word_count: 0,
            internal_link_count: 0,
            external_link_count: 0,
            used_count: 0,
            used_by_pages: BTreeMap::new(),
        }
    }

    /// Writes the page's own crawl result
    ///
    /// Only the first call has an effect; a record leaves `Pending` once.
    /// Usage counters are not touched.
    ///
    /// # Returns
    ///
    /// * `true` - The findings were applied
    /// * `false` - The record already had a terminal status
    pub fn apply_findings(&mut self, findings: &PageFindings) -> bool {
        if self.status.is_terminal() {
            return false;
        }

        self.status = findings.status;
        self.status_code = Some(findings.status_code.clone());
        self.title = findings.title.clone();
        self.meta_description = findings.meta_description.clone();
        self.canonical = findings.canonical.clone();
        self.word_count = findings.word_count;
        self.internal_link_count = findings.internal_link_count();
        self.external_link_count = findings.external_link_count();

        true
    }

    /// Credits one reference from `referrer`
    ///
    /// Both counters move together so the usage invariant holds after every
    /// call.
    pub fn record_reference(&mut self, referrer: &NormalizedUrl) {
        self.used_count += 1;
        *self.used_by_pages.entry(referrer.clone()).or_insert(0) += 1;
    }

    /// Returns true if `used_count` matches the per-referrer counts
    pub fn is_consistent(&self) -> bool {
        self.used_count == self.used_by_pages.values().sum::<u64>()
    }

    /// Returns true if no other sitemap page links here
    pub fn is_orphaned(&self) -> bool {
        self.used_count == 0
    }
}

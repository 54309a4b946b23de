//! The per-group link-usage graph
//!
//! The key set is fixed once seeding ends, so a registry can be shared behind
//! an `Arc` by every fetch task of a batch. Each record sits behind its own
//! mutex: a page's own fields and its usage counters are only ever touched
//! while that record's lock is held.

use crate::state::{PageFindings, PageRecord, PageStatus};
use crate::url::NormalizedUrl;
use parking_lot::Mutex;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::collections::HashMap;

/// Ordered mapping from normalized URL to [`PageRecord`]
///
/// Iteration order is insertion order, which is sitemap order. Alongside each
/// key the registry keeps the location the sitemap declared, which is the URL
/// actually requested. The key is only used for lookups.
#[derive(Debug, Default)]
pub struct PageRegistry {
    /// Keys in insertion order
    keys: Vec<NormalizedUrl>,

    /// Declared location for each key, same order as `keys`
    locations: Vec<String>,

    /// Key to position in `records`
    index: HashMap<NormalizedUrl, usize>,

    records: Vec<Mutex<PageRecord>>,
}

impl PageRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pending record for `url`, fetched at the key itself
    pub fn insert(&mut self, url: NormalizedUrl) -> bool {
        let location = url.as_str().to_string();
        self.insert_declared(url, location)
    }

    /// Registers a pending record for `url` that is fetched at `location`
    ///
    /// The first declaration of a key wins; later duplicates keep neither
    /// their record nor their location.
    ///
    /// # Arguments
    ///
    /// * `url` - Normalized registry key
    /// * `location` - The URL as the sitemap wrote it
    ///
    /// # Returns
    ///
    /// * `true` - A new record was created
    /// * `false` - The URL was already registered
    pub fn insert_declared(&mut self, url: NormalizedUrl, location: String) -> bool {
        if self.index.contains_key(&url) {
            return false;
        }

        self.index.insert(url.clone(), self.records.len());
        self.records.push(Mutex::new(PageRecord::pending(url.clone())));
        self.keys.push(url);
        self.locations.push(location);
        true
    }

    /// Returns the number of registered pages
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the registry has no pages
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns true if `url` (already normalized) is a registered key
    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    /// Returns the registered keys in sitemap order
    pub fn urls(&self) -> &[NormalizedUrl] {
        &self.keys
    }

    /// Returns the declared location registered for `url`
    pub fn location(&self, url: &str) -> Option<&str> {
        self.index
            .get(url)
            .map(|&position| self.locations[position].as_str())
    }

    /// Returns (key, declared location) pairs in sitemap order
    pub fn entries(&self) -> impl Iterator<Item = (&NormalizedUrl, &str)> {
        self.keys
            .iter()
            .zip(self.locations.iter().map(String::as_str))
    }

    /// Returns a copy of the record for `url`
    pub fn get(&self, url: &str) -> Option<PageRecord> {
        self.index
            .get(url)
            .map(|&position| self.records[position].lock().clone())
    }

    /// Returns copies of all records in sitemap order
    pub fn snapshot(&self) -> Vec<PageRecord> {
        self.records.iter().map(|record| record.lock().clone()).collect()
    }

    /// Returns the number of records still waiting for their own fetch
    pub fn pending_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.lock().status == PageStatus::Pending)
            .count()
    }

    /// Writes a page's own crawl result into its record
    ///
    /// # Returns
    ///
    /// * `true` - The record existed and was still pending
    /// * `false` - Unknown URL, or the record already had its result
    pub fn complete(&self, findings: &PageFindings) -> bool {
        match self.index.get(&findings.url) {
            Some(&position) => self.records[position].lock().apply_findings(findings),
            None => false,
        }
    }

    /// Credits one reference from `referrer` to `target`
    ///
    /// The read-modify-write happens under the target record's lock, so
    /// concurrent referrers never lose an update.
    ///
    /// # Returns
    ///
    /// * `true` - The target is registered and was credited
    /// * `false` - The target is not part of this registry (dangling link)
    pub fn record_reference(&self, target: &str, referrer: &NormalizedUrl) -> bool {
        match self.index.get(target) {
            Some(&position) => {
                self.records[position].lock().record_reference(referrer);
                true
            }
            None => false,
        }
    }
}

impl FromIterator<NormalizedUrl> for PageRegistry {
    fn from_iter<I: IntoIterator<Item = NormalizedUrl>>(iter: I) -> Self {
        let mut registry = Self::new();
        for url in iter {
            registry.insert(url);
        }
        registry
    }
}

impl Serialize for PageRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.records.len()))?;
        for record in &self.records {
            seq.serialize_element(&*record.lock())?;
        }
        seq.end()
    }
}

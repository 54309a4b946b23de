//! Sitemap XML parsing
//!
//! Both sitemap formats are read with quick-xml's serde deserializer. The root
//! element decides which format applies: `<sitemapindex>` lists child
//! sitemaps, `<urlset>` lists pages.

use crate::{SitemapParseError, SitemapParseResult};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<sitemapindex>`: URLs of child sitemaps, in document order
    Index(Vec<String>),

    /// `<urlset>`: page URLs, in document order
    UrlSet(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct SitemapIndexXml {
    #[serde(rename = "sitemap", default)]
    sitemaps: Vec<LocXml>,
}

#[derive(Debug, Deserialize)]
struct UrlSetXml {
    #[serde(rename = "url", default)]
    urls: Vec<LocXml>,
}

#[derive(Debug, Deserialize)]
struct LocXml {
    #[serde(default)]
    loc: String,
}

/// Parses a sitemap or sitemap index
///
/// Entries without a `<loc>` (or with an empty one) are dropped; every other
/// `<loc>` value is returned trimmed.
///
/// # Arguments
///
/// * `xml` - The document body
///
/// # Returns
///
/// * `Ok(SitemapDocument)` - The document's entries
/// * `Err(SitemapParseError)` - Malformed XML or an unknown root element
///
/// # Example
///
/// ```
/// use sitemap_usage::sitemap::{parse_sitemap, SitemapDocument};
///
/// let xml = r#"<urlset><url><loc> https://example.com/a </loc></url></urlset>"#;
/// assert_eq!(
///     parse_sitemap(xml).unwrap(),
///     SitemapDocument::UrlSet(vec!["https://example.com/a".to_string()])
/// );
/// ```
pub fn parse_sitemap(xml: &str) -> SitemapParseResult<SitemapDocument> {
    let root = root_element(xml)?;
    match root.as_str() {
        "sitemapindex" => {
            let index: SitemapIndexXml = quick_xml::de::from_str(xml)?;
            Ok(SitemapDocument::Index(collect_locs(index.sitemaps)))
        }
        "urlset" => {
            let urlset: UrlSetXml = quick_xml::de::from_str(xml)?;
            Ok(SitemapDocument::UrlSet(collect_locs(urlset.urls)))
        }
        _ => Err(SitemapParseError::UnexpectedRoot(root)),
    }
}

/// Returns the local name of the first element in the document
fn root_element(xml: &str) -> SitemapParseResult<String> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Ok(String::from_utf8_lossy(e.local_name().as_ref()).to_string());
            }
            Ok(Event::Eof) => return Err(SitemapParseError::NoRoot),
            Err(e) => return Err(e.into()),
            Ok(_) => {}
        }
    }
}

fn collect_locs(entries: Vec<LocXml>) -> Vec<String> {
    entries
        .into_iter()
        .map(|entry| entry.loc.trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect()
}

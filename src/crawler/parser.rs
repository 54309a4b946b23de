//! HTML parser for page analysis
//!
//! This module handles parsing HTML content to extract:
//! - Outbound anchor targets
//! - Page title, meta description and canonical URL
//! - Visible word count

use crate::state::{LinkKind, OutboundLink};
use crate::url::{normalize_url, UrlFilter};
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

/// Elements whose text is never rendered
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that do not break a word when text runs across them
const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "cite", "code", "data", "dfn", "em", "i", "kbd", "mark", "q",
    "s", "samp", "small", "span", "strong", "sub", "sup", "time", "u", "var",
];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPage {
    /// The page title (from <title> tag), empty if absent
    pub title: String,

    /// `<meta name="description">` content, empty if absent
    pub meta_description: String,

    /// Absolute `<link rel="canonical">` target, empty if absent
    pub canonical: String,

    /// Whitespace-delimited tokens of visible body text
    pub word_count: u64,

    /// Anchor targets in document order, normalized and classified
    pub links: Vec<OutboundLink>,
}

/// Parses HTML content and extracts links and metadata
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document (duplicates are kept)
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links (same page anchors)
///
/// Relative links resolve against `<base href>` when present, else against
/// `page_url`. A link is internal when `filter` reports the same origin.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - The URL the content was served from
/// * `filter` - The crawl filter holding the root origin
///
/// # Example
///
/// ```
/// use sitemap_usage::crawler::parse_html;
/// use sitemap_usage::url::UrlFilter;
/// use url::Url;
///
/// let page = Url::parse("https://example.com/").unwrap();
/// let filter = UrlFilter::new(&page, &[]);
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page/">Link</a></body></html>"#;
/// let parsed = parse_html(html, &page, &filter);
/// assert_eq!(parsed.title, "Test");
/// assert_eq!(parsed.links[0].target.as_str(), "https://example.com/page");
/// ```
pub fn parse_html(html: &str, page_url: &Url, filter: &UrlFilter) -> ParsedPage {
    let document = Html::parse_document(html);
    let base_url = extract_base_url(&document, page_url);

    ParsedPage {
        title: extract_title(&document),
        meta_description: extract_meta_description(&document),
        canonical: extract_canonical(&document, &base_url),
        word_count: count_visible_words(&document),
        links: extract_links(&document, &base_url, filter),
    }
}

/// Returns the effective base URL for resolving relative links
fn extract_base_url(document: &Html, page_url: &Url) -> Url {
    let Ok(selector) = Selector::parse("base[href]") else {
        return page_url.clone();
    };

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .unwrap_or_else(|| page_url.clone())
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .unwrap_or_default()
}

/// Extracts `<meta name="description">`, matching the name case-insensitively
fn extract_meta_description(document: &Html) -> String {
    let Ok(selector) = Selector::parse("meta[name][content]") else {
        return String::new();
    };

    document
        .select(&selector)
        .find(|element| {
            element
                .value()
                .attr("name")
                .is_some_and(|name| name.trim().eq_ignore_ascii_case("description"))
        })
        .and_then(|element| element.value().attr("content"))
        .map(collapse_whitespace)
        .unwrap_or_default()
}

/// Extracts the canonical URL as an absolute string
fn extract_canonical(document: &Html, base_url: &Url) -> String {
    let Ok(selector) = Selector::parse("link[rel][href]") else {
        return String::new();
    };

    document
        .select(&selector)
        .find(|element| {
            element.value().attr("rel").is_some_and(|rel| {
                rel.split_ascii_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("canonical"))
            })
        })
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| base_url.join(href.trim()).ok())
        .map(|url| url.to_string())
        .unwrap_or_default()
}

/// Counts whitespace-delimited tokens in the visible text of `<body>`
///
/// Text nodes are joined before splitting, so `Hel<b>lo</b>` is one word.
/// Block-level elements still separate the words on either side of them.
fn count_visible_words(document: &Html) -> u64 {
    let Ok(selector) = Selector::parse("body") else {
        return 0;
    };

    let Some(body) = document.select(&selector).next() else {
        return 0;
    };

    let mut text = String::new();
    collect_visible_text(body, &mut text);
    text.split_whitespace().count() as u64
}

fn collect_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = child.value().name();
                if INVISIBLE_ELEMENTS.contains(&name) {
                    continue;
                }

                let inline = INLINE_ELEMENTS.contains(&name);
                if !inline {
                    out.push(' ');
                }
                collect_visible_text(child, out);
                if !inline {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

/// Extracts all valid anchor targets from the HTML document
fn extract_links(document: &Html, base_url: &Url, filter: &UrlFilter) -> Vec<OutboundLink> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut links = Vec::new();

    for element in document.select(&selector) {
        // Skip if it has the download attribute
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(target) = resolve_link(href, base_url) {
            let kind = if filter.is_same_origin(&target) {
                LinkKind::Internal
            } else {
                LinkKind::External
            };

            links.push(OutboundLink {
                target: normalize_url(target.as_str()),
                kind,
            });
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only hrefs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    // Skip empty hrefs
    if href.is_empty() {
        return None;
    }

    // Skip special schemes
    let lowercase = href.to_ascii_lowercase();
    if lowercase.starts_with("javascript:")
        || lowercase.starts_with("mailto:")
        || lowercase.starts_with("tel:")
        || lowercase.starts_with("data:")
    {
        return None;
    }

    // Skip fragment-only links (same page anchors)
    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => Some(absolute_url),
        _ => None,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

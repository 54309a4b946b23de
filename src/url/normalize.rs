use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;

/// A URL reduced to its identity form
///
/// Two URLs that differ only by a fragment or by a trailing slash produce the
/// same `NormalizedUrl`. This is the key type for every registry lookup, so
/// the only way to build one is through [`normalize_url`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NormalizedUrl(String);

impl NormalizedUrl {
    /// Returns the normalized URL as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NormalizedUrl {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Normalizes a URL string for identity comparison
///
/// # Normalization Steps
///
/// 1. Remove the fragment (everything from the first `#`)
/// 2. Remove the trailing slash (a run of trailing slashes counts as one)
///
/// The query string is left untouched and no parsing takes place, so this
/// never fails. Callers that resolve links through [`url::Url`] should pass
/// the serialized form so both sides of a comparison went through the same
/// serializer.
///
/// # Examples
///
/// ```
/// use sitemap_usage::url::normalize_url;
///
/// let a = normalize_url("https://example.com/page/");
/// let b = normalize_url("https://example.com/page#section");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(raw: &str) -> NormalizedUrl {
    let without_fragment = match raw.find('#') {
        Some(index) => &raw[..index],
        None => raw,
    };

    NormalizedUrl(without_fragment.trim_end_matches('/').to_string())
}

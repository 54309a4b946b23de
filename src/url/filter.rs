use url::{Origin, Url};

/// Decides which URLs belong to the crawl
///
/// The filter is built from the sitemap index URL. A URL is accepted when it
/// shares the index's origin (scheme, host and port) and none of its path
/// segments is a reserved asset segment such as `wp-content`.
#[derive(Debug, Clone)]
pub struct UrlFilter {
    origin: Origin,
    excluded_segments: Vec<String>,
}

impl UrlFilter {
    /// Creates a filter rooted at the origin of `root`
    ///
    /// # Arguments
    ///
    /// * `root` - The crawl root, normally the sitemap index URL
    /// * `excluded_segments` - Path segments that mark asset URLs
    pub fn new(root: &Url, excluded_segments: &[String]) -> Self {
        Self {
            origin: root.origin(),
            excluded_segments: excluded_segments.to_vec(),
        }
    }

    /// Returns true if the URL has the same origin as the crawl root
    ///
    /// # Examples
    ///
    /// ```
    /// use sitemap_usage::url::UrlFilter;
    /// use url::Url;
    ///
    /// let root = Url::parse("https://example.com/sitemap.xml").unwrap();
    /// let filter = UrlFilter::new(&root, &[]);
    ///
    /// assert!(filter.is_same_origin(&Url::parse("https://example.com/about").unwrap()));
    /// assert!(!filter.is_same_origin(&Url::parse("https://blog.example.com/").unwrap()));
    /// assert!(!filter.is_same_origin(&Url::parse("http://example.com/").unwrap()));
    /// ```
    pub fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.origin
    }

    /// Returns true if any path segment of the URL is reserved
    pub fn is_excluded(&self, url: &Url) -> bool {
        let Some(segments) = url.path_segments() else {
            return false;
        };

        segments
            .into_iter()
            .any(|segment| self.excluded_segments.iter().any(|reserved| reserved == segment))
    }

    /// Returns true if the URL may be registered as a crawl target
    pub fn accepts(&self, url: &Url) -> bool {
        self.is_same_origin(url) && !self.is_excluded(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_filter() -> UrlFilter {
        let root = Url::parse("https://example.com/sitemap_index.xml").unwrap();
        UrlFilter::new(&root, &["wp-content".to_string(), "uploads".to_string()])
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_same_origin() {
        let filter = create_filter();
        assert!(filter.is_same_origin(&url("https://example.com/")));
        assert!(filter.is_same_origin(&url("https://EXAMPLE.com/page")));
        assert!(filter.is_same_origin(&url("https://example.com:443/page")));
    }

    #[test]
    fn test_different_origin() {
        let filter = create_filter();
        assert!(!filter.is_same_origin(&url("https://other.com/")));
        assert!(!filter.is_same_origin(&url("https://www.example.com/")));
        assert!(!filter.is_same_origin(&url("https://example.com:8443/")));
        assert!(!filter.is_same_origin(&url("http://example.com/")));
    }

    #[test]
    fn test_excluded_segment() {
        let filter = create_filter();
        assert!(filter.is_excluded(&url("https://example.com/wp-content/uploads/a.png")));
        assert!(filter.is_excluded(&url("https://example.com/media/uploads/")));
    }

    #[test]
    fn test_segment_must_match_whole() {
        let filter = create_filter();
        assert!(!filter.is_excluded(&url("https://example.com/wp-content-guide")));
        assert!(!filter.is_excluded(&url("https://example.com/blog?path=wp-content")));
    }

    #[test]
    fn test_accepts() {
        let filter = create_filter();
        assert!(filter.accepts(&url("https://example.com/about")));
        assert!(!filter.accepts(&url("https://example.com/wp-content/a.pdf")));
        assert!(!filter.accepts(&url("https://other.com/about")));
    }

    #[test]
    fn test_no_excluded_segments() {
        let root = url("https://example.com/");
        let filter = UrlFilter::new(&root, &[]);
        assert!(filter.accepts(&url("https://example.com/wp-content/a.png")));
    }
}

use crate::state::{PageStatus, ResponseCode};
use crate::url::NormalizedUrl;

/// Whether a link stays on the crawl origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Same origin as the sitemap index
    Internal,
    /// Any other origin
    External,
}

/// An anchor target found on a fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundLink {
    /// The resolved, normalized target URL
    pub target: NormalizedUrl,

    pub kind: LinkKind,
}

/// Everything one fetch learned about one page
///
/// Produced by the fetcher without touching shared state; the scheduler
/// commits it into the group's registry.
#[derive(Debug, Clone, PartialEq)]
pub struct PageFindings {
    /// Registry key of the fetched page
    pub url: NormalizedUrl,

    pub status: PageStatus,
    pub status_code: ResponseCode,
    pub title: String,
    pub meta_description: String,
    pub canonical: String,
    pub word_count: u64,

    /// Every anchor in document order, duplicates included
    pub links: Vec<OutboundLink>,
}

impl PageFindings {
    /// Findings for a request that never produced a response
    pub fn network_failure(url: NormalizedUrl, description: String) -> Self {
        Self::error(url, ResponseCode::Failure(description))
    }

    /// Findings for a non-2xx response; the body is not analyzed
    pub fn http_error(url: NormalizedUrl, status_code: u16) -> Self {
        Self::error(url, ResponseCode::Http(status_code))
    }

    /// Findings for a 2xx response whose body was not analyzed
    pub fn ok_without_content(url: NormalizedUrl, status_code: u16) -> Self {
        Self {
            status: PageStatus::Ok,
            ..Self::error(url, ResponseCode::Http(status_code))
        }
    }

    fn error(url: NormalizedUrl, status_code: ResponseCode) -> Self {
        Self {
            url,
            status: PageStatus::Error,
            status_code,
            title: String::new(),
            meta_description: String::new(),
            canonical: String::new(),
            word_count: 0,
            links: Vec::new(),
        }
    }

    /// Iterates over same-origin link targets
    pub fn internal_links(&self) -> impl Iterator<Item = &NormalizedUrl> {
        self.links
            .iter()
            .filter(|link| link.kind == LinkKind::Internal)
            .map(|link| &link.target)
    }

    pub fn internal_link_count(&self) -> u64 {
        self.internal_links().count() as u64
    }

    pub fn external_link_count(&self) -> u64 {
        self.links
            .iter()
            .filter(|link| link.kind == LinkKind::External)
            .count() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::normalize_url;

    #[test]
    fn test_network_failure() {
        let findings = PageFindings::network_failure(
            normalize_url("https://example.com/a"),
            "Connection refused".to_string(),
        );
        assert_eq!(findings.status, PageStatus::Error);
        assert_eq!(
            findings.status_code,
            ResponseCode::Failure("Connection refused".to_string())
        );
        assert!(findings.links.is_empty());
        assert_eq!(findings.word_count, 0);
    }

    #[test]
    fn test_http_error() {
        let findings = PageFindings::http_error(normalize_url("https://example.com/d"), 404);
        assert_eq!(findings.status, PageStatus::Error);
        assert_eq!(findings.status_code, ResponseCode::Http(404));
    }

    #[test]
    fn test_ok_without_content() {
        let findings =
            PageFindings::ok_without_content(normalize_url("https://example.com/file"), 200);
        assert_eq!(findings.status, PageStatus::Ok);
        assert_eq!(findings.status_code, ResponseCode::Http(200));
        assert!(findings.title.is_empty());
    }

    #[test]
    fn test_link_counts() {
        let mut findings = PageFindings::ok_without_content(normalize_url("https://a.com/x"), 200);
        findings.links = vec![
            OutboundLink {
                target: normalize_url("https://a.com/y"),
                kind: LinkKind::Internal,
            },
            OutboundLink {
                target: normalize_url("https://a.com/y"),
                kind: LinkKind::Internal,
            },
            OutboundLink {
                target: normalize_url("https://b.com/"),
                kind: LinkKind::External,
            },
        ];

        assert_eq!(findings.internal_link_count(), 2);
        assert_eq!(findings.external_link_count(), 1);
        assert_eq!(findings.internal_links().count(), 2);
    }
}

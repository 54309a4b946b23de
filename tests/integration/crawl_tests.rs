//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end: sitemap index, child sitemaps, pages.

use sitemap_usage::config::{Config, CrawlerConfig, OutputConfig, SitemapConfig, UserAgentConfig};
use sitemap_usage::crawler::{crawl, Coordinator};
use sitemap_usage::output::{format_markdown_summary, CrawlStatistics};
use sitemap_usage::state::{PageStatus, ResponseCode, SitemapGroup};
use sitemap_usage::{SitemapError, UsageError};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the given sitemap index
fn create_test_config(index_url: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            batch_size: 2,
            inter_batch_delay: 10, // Very short for testing
            request_timeout: 1_000,
        },
        sitemap: SitemapConfig {
            index_url: index_url.to_string(),
            excluded_segments: vec!["wp-content".to_string()],
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            summary_path: "./test_summary.md".to_string(),
            json_path: None,
        },
    }
}

fn sitemap_index(base_url: &str, sitemaps: &[&str]) -> String {
    let entries: String = sitemaps
        .iter()
        .map(|name| format!("<sitemap><loc>{}/{}</loc></sitemap>", base_url, name))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        entries
    )
}

fn urlset(base_url: &str, paths: &[&str]) -> String {
    let entries: String = paths
        .iter()
        .map(|p| format!("<url><loc>{}{}</loc></url>", base_url, p))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

fn html_page(title: &str, hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><p>Some text</p>{}</body></html>",
        title, anchors
    )
}

async fn mount_xml(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/xml"),
        )
        .mount(server)
        .await;
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

fn group<'a>(groups: &'a [SitemapGroup], name: &str) -> &'a SitemapGroup {
    groups
        .iter()
        .find(|g| g.name == name)
        .unwrap_or_else(|| panic!("group {} missing", name))
}

#[tokio::test]
async fn test_usage_counts_end_to_end() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap_index.xml",
        sitemap_index(&base_url, &["page-sitemap.xml"]),
    )
    .await;
    mount_xml(
        &mock_server,
        "/page-sitemap.xml",
        urlset(
            &base_url,
            &["/a", "/b/", "/c", "/d", "/wp-content/uploads/logo.png"],
        ),
    )
    .await;

    mount_html(&mock_server, "/a", html_page("A", &["/b/", "/c", "https://other.com/x"])).await;
    mount_html(&mock_server, "/b/", html_page("B", &["/c#section", "/d"])).await;
    mount_html(&mock_server, "/c", html_page("C", &["/missing-page"])).await;
    mount_status(&mock_server, "/d", 404).await;

    let config = create_test_config(&format!("{}/sitemap_index.xml", base_url));
    let coordinator = Coordinator::new(&config).unwrap();
    let groups = coordinator.run().await.expect("Crawl failed");

    assert_eq!(groups.len(), 1);
    let pages = &group(&groups, "page-sitemap").pages;
    assert_eq!(pages.len(), 4, "asset URL must not be registered");

    let a = pages.get(&format!("{}/a", base_url)).unwrap();
    let b = pages.get(&format!("{}/b", base_url)).unwrap();
    let c = pages.get(&format!("{}/c", base_url)).unwrap();
    let d = pages.get(&format!("{}/d", base_url)).unwrap();

    assert_eq!(a.status, PageStatus::Ok);
    assert_eq!(a.title, "A");
    assert_eq!(a.internal_link_count, 2);
    assert_eq!(a.external_link_count, 1);
    assert_eq!(a.used_count, 0);

    assert_eq!(b.status, PageStatus::Ok);
    assert_eq!(b.used_count, 1);
    assert_eq!(b.used_by_pages.get(format!("{}/a", base_url).as_str()), Some(&1));

    assert_eq!(c.status, PageStatus::Ok);
    assert_eq!(c.used_count, 2);

    assert_eq!(d.status, PageStatus::Error);
    assert_eq!(d.status_code, Some(ResponseCode::Http(404)));
    assert_eq!(d.used_count, 1);

    for record in pages.snapshot() {
        assert_ne!(record.status, PageStatus::Pending);
        assert!(record.is_consistent());
    }
}

#[tokio::test]
async fn test_trailing_slash_pages_fetched_as_declared() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap_index.xml",
        sitemap_index(&base_url, &["page-sitemap.xml"]),
    )
    .await;
    mount_xml(
        &mock_server,
        "/page-sitemap.xml",
        urlset(&base_url, &["/blog/", "/blog/post/"]),
    )
    .await;

    // Only the slash forms exist on this server
    mount_html(&mock_server, "/blog/", html_page("Blog", &["post/"])).await;
    mount_html(&mock_server, "/blog/post/", html_page("Post", &["../"])).await;

    let config = create_test_config(&format!("{}/sitemap_index.xml", base_url));
    let groups = Coordinator::new(&config).unwrap().run().await.unwrap();
    let pages = &group(&groups, "page-sitemap").pages;

    let blog = pages.get(&format!("{}/blog", base_url)).unwrap();
    let post = pages.get(&format!("{}/blog/post", base_url)).unwrap();

    assert_eq!(blog.status, PageStatus::Ok);
    assert_eq!(blog.status_code, Some(ResponseCode::Http(200)));
    assert_eq!(post.status, PageStatus::Ok);
    assert_eq!(post.title, "Post");

    assert_eq!(post.used_count, 1);
    assert_eq!(
        post.used_by_pages.get(format!("{}/blog", base_url).as_str()),
        Some(&1)
    );
    assert_eq!(blog.used_count, 1);
    assert!(!post.is_orphaned());
}

#[tokio::test]
async fn test_failed_child_sitemap_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap_index.xml",
        sitemap_index(
            &base_url,
            &["post-sitemap.xml", "broken-sitemap.xml", "page-sitemap.xml"],
        ),
    )
    .await;
    mount_xml(&mock_server, "/post-sitemap.xml", urlset(&base_url, &["/post"])).await;
    mount_status(&mock_server, "/broken-sitemap.xml", 500).await;
    mount_xml(&mock_server, "/page-sitemap.xml", urlset(&base_url, &["/page"])).await;
    mount_html(&mock_server, "/post", html_page("Post", &["/page"])).await;
    mount_html(&mock_server, "/page", html_page("Page", &["/post"])).await;

    let config = create_test_config(&format!("{}/sitemap_index.xml", base_url));
    let groups = Coordinator::new(&config).unwrap().run().await.unwrap();

    // Ordered by sitemap name, failed sitemap absent
    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["page-sitemap", "post-sitemap"]);

    // Links across groups are not credited
    for group in &groups {
        for record in group.records() {
            assert_eq!(record.status, PageStatus::Ok);
            assert_eq!(record.used_count, 0);
        }
    }
}

#[tokio::test]
async fn test_same_url_in_two_groups_is_independent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap_index.xml",
        sitemap_index(&base_url, &["a-sitemap.xml", "b-sitemap.xml"]),
    )
    .await;
    mount_xml(&mock_server, "/a-sitemap.xml", urlset(&base_url, &["/shared", "/one"])).await;
    mount_xml(&mock_server, "/b-sitemap.xml", urlset(&base_url, &["/shared"])).await;
    mount_html(&mock_server, "/shared", html_page("Shared", &[])).await;
    mount_html(&mock_server, "/one", html_page("One", &["/shared"])).await;

    let config = create_test_config(&format!("{}/sitemap_index.xml", base_url));
    let groups = Coordinator::new(&config).unwrap().run().await.unwrap();

    let shared = format!("{}/shared", base_url);
    assert_eq!(group(&groups, "a-sitemap").pages.get(&shared).unwrap().used_count, 1);
    assert_eq!(group(&groups, "b-sitemap").pages.get(&shared).unwrap().used_count, 0);
}

#[tokio::test]
async fn test_index_failure_is_fatal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_status(&mock_server, "/sitemap_index.xml", 404).await;

    let config = create_test_config(&format!("{}/sitemap_index.xml", base_url));
    let result = Coordinator::new(&config).unwrap().run().await;

    assert!(matches!(
        result,
        Err(UsageError::Sitemap(SitemapError::Status { status: 404, .. }))
    ));
}

#[tokio::test]
async fn test_malformed_index_is_fatal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap_index.xml",
        "<sitemapindex><sitemap><loc>x</sitemap>".to_string(),
    )
    .await;

    let config = create_test_config(&format!("{}/sitemap_index.xml", base_url));
    let result = Coordinator::new(&config).unwrap().run().await;

    assert!(matches!(
        result,
        Err(UsageError::Sitemap(SitemapError::Parse { .. }))
    ));
}

#[tokio::test]
async fn test_plain_sitemap_as_index() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(&mock_server, "/sitemap.xml", urlset(&base_url, &["/", "/about"])).await;
    mount_html(&mock_server, "/", html_page("Home", &["/about/"])).await;
    mount_html(&mock_server, "/about", html_page("About", &["/"])).await;

    let config = create_test_config(&format!("{}/sitemap.xml", base_url));
    let groups = Coordinator::new(&config).unwrap().run().await.unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "sitemap");

    // The root URL normalizes to the bare origin
    let home = groups[0].pages.get(&base_url).unwrap();
    let about = groups[0].pages.get(&format!("{}/about", base_url)).unwrap();
    assert_eq!(home.used_count, 1);
    assert_eq!(about.used_count, 1);
}

#[tokio::test]
async fn test_timeout_marks_page_as_error() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap_index.xml",
        sitemap_index(&base_url, &["page-sitemap.xml"]),
    )
    .await;
    mount_xml(&mock_server, "/page-sitemap.xml", urlset(&base_url, &["/slow", "/fast"])).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page("Slow", &["/fast"]))
                .insert_header("content-type", "text/html")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/fast", html_page("Fast", &[])).await;

    let config = create_test_config(&format!("{}/sitemap_index.xml", base_url));
    let groups = Coordinator::new(&config).unwrap().run().await.unwrap();

    let pages = &groups[0].pages;
    let slow = pages.get(&format!("{}/slow", base_url)).unwrap();
    let fast = pages.get(&format!("{}/fast", base_url)).unwrap();

    assert_eq!(slow.status, PageStatus::Error);
    assert_eq!(
        slow.status_code,
        Some(ResponseCode::Failure("Request timeout".to_string()))
    );
    assert_eq!(fast.status, PageStatus::Ok);
    // The slow page never delivered its links
    assert_eq!(fast.used_count, 0);
}

#[tokio::test]
async fn test_crawl_report() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap_index.xml",
        sitemap_index(&base_url, &["page-sitemap.xml"]),
    )
    .await;
    mount_xml(&mock_server, "/page-sitemap.xml", urlset(&base_url, &["/a", "/b", "/c"])).await;
    mount_html(&mock_server, "/a", html_page("A", &["/b"])).await;
    mount_html(&mock_server, "/b", html_page("B", &[])).await;
    mount_html(&mock_server, "/c", html_page("C", &[])).await;

    let index_url = format!("{}/sitemap_index.xml", base_url);
    let config = create_test_config(&index_url);
    let report = crawl(&config, "deadbeef").await.unwrap();

    assert_eq!(report.index_url, index_url);
    assert_eq!(report.config_hash, "deadbeef");
    assert!(report.finished_at >= report.started_at);
    assert_eq!(report.total_pages(), 3);

    let stats = CrawlStatistics::from_report(&report);
    assert_eq!(stats.pages_used, 1);
    assert_eq!(stats.pages_not_linked, 2);
    assert_eq!(stats.pages_with_errors, 0);
    assert_eq!(stats.pages_under_linked, 1);

    let markdown = format_markdown_summary(&report);
    assert!(markdown.contains("Not linked from any page"));
    assert!(markdown.contains(&format!("{}/a (1)", base_url)));
}

//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and drive the real
//! HTTP page source through complete crawls.

use ripple_map::config::{Config, CrawlerConfig};
use ripple_map::crawler::{crawl, Coordinator, HttpSource};
use ripple_map::output::{render_edges, CrawlStatistics, Edge};
use ripple_map::AvoidSet;
use std::sync::Arc;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with near-zero jitter
fn create_test_config(scan_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler = CrawlerConfig {
        scan_depth,
        jitter_min_ms: 0,
        jitter_max_ms: 5,
        request_timeout_secs: 5,
        ..CrawlerConfig::default()
    };
    config
}

fn html_page(hrefs: &[String]) -> ResponseTemplate {
    let body: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, route: &str, hrefs: &[String], expected: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(hrefs))
        .expect(expected)
        .mount(server)
        .await;
}

fn edge(parent: &str, child: &str) -> Edge {
    Edge {
        parent: parent.to_string(),
        child: child.to_string(),
    }
}

#[tokio::test]
async fn test_full_crawl_depth_two() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Root page: two distinct-path children plus links that must be ignored
    mount_page(
        &mock_server,
        "/",
        &[
            "/page1".to_string(),
            "/page1".to_string(),
            "/page2".to_string(),
            "/".to_string(),
            "/site.css".to_string(),
            "https://other.example.org/elsewhere".to_string(),
            format!("/go?u={}/page3", base_url),
        ],
        1,
    )
    .await;
    mount_page(&mock_server, "/page1", &["/page1/child".to_string()], 1).await;
    mount_page(&mock_server, "/page2", &["/page2/child".to_string()], 1).await;
    mount_page(&mock_server, "/page1/child", &["/page1/child/deeper".to_string()], 1).await;
    mount_page(&mock_server, "/page2/child", &[], 1).await;
    mount_page(&mock_server, "/page1/child/deeper", &[], 0).await;
    mount_page(&mock_server, "/page3", &[], 0).await;

    let config = create_test_config(2);
    let (root, avoid) = crawl(&config, &base_url).await.expect("crawl failed");

    assert!(avoid.is_empty());
    assert_eq!(root.children.len(), 2);

    let edges = render_edges(&root, 2);
    assert_eq!(
        edges,
        vec![
            edge(&base_url, &format!("{}/page1", base_url)),
            edge(
                &format!("{}/page1", base_url),
                &format!("{}/page1/child", base_url)
            ),
            edge(&base_url, &format!("{}/page2", base_url)),
            edge(
                &format!("{}/page2", base_url),
                &format!("{}/page2/child", base_url)
            ),
        ]
    );

    let stats = CrawlStatistics::collect(&root, &avoid);
    assert_eq!(stats.fetched_pages, 5);
    assert_eq!(stats.deepest_fetched_level, 2);
}

#[tokio::test]
async fn test_depth_zero_fetches_only_root() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", &["/page1".to_string()], 1).await;
    mount_page(&mock_server, "/page1", &[], 0).await;

    let config = create_test_config(0);
    let (root, _) = crawl(&config, &base_url).await.expect("crawl failed");

    assert!(root.is_fetched());
    assert_eq!(root.children.len(), 1);
    assert!(render_edges(&root, 0).is_empty());
}

#[tokio::test]
async fn test_failing_page_exhausts_retries_and_is_avoided() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        &["/ok".to_string(), "/broken".to_string()],
        1,
    )
    .await;
    mount_page(&mock_server, "/ok", &["/broken?again=1".to_string()], 1).await;

    // Three attempts, then never again for any URL with this path
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = create_test_config(2);
    let (root, avoid) = crawl(&config, &base_url).await.expect("crawl failed");

    assert!(avoid.contains("/broken"));
    assert_eq!(avoid.len(), 1);

    let broken = &root.children[1];
    assert!(!broken.is_fetched());
    assert!(broken.children.is_empty());

    // Both first-level edges are reported; only the fetched child is expanded
    let edges = render_edges(&root, 2);
    assert_eq!(edges.len(), 3);
    assert_eq!(
        edges[1],
        edge(
            &format!("{}/ok", base_url),
            &format!("{}/broken?again=1", base_url)
        )
    );
}

#[tokio::test]
async fn test_retry_then_success() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // First request fails, the retry succeeds
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/", &["/after-retry".to_string()], 1).await;
    mount_page(&mock_server, "/after-retry", &[], 1).await;

    let config = create_test_config(1);
    let (root, avoid) = crawl(&config, &base_url).await.expect("crawl failed");

    assert!(root.is_fetched());
    assert!(avoid.is_empty());
    assert_eq!(root.children.len(), 1);
    assert!(root.children[0].is_fetched());
}

#[tokio::test]
async fn test_browser_headers_sent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "ripple-map-test/1.0"))
        .and(header_exists("accept"))
        .and(header_exists("accept-language"))
        .respond_with(html_page(&[]))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Comma-free value so the header compares as a single item
    let mut config = create_test_config(1);
    config.user_agent.value = "ripple-map-test/1.0".to_string();
    let source = Arc::new(HttpSource::from_config(&config).expect("client"));
    let coordinator = Coordinator::new(&config.crawler, source);

    let avoid = Arc::new(AvoidSet::new());
    let root = coordinator
        .crawl_with(&base_url, Arc::clone(&avoid))
        .await
        .expect("crawl failed");

    assert!(root.is_fetched());
    assert!(avoid.is_empty());
}

#[tokio::test]
async fn test_body_decoded_with_declared_charset() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // "/café" encoded as ISO-8859-1
    let body = b"<html><body><a href=\"/caf\xe9\">menu</a></body></html>".to_vec();
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=iso-8859-1"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(0);
    let (root, _) = crawl(&config, &base_url).await.expect("crawl failed");

    assert_eq!(root.links, vec![format!("{}/caf%C3%A9", base_url)]);
}

//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test the full
//! crawl cycle end-to-end, plus an in-memory link graph for properties that
//! need a large site.

use std::collections::BTreeSet;
use std::io::Write;
use std::time::Duration;
use sumi_crawl::config::{load_config, CrawlerConfig, UserAgentConfig};
use sumi_crawl::crawler::{run_crawl, Coordinator, FetchedPage, HttpFetcher, PageFetcher};
use sumi_crawl::FetchError;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_fetcher() -> HttpFetcher {
    HttpFetcher::from_config(&UserAgentConfig::default(), Duration::from_secs(5))
        .expect("Failed to build fetcher")
}

fn crawler_config(workers: usize) -> CrawlerConfig {
    CrawlerConfig {
        workers,
        ..CrawlerConfig::default()
    }
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .expect(1)
        .mount(server)
        .await;
}

fn url(s: &str) -> Url {
    Url::parse(s).expect("Failed to parse URL")
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Index links to two pages, one absolute and one relative
    mount_page(
        &mock_server,
        "/",
        format!(
            r##"<html><head><title>Home</title></head><body>
            <a href="{}/page1">Page 1</a>
            <a href="page2">Page 2</a>
            <a href="mailto:someone@example.com">Mail</a>
            <a href="#top">Top</a>
            </body></html>"##,
            base_url
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/page1",
        r#"<html><body><a href="/">Home</a><a href="/page2">Page 2</a></body></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/page2",
        r#"<html><body><p>No links here</p></body></html>"#.to_string(),
    )
    .await;

    let seeds = vec![url(&format!("{}/", base_url))];
    let report = run_crawl(crawler_config(4), http_fetcher(), seeds)
        .await
        .expect("Crawl failed");

    assert_eq!(report.handled, 3);
    assert_eq!(report.succeeded, 3);
    assert_eq!(report.failed, 0);
    assert!(!report.cancelled);

    let expected: BTreeSet<Url> = ["/", "/page1", "/page2"]
        .iter()
        .map(|p| url(&format!("{}{}", base_url, p)))
        .collect();
    assert_eq!(report.visited, expected);
}

#[tokio::test]
async fn test_missing_seed_completes_with_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let seeds = vec![url(&format!("{}/missing", mock_server.uri()))];
    let report = run_crawl(crawler_config(2), http_fetcher(), seeds)
        .await
        .expect("Crawl failed");

    assert_eq!(report.handled, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.links_discovered, 0);
    assert_eq!(report.failures_by_kind.get("http-status"), Some(&1));
}

#[tokio::test]
async fn test_two_page_cycle() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/a", r#"<a href="/b">B</a>"#.to_string()).await;
    mount_page(&mock_server, "/b", r#"<a href="/a">A</a>"#.to_string()).await;

    let seeds = vec![url(&format!("{}/a", mock_server.uri()))];
    let report = run_crawl(crawler_config(8), http_fetcher(), seeds)
        .await
        .expect("Crawl failed");

    // Each page is fetched exactly once; the .expect(1) mocks verify on drop
    assert_eq!(report.handled, 2);
    assert_eq!(report.visited.len(), 2);
}

#[tokio::test]
async fn test_redirect_resolves_links_against_final_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/docs/", base_url).as_str()),
        )
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/docs/", r#"<a href="intro">Intro</a>"#.to_string()).await;
    mount_page(&mock_server, "/docs/intro", "<p>end</p>".to_string()).await;

    let seeds = vec![url(&format!("{}/start", base_url))];
    let report = run_crawl(crawler_config(2), http_fetcher(), seeds)
        .await
        .expect("Crawl failed");

    // The redirect target is fetched under the seed URL, not admitted separately
    assert_eq!(report.handled, 2);
    assert!(report
        .visited
        .contains(&url(&format!("{}/docs/intro", base_url))));
    assert!(!report.visited.contains(&url(&format!("{}/docs/", base_url))));
}

#[tokio::test]
async fn test_non_html_page_is_a_parse_failure() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/document.pdf">PDF Document</a>"#.to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/document.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "%PDF-1.4 <a href=\"/hidden\">x</a>",
            "application/pdf",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let seeds = vec![url(&format!("{}/", base_url))];
    let report = run_crawl(crawler_config(2), http_fetcher(), seeds)
        .await
        .expect("Crawl failed");

    assert_eq!(report.handled, 2);
    assert_eq!(report.failures_by_kind.get("parse"), Some(&1));
    assert!(!report.visited.contains(&url(&format!("{}/hidden", base_url))));
}

#[tokio::test]
async fn test_no_follow_fetches_only_seeds() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/next">Next</a>"#.to_string()).await;

    let config = CrawlerConfig {
        follow_links: false,
        ..crawler_config(2)
    };
    let seeds = vec![url(&format!("{}/", mock_server.uri()))];
    let report = run_crawl(config, http_fetcher(), seeds)
        .await
        .expect("Crawl failed");

    assert_eq!(report.handled, 1);
    assert_eq!(report.links_discovered, 1);
    assert_eq!(report.visited.len(), 1);
}

#[tokio::test]
async fn test_crawl_from_config_file() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", r#"<a href="/about">About</a>"#.to_string()).await;
    mount_page(&mock_server, "/about", "<p>about</p>".to_string()).await;

    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    write!(
        file,
        r#"
[crawler]
workers = 3
request-timeout-secs = 5

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"

[frontier]
seeds = ["{}/"]
"#,
        mock_server.uri()
    )
    .expect("Failed to write config");

    let config = load_config(file.path()).expect("Failed to load config");
    let seeds = config.seed_urls().expect("Invalid seeds");
    let fetcher = HttpFetcher::from_config(
        &config.user_agent,
        Duration::from_secs(config.crawler.request_timeout_secs),
    )
    .expect("Failed to build fetcher");

    let report = run_crawl(config.crawler, fetcher, seeds)
        .await
        .expect("Crawl failed");
    assert_eq!(report.handled, 2);
}

/// Deterministic in-memory site used for engine properties
///
/// Page `i` links to a few pseudo-random pages of the same site plus one
/// page that does not exist, so the graph has cycles, shared children and
/// failures.
struct SyntheticSite {
    pages: usize,
}

impl SyntheticSite {
    fn page_url(i: usize) -> String {
        format!("http://graph.test/p/{}", i)
    }

    fn links_of(&self, i: usize) -> Vec<String> {
        vec![
            Self::page_url((i * 7 + 1) % self.pages),
            Self::page_url((i * 13 + 5) % self.pages),
            Self::page_url((i * 2) % self.pages),
            format!("/missing/{}", i % 10),
        ]
    }
}

impl PageFetcher for SyntheticSite {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        // Yield so workers interleave even without real I/O
        tokio::task::yield_now().await;

        let index = url
            .path()
            .strip_prefix("/p/")
            .and_then(|i| i.parse::<usize>().ok())
            .filter(|i| *i < self.pages)
            .ok_or_else(|| FetchError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })?;

        let body: String = self
            .links_of(index)
            .iter()
            .map(|l| format!(r#"<a href="{}">link</a>"#, l))
            .collect();
        Ok(FetchedPage {
            final_url: url.clone(),
            status_code: 200,
            content_type: Some("text/html".to_string()),
            body,
        })
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_worker_count_does_not_change_outcome() {
    let seeds = vec![url(&SyntheticSite::page_url(0))];

    let single = run_crawl(crawler_config(1), SyntheticSite { pages: 300 }, seeds.clone())
        .await
        .expect("Single-worker crawl failed");
    let many = run_crawl(crawler_config(50), SyntheticSite { pages: 300 }, seeds)
        .await
        .expect("Fifty-worker crawl failed");

    assert_eq!(single.visited, many.visited);
    assert_eq!(single.handled, many.handled);
    assert_eq!(single.succeeded, many.succeeded);
    assert_eq!(single.failures_by_kind, many.failures_by_kind);
    assert_eq!(single.handled, single.visited.len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cancel_stops_a_running_crawl() {
    struct SlowSite;

    impl PageFetcher for SlowSite {
        async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(FetchedPage {
                final_url: url.clone(),
                status_code: 200,
                content_type: None,
                body: String::new(),
            })
        }
    }

    let coordinator = Coordinator::new(crawler_config(4), SlowSite);
    let handle = coordinator.cancel_handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();
    });

    let report = tokio::time::timeout(
        Duration::from_secs(5),
        coordinator.run(vec![url("http://slow.test/")]),
    )
    .await
    .expect("Cancellation did not stop the crawl")
    .expect("Crawl failed");

    assert!(report.cancelled);
    assert_eq!(report.handled, 0);
}

//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle end-to-end through the real HTTP fetcher.

use link_health::config::{CrawlConfig, FileConfig, Overrides};
use link_health::crawler::{Coordinator, Fetcher, HttpFetcher};
use link_health::output::{CollectingReporter, CrawlSummary};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for the given seed with no jitter
fn create_test_config(seed: &str, max_depth: u32) -> CrawlConfig {
    let overrides = Overrides {
        max_depth: Some(max_depth),
        jitter_ms: Some(0),
        user_agent: Some("TestBot/1.0".to_string()),
        ..Overrides::default()
    };
    CrawlConfig::resolve(seed, FileConfig::default(), overrides).expect("valid test config")
}

async fn run(config: CrawlConfig) -> (CrawlSummary, Arc<CollectingReporter>) {
    let reporter = Arc::new(CollectingReporter::new());
    let fetcher = HttpFetcher::new(&config).expect("Failed to build client");
    let coordinator = Coordinator::new(config, fetcher, Arc::clone(&reporter))
        .expect("Failed to create coordinator");
    let summary = coordinator.run().await;
    (summary, reporter)
}

/// 200 response with an HTML body
///
/// `set_body_raw` is used because `set_body_string` forces `text/plain`.
fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><body>
                <a href="/ok">OK</a>
                <a href="/missing">Missing</a>
                <a href="/ok#again">OK again</a>
                <a href="/logo.png">Logo</a>
            </body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html(r#"<a href="/too-deep">deeper</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![0x89, b'P', b'N', b'G'], "image/png"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/too-deep"))
        .respond_with(html(""))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (summary, reporter) = run(create_test_config(&format!("{}/", base_url), 1)).await;

    assert_eq!(reporter.records().len(), 4);
    assert_eq!(summary.fetched, 4);
    assert_eq!(summary.healthy, 3);
    assert_eq!(summary.down, 1);

    let missing = reporter
        .record_for(&format!("{}/missing", base_url))
        .expect("missing page reported");
    assert!(!missing.healthy);
    assert_eq!(missing.status_code, Some(404));

    let ok = reporter
        .record_for(&format!("{}/ok", base_url))
        .expect("ok page reported");
    assert!(ok.healthy);
    assert_eq!(ok.status_code, Some(200));

    assert!(reporter.errors().is_empty());
}

#[tokio::test]
async fn test_html_response_detected_by_fetcher() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/x">x</a>"#))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1);
    let fetcher = HttpFetcher::new(&config).expect("Failed to build client");
    let page = fetcher.fetch(&config.seed_url).await.expect("fetch succeeded");

    assert_eq!(page.status_code, 200);
    assert!(page.is_html(), "content type was {:?}", page.content_type);
    assert_eq!(page.body, r#"<a href="/x">x</a>"#);
}

#[tokio::test]
async fn test_user_agent_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/1.0"))
        .respond_with(html("<p>hello</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (summary, reporter) = run(create_test_config(&mock_server.uri(), 0)).await;

    assert_eq!(summary.fetched, 1);
    assert!(reporter.records()[0].healthy);
}

#[tokio::test]
async fn test_connection_failure_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="http://127.0.0.1:1/dead">dead</a>"#))
        .mount(&mock_server)
        .await;

    let (summary, reporter) = run(create_test_config(&mock_server.uri(), 1)).await;

    let dead = reporter
        .record_for("http://127.0.0.1:1/dead")
        .expect("dead link reported");
    assert!(!dead.healthy);
    assert_eq!(dead.status_code, None);
    assert_eq!(summary.failed, 1);

    let errors = reporter.errors();
    assert_eq!(errors.len(), 1);
    assert!(
        errors[0].starts_with("Request to http://127.0.0.1:1/dead failed. Reason: "),
        "unexpected error line: {}",
        errors[0]
    );
}

#[tokio::test]
async fn test_timeout_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/slow">slow</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("late").set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), 1);
    config.request_timeout = Duration::from_millis(300);

    let (_, reporter) = run(config).await;

    let slow = reporter
        .record_for(&format!("{}/slow", mock_server.uri()))
        .expect("slow link reported");
    assert!(!slow.healthy);
    assert_eq!(slow.status_code, None);
    assert_eq!(
        reporter.errors(),
        vec![format!(
            "Request to {}/slow failed. Reason: Request timeout",
            mock_server.uri()
        )]
    );
}

#[tokio::test]
async fn test_redirect_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/old">old</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(html("moved here"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (_, reporter) = run(create_test_config(&base_url, 1)).await;

    let old = reporter
        .record_for(&format!("{}/old", base_url))
        .expect("redirected link reported under its own URL");
    assert!(old.healthy);
    assert_eq!(old.status_code, Some(200));
}

#[tokio::test]
async fn test_redirect_loop_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/"))
        .mount(&mock_server)
        .await;

    let (summary, reporter) = run(create_test_config(&mock_server.uri(), 1)).await;

    assert_eq!(summary.fetched, 1);
    let record = &reporter.records()[0];
    assert!(!record.healthy);
    assert_eq!(record.status_code, None);
    assert_eq!(reporter.errors().len(), 1);
}

#[tokio::test]
async fn test_cyclic_site_terminates() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&format!(
            r#"<a href="{}/">home</a><a href="/a">a</a>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(r#"<a href="/">back</a><a href="./a">self</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (summary, _) = tokio::time::timeout(
        Duration::from_secs(10),
        run(create_test_config(&base_url, 10)),
    )
    .await
    .expect("crawl of a cyclic site did not terminate");

    assert_eq!(summary.fetched, 2);
}

#[tokio::test]
async fn test_depth_zero_only_seed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/child">child</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/child"))
        .respond_with(html(""))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (summary, reporter) = run(create_test_config(&mock_server.uri(), 0)).await;

    assert_eq!(summary.fetched, 1);
    assert_eq!(reporter.records().len(), 1);
}

//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use mailtrawl::config::Config;
use mailtrawl::crawler::Coordinator;
use mailtrawl::output::{aggregate, save_report, SaveOutcome, UTF8_BOM};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short delays
fn create_test_config(max_pages: usize) -> Config {
    let mut config = Config::default();
    config.crawler.max_pages = max_pages;
    config.crawler.politeness_delay = 0;
    config.crawler.backoff_base = 10;
    config.crawler.request_timeout = 5_000;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.contact_email = Some("test@example.com".to_string());
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<h1>Welcome</h1>
           <p>Contact us at test@example.com or support@domain.com</p>
           <a href="/team">Team</a>
           <a href="/contact">Contact</a>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/team",
        r#"<div class="elementor-widget-text-editor">
               <h4>Anna</h4><p>Sales: anna@example.com</p>
           </div>
           <p>Also test@example.com</p>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/contact",
        r#"<a href="mailto:info@site.org?subject=hi">Email us</a>"#,
    )
    .await;

    let seed = format!("{}/", base_url);
    let mut coordinator = Coordinator::new(&seed, &create_test_config(100)).unwrap();
    let results = coordinator.run().await.clone();

    assert_eq!(results.len(), 3);

    let home = results.get(&seed).unwrap();
    assert_eq!(home.len(), 2);
    assert_eq!(
        home[0].context,
        "Contact us at test@example.com or support@domain.com"
    );

    let team = results.get(&format!("{}/team", base_url)).unwrap();
    assert_eq!(team[0].email.as_str(), "anna@example.com");
    assert_eq!(team[0].context, "Sales: anna@example.com");

    let contact = results.get(&format!("{}/contact", base_url)).unwrap();
    assert_eq!(contact[0].email.as_str(), "info@site.org");
    assert!(contact[0].context.contains("Email us"));

    let report = aggregate(&results);
    assert_eq!(report.len(), 4);
    assert_eq!(report.get("test@example.com").unwrap().found_on, seed);

    let stats = coordinator.statistics();
    assert_eq!(stats.pages_visited, 3);
    assert_eq!(stats.pages_processed, 3);
    assert_eq!(stats.unique_emails, 4);
}

#[tokio::test]
async fn test_budget_of_one_fetches_only_seed() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<p>one@example.com</p><a href="/a">A</a><a href="/b">B</a>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html("<p>aa@example.com</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html("<p>bb@example.com</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let results = mailtrawl::crawler::run_crawl(&mock_server.uri(), &create_test_config(1))
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results.total_findings(), 1);
}

#[tokio::test]
async fn test_process_website_defaults() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "<p>hello@example.com</p>").await;

    let results = mailtrawl::process_website(&mock_server.uri(), 1).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(
        results.iter().next().unwrap().findings[0].email.as_str(),
        "hello@example.com"
    );
}

#[tokio::test]
async fn test_server_error_is_retried_and_crawl_continues() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/broken">Broken</a><a href="/ok">Ok</a>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/ok", "<p>ok@example.com</p>").await;

    let mut coordinator =
        Coordinator::new(&format!("{}/", base_url), &create_test_config(100)).unwrap();
    let results = coordinator.run().await.clone();

    assert!(results.get(&format!("{}/broken", base_url)).is_none());
    assert!(results.get(&format!("{}/ok", base_url)).is_some());

    let stats = coordinator.statistics();
    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.pages_processed, 2);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/missing">Missing</a>"#).await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let results = mailtrawl::crawler::run_crawl(&mock_server.uri(), &create_test_config(100))
        .await
        .unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_off_site_links_are_not_followed() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;

    mount_page(
        &site,
        "/",
        &format!(
            r#"<a href="{}/elsewhere">Other site</a><a href="/local">Local</a>"#,
            other.uri()
        ),
    )
    .await;
    mount_page(&site, "/local", "<p>local@example.com</p>").await;

    Mock::given(method("GET"))
        .respond_with(html("<p>other@example.com</p>"))
        .expect(0)
        .mount(&other)
        .await;

    let results = mailtrawl::crawler::run_crawl(&site.uri(), &create_test_config(100))
        .await
        .unwrap();

    let report = aggregate(&results);
    assert!(report.get("local@example.com").is_some());
    assert!(report.get("other@example.com").is_none());
}

#[tokio::test]
async fn test_cancellation_aborts_in_flight_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<p>slow@example.com</p>").set_delay(Duration::from_secs(30)))
        .mount(&mock_server)
        .await;

    let token = CancellationToken::new();
    let mut coordinator = Coordinator::new(&mock_server.uri(), &create_test_config(100))
        .unwrap()
        .with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        token.cancel();
    });

    let started = Instant::now();
    let results = coordinator.run().await.clone();
    canceller.await.unwrap();

    assert!(results.is_empty());
    assert!(started.elapsed() < Duration::from_secs(5));

    let stats = coordinator.statistics();
    assert!(stats.cancelled);
    assert_eq!(stats.pages_visited, 0);
}

#[tokio::test]
async fn test_report_written_as_csv() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<p>First: jobs@example.com</p><a href="/more">More</a>"#,
    )
    .await;
    mount_page(&mock_server, "/more", "<p>Again: jobs@example.com, hr@example.com</p>").await;

    let results = mailtrawl::crawler::run_crawl(&base_url, &create_test_config(100))
        .await
        .unwrap();
    let report = aggregate(&results);

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("emails_data.csv");
    let outcome = save_report(&report, &csv_path);
    assert!(matches!(outcome, SaveOutcome::Saved { count: 2 }));

    let text = std::fs::read_to_string(&csv_path).unwrap();
    let mut lines = text.trim_start_matches(UTF8_BOM).lines();
    assert_eq!(lines.next(), Some("email,found_on,context"));
    assert_eq!(
        lines.next(),
        Some(format!("jobs@example.com,{}/,First: jobs@example.com", base_url).as_str())
    );
    assert!(lines.next().unwrap().starts_with("hr@example.com,"));
    assert_eq!(lines.next(), None);
}

#[tokio::test]
async fn test_invalid_seed_is_fatal() {
    let config = create_test_config(10);
    assert!(mailtrawl::crawler::run_crawl("not a url", &config).await.is_err());
    assert!(mailtrawl::crawler::run_crawl("ftp://example.com/", &config).await.is_err());
}

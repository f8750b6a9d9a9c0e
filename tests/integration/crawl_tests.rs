//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock HTTP servers and tempfile output
//! directories to run the full fetch, save and follow cycle end-to-end.

use archive_harvest::config::{CollisionPolicy, Config, OutputConfig, Traversal};
use archive_harvest::crawler::{crawl, Coordinator, HttpFetcher};
use archive_harvest::state::{PageState, ResourceState};
use archive_harvest::url::OriginScope;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing into `dir`, with no delays
fn create_test_config(seed: &str, prefix: &str, dir: &TempDir) -> Config {
    let mut config = Config::for_seed(seed, Some(prefix));
    config.crawler.resource_delay_ms = 0;
    config.crawler.page_delay_ms = 0;
    config.http.timeout_secs = 5;
    config.output = OutputConfig {
        html_dir: dir.path().join("html").to_string_lossy().into_owned(),
        image_dir: dir.path().join("images").to_string_lossy().into_owned(),
        image_links_file: None,
        collision: CollisionPolicy::Suffix,
    };
    config
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, body: String, hits: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .expect(hits)
        .mount(server)
        .await;
}

async fn mount_image(server: &MockServer, image_path: &str, bytes: &[u8], hits: u64) {
    Mock::given(method("GET"))
        .and(path(image_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(bytes.to_vec())
                .insert_header("content-type", "image/png"),
        )
        .expect(hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_reference_site_harvest() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let seed = format!("{}/site/", base_url);
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/site/",
        format!(
            r#"<html><body>
            <a href="{base}/site/about">About</a>
            <a href="{base}/other.test/">Elsewhere</a>
            <img src="/img/logo.png">
            </body></html>"#,
            base = base_url
        ),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/site/about",
        "<html><body><p>About us</p></body></html>".to_string(),
        1,
    )
    .await;
    mount_page(&mock_server, "/other.test/", String::new(), 0).await;
    mount_image(&mock_server, "/img/logo.png", b"\x89PNG", 1).await;

    let config = create_test_config(&seed, &seed, &dir);
    let stats = crawl(config).await.expect("harvest should run");

    assert_eq!(stats.pages(PageState::Persisted), 2);
    assert_eq!(stats.resources(ResourceState::Downloaded), 1);
    assert_eq!(stats.out_of_scope_links, 1);

    assert!(dir.path().join("html/site").exists());
    assert!(dir.path().join("html/site_about").exists());
    assert_eq!(
        fs::read(dir.path().join("images/logo.png")).unwrap(),
        b"\x89PNG"
    );

    let links = fs::read_to_string(dir.path().join("html/image_links.txt")).unwrap();
    assert_eq!(links, format!("{}/img/logo.png\n", base_url));
}

#[tokio::test]
async fn test_not_found_page_does_not_halt_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let seed = format!("{}/site/", base_url);
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/site/",
        r#"<a href="missing">Missing</a><a href="present">Present</a>"#.to_string(),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/site/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/site/present", "<p>here</p>".to_string(), 1).await;

    let config = create_test_config(&seed, &seed, &dir);
    let stats = crawl(config).await.unwrap();

    assert_eq!(stats.pages(PageState::Failed), 1);
    assert_eq!(stats.pages(PageState::Persisted), 2);
    assert!(!dir.path().join("html/site_missing").exists());
    assert!(dir.path().join("html/site_present").exists());
}

#[tokio::test]
async fn test_shared_images_downloaded_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let seed = format!("{}/site/", base_url);
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/site/",
        r#"<img src="/img/a.png"><img src="/img/b.png"><a href="next">Next</a>"#.to_string(),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/site/next",
        r#"<img src="/img/a.png"><img data-src="/img/b.png"><img src="/img/c.png">"#.to_string(),
        1,
    )
    .await;
    mount_image(&mock_server, "/img/a.png", b"A", 1).await;
    mount_image(&mock_server, "/img/b.png", b"B", 1).await;
    mount_image(&mock_server, "/img/c.png", b"C", 1).await;

    let config = create_test_config(&seed, &seed, &dir);
    let stats = crawl(config).await.unwrap();

    assert_eq!(stats.resources(ResourceState::Downloaded), 3);
    assert_eq!(stats.resources(ResourceState::SkippedDuplicate), 2);
    assert_eq!(stats.resource_fetches(), 3);

    // Every resolved reference is logged, duplicates included
    let links = fs::read_to_string(dir.path().join("html/image_links.txt")).unwrap();
    assert_eq!(links.lines().count(), 5);
}

#[tokio::test]
async fn test_existing_image_is_not_fetched() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let seed = format!("{}/site/", base_url);
    let dir = TempDir::new().unwrap();

    fs::create_dir_all(dir.path().join("images")).unwrap();
    fs::write(dir.path().join("images/logo.png"), b"old").unwrap();

    mount_page(
        &mock_server,
        "/site/",
        r#"<img src="/img/logo.png">"#.to_string(),
        1,
    )
    .await;
    mount_image(&mock_server, "/img/logo.png", b"new", 0).await;

    let config = create_test_config(&seed, &seed, &dir);
    let stats = crawl(config).await.unwrap();

    assert_eq!(stats.resources(ResourceState::SkippedExisting), 1);
    assert_eq!(
        fs::read(dir.path().join("images/logo.png")).unwrap(),
        b"old"
    );
}

#[tokio::test]
async fn test_self_links_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let seed = format!("{}/site/", base_url);
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/site/",
        format!(
            r##"<a href="{base}/site/">Home</a><a href="{base}/site">Home</a>
                <a href="#main">Skip</a><a href="a">A</a>"##,
            base = base_url
        ),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/site/a",
        r#"<a href="/site/">Back</a><a href="/site/a#top">Top</a>"#.to_string(),
        1,
    )
    .await;

    let config = create_test_config(&seed, &seed, &dir);
    let stats = crawl(config).await.unwrap();

    assert_eq!(stats.pages_visited(), 2);
}

#[tokio::test]
async fn test_breadth_first_harvest() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let seed = format!("{}/site/", base_url);
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/site/",
        r#"<a href="a">A</a><a href="b">B</a>"#.to_string(),
        1,
    )
    .await;
    mount_page(&mock_server, "/site/a", r#"<a href="deep">Deep</a>"#.to_string(), 1).await;
    mount_page(&mock_server, "/site/b", String::new(), 1).await;
    mount_page(&mock_server, "/site/deep", String::new(), 1).await;

    let mut config = create_test_config(&seed, &seed, &dir);
    config.crawler.traversal = Traversal::BreadthFirst;

    let scope = OriginScope::new(&seed);
    let http = HttpFetcher::new(&config.http, &scope).unwrap();
    let mut coordinator =
        Coordinator::new(&config, Box::new(http.clone()), Box::new(http)).unwrap();
    let stats = coordinator.run().await;

    assert_eq!(stats.pages(PageState::Persisted), 4);
    assert_eq!(
        coordinator.page_state(&format!("{}/site/deep", base_url)),
        PageState::Persisted
    );
    assert_eq!(coordinator.visited_pages().len(), 4);

    let requests = mock_server.received_requests().await.unwrap();
    let order: Vec<String> = requests.iter().map(|r| r.url.path().to_string()).collect();
    assert_eq!(order, vec!["/site/", "/site/a", "/site/b", "/site/deep"]);
}

#[tokio::test]
async fn test_custom_image_links_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let seed = format!("{}/site/", base_url);
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/site/",
        r#"<img src="/img/x.png">"#.to_string(),
        1,
    )
    .await;
    mount_image(&mock_server, "/img/x.png", b"X", 1).await;

    let mut config = create_test_config(&seed, &seed, &dir);
    let links_path = dir.path().join("logs/images.txt");
    config.output.image_links_file = Some(links_path.to_string_lossy().into_owned());

    crawl(config).await.unwrap();

    let links = fs::read_to_string(&links_path).unwrap();
    assert_eq!(links.trim(), format!("{}/img/x.png", base_url));
    assert!(!dir.path().join("html/image_links.txt").exists());
}

#[tokio::test]
async fn test_unreachable_seed_completes() {
    let dir = TempDir::new().unwrap();
    let seed = "http://127.0.0.1:9/site/";

    let config = create_test_config(seed, seed, &dir);
    let stats = crawl(config).await.unwrap();

    assert_eq!(stats.pages(PageState::Failed), 1);
    assert_eq!(stats.pages(PageState::Persisted), 0);
}

#[tokio::test]
async fn test_redirect_out_of_scope_not_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let seed = format!("{}/site/", base_url);
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/site/",
        r#"<a href="moved">Moved</a><a href="renamed">Renamed</a>"#.to_string(),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/site/moved"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/outside/"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/outside/", "<p>outside</p>".to_string(), 0).await;
    Mock::given(method("GET"))
        .and(path("/site/renamed"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/site/new-name"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/site/new-name", "<p>inside</p>".to_string(), 1).await;

    let config = create_test_config(&seed, &seed, &dir);
    let stats = crawl(config).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != "/outside/"));

    assert_eq!(stats.pages(PageState::Failed), 1);
    assert_eq!(stats.pages(PageState::Persisted), 2);
    assert!(!dir.path().join("html/site_moved").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("html/site_renamed")).unwrap(),
        "<p>inside</p>"
    );
}

#[tokio::test]
async fn test_page_named_like_links_log_keeps_log() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let seed = format!("{}/", base_url);
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        r#"<img src="/img/a.png"><a href="/image_links.txt">Log</a>"#.to_string(),
        1,
    )
    .await;
    mount_page(&mock_server, "/image_links.txt", "PAGE MARKUP".to_string(), 1).await;
    mount_image(&mock_server, "/img/a.png", b"A", 1).await;

    let config = create_test_config(&seed, &seed, &dir);
    crawl(config).await.unwrap();

    let links = fs::read_to_string(dir.path().join("html/image_links.txt")).unwrap();
    assert_eq!(links, format!("{}/img/a.png\n", base_url));
    assert_eq!(
        fs::read_to_string(dir.path().join("html/image_links.txt-2")).unwrap(),
        "PAGE MARKUP"
    );
}

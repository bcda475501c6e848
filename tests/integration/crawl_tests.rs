//! Full crawl sessions against mock servers

use crate::support::{test_config, ScriptedProvider};
use linkscout::crawler::{crawl, FetchStatus};
use linkscout::output::{DiskSink, ResourceSink};
use linkscout::resources::ResourceKind;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts an HTML page at a path
async fn mount_page(server: &MockServer, at: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body.to_string(), "text/html"),
        )
        .mount(server)
        .await;
}

/// Counts how many requests the server received for a path
async fn requests_for(server: &MockServer, wanted: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == wanted)
        .count()
}

#[tokio::test]
async fn test_dedup_and_same_origin_end_to_end() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Four anchors that canonicalize to a single same-origin link.
    mount_page(
        &server,
        "/",
        &format!(
            r#"<html><body>
                <a href="/a">one</a>
                <a href="/a#frag">two</a>
                <a href="{}/a?utm_source=x">three</a>
                <a href="https://other.com/b">cross-origin</a>
            </body></html>"#,
            base
        ),
    )
    .await;
    mount_page(&server, "/a", "<html><body>leaf</body></html>").await;

    let summary = crawl(&base, &test_config(1), None, None).await.unwrap();

    let depth1: Vec<&str> = summary
        .records
        .iter()
        .filter(|r| r.depth == 1)
        .map(|r| r.url.as_str())
        .collect();
    assert_eq!(depth1, vec![format!("{}/a", base)]);

    // Seed plus the one deduplicated link.
    assert_eq!(summary.total_discovered, 2);
    assert_eq!(summary.total_fetched, 2);
    assert_eq!(requests_for(&server, "/a").await, 1);
}

#[tokio::test]
async fn test_frontier_never_revisits_despite_cycles() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<html><body><a href="/a">a</a> <a href="/b">b</a></body></html>"#,
    )
    .await;
    mount_page(
        &server,
        "/a",
        r#"<html><body><a href="/">home</a> <a href="/b">b</a></body></html>"#,
    )
    .await;
    mount_page(
        &server,
        "/b",
        r#"<html><body><a href="/">home</a> <a href="/a">a</a></body></html>"#,
    )
    .await;

    let summary = crawl(&base, &test_config(3), None, None).await.unwrap();

    assert_eq!(summary.total_fetched, 3);
    assert_eq!(summary.records.len(), 3);
    for at in ["/", "/a", "/b"] {
        assert_eq!(requests_for(&server, at).await, 1, "revisited {}", at);
    }
}

#[tokio::test]
async fn test_depth_bound_respected() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/p1">p1</a>"#).await;
    mount_page(&server, "/p1", r#"<a href="/p2">p2</a>"#).await;
    mount_page(&server, "/p2", r#"<a href="/p3">p3</a>"#).await;
    mount_page(&server, "/p3", r#"<a href="/p4">p4</a>"#).await;

    let summary = crawl(&base, &test_config(2), None, None).await.unwrap();

    assert!(summary.records.iter().all(|r| r.depth <= 2));
    assert_eq!(requests_for(&server, "/p3").await, 0);
    // /p3 was still discovered, just never fetched.
    assert_eq!(summary.total_discovered, 4);
}

#[tokio::test]
async fn test_fetch_errors_are_recorded_not_fatal() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<a href="/ok">ok</a> <a href="/broken">broken</a>"#,
    )
    .await;
    mount_page(&server, "/ok", "<html><body>fine</body></html>").await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let summary = crawl(&base, &test_config(1), None, None).await.unwrap();

    let broken = summary
        .records
        .iter()
        .find(|r| r.url.ends_with("/broken"))
        .unwrap();
    assert_eq!(broken.status, FetchStatus::Error);
    assert!(broken.error.as_deref().unwrap().contains("500"));

    // The failing target is visited and never retried.
    assert_eq!(requests_for(&server, "/broken").await, 1);
    assert_eq!(summary.total_fetched, 2);
}

#[tokio::test]
async fn test_bundle_routes_enter_the_frontier() {
    let server = MockServer::start().await;
    let base = server.uri();

    // A page with no anchors at all; its routes live in the bundle.
    mount_page(
        &server,
        "/blog",
        r#"<html><body><script src="/js/app.js"></script></body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/js/app.js"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(
                    format!(
                        r#"var posts=[{{"slug":"from-the-bundle"}}];{}"#,
                        " ".repeat(100)
                    ),
                    "application/javascript",
                ),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/blog/from-the-bundle", "<html><body>post</body></html>").await;

    let summary = crawl(&format!("{}/blog", base), &test_config(1), None, None)
        .await
        .unwrap();

    assert_eq!(requests_for(&server, "/blog/from-the-bundle").await, 1);
    let record = summary
        .records
        .iter()
        .find(|r| r.url.ends_with("/blog/from-the-bundle"))
        .unwrap();
    assert_eq!(record.depth, 1);
    assert_eq!(record.status, FetchStatus::Success);
}

#[tokio::test]
async fn test_runtime_strategy_feeds_frontier_with_isolated_contexts() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", "<html><body>nothing static here</body></html>").await;
    mount_page(&server, "/rendered-page", "<html><body>found</body></html>").await;

    let provider = ScriptedProvider::new(vec!["/rendered-page".to_string()]);
    let summary = crawl(&base, &test_config(1), Some(&provider), None)
        .await
        .unwrap();

    assert_eq!(requests_for(&server, "/rendered-page").await, 1);
    // Both under-yielding pages escalated to runtime, each in its own
    // browsing context.
    assert_eq!(provider.contexts_opened(), 2);
    assert!(summary
        .records
        .iter()
        .any(|r| r.url.ends_with("/rendered-page") && r.depth == 1));
}

#[tokio::test]
async fn test_mirroring_stores_assets_at_classified_paths() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<html><head><link rel="stylesheet" href="/styles/site.css"></head>
           <body><a href="/about-us">about</a></body></html>"#,
    )
    .await;
    mount_page(&server, "/about-us", "<html><body>about</body></html>").await;
    Mock::given(method("GET"))
        .and(path("/styles/site.css"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("body { margin: 0; }", "text/css"),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut sink = DiskSink::new(dir.path().join("mirror")).await.unwrap();

    let mut config = test_config(1);
    config.crawler.mirror_assets = true;

    let summary = crawl(
        &base,
        &config,
        None,
        Some(&mut sink as &mut dyn ResourceSink),
    )
    .await
    .unwrap();

    let css = dir.path().join("mirror/css/site.css");
    assert_eq!(
        std::fs::read_to_string(&css).unwrap(),
        "body { margin: 0; }"
    );
    assert!(dir.path().join("mirror/index.html").is_file());

    assert_eq!(summary.kind_counts.get(&ResourceKind::Stylesheet), Some(&1));
    assert_eq!(summary.kind_counts.get(&ResourceKind::Html), Some(&2));
}

#[tokio::test]
async fn test_per_depth_cap_truncates() {
    let server = MockServer::start().await;
    let base = server.uri();

    let anchors: String = (0..6)
        .map(|i| format!(r#"<a href="/page-{}">p{}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", &anchors).await;
    for i in 0..6 {
        mount_page(&server, &format!("/page-{}", i), "<html></html>").await;
    }

    let mut config = test_config(1);
    config.crawler.max_urls_per_depth = 3;

    let summary = crawl(&base, &config, None, None).await.unwrap();

    // Seed at depth 0, then exactly three of the six pages.
    assert_eq!(summary.total_fetched, 4);
    assert_eq!(
        summary.records.iter().filter(|r| r.depth == 1).count(),
        3
    );
    // All six were discovered even though only three were fetched.
    assert_eq!(summary.total_discovered, 7);
}

#[tokio::test]
async fn test_summary_metadata() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_page(&server, "/", r#"<a href="/a">a</a>"#).await;
    mount_page(&server, "/a", "<html></html>").await;

    let summary = crawl(&base, &test_config(2), None, None).await.unwrap();

    assert_eq!(summary.max_depth, 2);
    assert!(summary.finished_at >= summary.started_at);
    assert!(summary.base_url.starts_with("http://"));
    let html_count = summary.kind_counts.get(&ResourceKind::Html).copied();
    assert_eq!(html_count, Some(2));
}

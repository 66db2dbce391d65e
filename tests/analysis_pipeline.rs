//! End-to-end pipeline tests against a local mock HTTP server.
//!
//! Pages are served by wiremock; external hosts are simulated with a
//! resolver override on the probe client so no test touches the real
//! network.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use page_audit::storage::{init_db_pool_with_path, run_migrations, AnalysisStore};
use page_audit::{AnalysisError, AnalysisRequest, Analyzer, AnalyzerOptions};

/// Hostname used for links that must classify as external. Resolved to the
/// second mock server via a client-side resolver override.
const EXTERNAL_HOST: &str = "other.test";

struct TestHarness {
    analyzer: Analyzer,
    store: AnalysisStore,
    _db_dir: TempDir,
}

async fn harness(external_addr: Option<&SocketAddr>, probe_timeout: Duration) -> TestHarness {
    let db_dir = TempDir::new().expect("create temp dir");
    let pool = init_db_pool_with_path(&db_dir.path().join("test.db"))
        .await
        .expect("init pool");
    run_migrations(&pool).await.expect("run migrations");
    let store = AnalysisStore::new(pool);

    let mut fetch_builder = reqwest::Client::builder().timeout(Duration::from_secs(10));
    let mut probe_builder = reqwest::Client::builder().timeout(Duration::from_secs(30));
    if let Some(addr) = external_addr {
        fetch_builder = fetch_builder.resolve(EXTERNAL_HOST, *addr);
        probe_builder = probe_builder.resolve(EXTERNAL_HOST, *addr);
    }

    let analyzer = Analyzer::new(
        Arc::new(fetch_builder.build().expect("fetch client")),
        Arc::new(probe_builder.build().expect("probe client")),
        store.clone(),
        AnalyzerOptions {
            probe_concurrency: 4,
            probe_timeout,
        },
    );

    TestHarness {
        analyzer,
        store,
        _db_dir: db_dir,
    }
}

fn request_for(url: &str) -> AnalysisRequest {
    AnalysisRequest {
        url: url.to_string(),
        owner_id: "tester".to_string(),
        debug: false,
    }
}

#[tokio::test]
async fn test_full_pipeline_counts_and_inaccessible_links() {
    let page_server = MockServer::start().await;
    let external_server = MockServer::start().await;
    let external_port = external_server.address().port();

    let body = format!(
        "<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01 Transitional//EN\" \
         \"http://www.w3.org/TR/html4/loose.dtd\">\
         <html><head><title>Fixture Page</title></head><body>\
         <h1>Top</h1><h2>a</h2><h2>b</h2>\
         <a href=\"/about\">About</a>\
         <a href=\"#top\">Back to top</a>\
         <a href=\"\">empty</a>\
         <a href=\"{page}/team\">Team</a>\
         <a href=\"http://{ext}:{port}/ok\">Partner</a>\
         <a href=\"http://{ext}:{port}/missing\">Gone</a>\
         </body></html>",
        page = page_server.uri(),
        ext = EXTERNAL_HOST,
        port = external_port,
    );

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&page_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/team"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&page_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&external_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&external_server)
        .await;

    let h = harness(Some(external_server.address()), Duration::from_secs(5)).await;
    let outcome = h
        .analyzer
        .analyze(&request_for(&page_server.uri()), &CancellationToken::new())
        .await
        .expect("analysis succeeds");
    let result = outcome.result;

    assert_eq!(result.html_version, "HTML 4.01 Transitional");
    assert_eq!(result.page_title, "Fixture Page");
    assert_eq!(result.headings.h1, 1);
    assert_eq!(result.headings.h2, 2);
    assert_eq!(result.headings.total(), 3);

    // /about + /team are internal; the two other.test links are external.
    // Fragment and empty hrefs are not classified at all.
    assert_eq!(result.internal_links, 2);
    assert_eq!(result.external_links, 2);

    // The 404 target is inaccessible but still counted as external.
    assert_eq!(
        result.inaccessible_links,
        vec![format!("http://{EXTERNAL_HOST}:{external_port}/missing")]
    );
    assert!(!result.has_login_form);
    assert!(outcome.raw_body.is_none());
}

#[tokio::test]
async fn test_reanalysis_keeps_identity_and_replaces_content() {
    let page_server = MockServer::start().await;

    let first_body = "<!DOCTYPE html><html><head><title>First</title></head>\
                      <body><h1>v1</h1></body></html>";
    let second_body = "<!DOCTYPE html><html><head><title>Second</title></head>\
                       <body><h2>v2</h2><h2>v2</h2>\
                       <input type='password'></body></html>";

    // First request sees the first body, every later request the second.
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(first_body))
        .up_to_n_times(1)
        .mount(&page_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(second_body))
        .mount(&page_server)
        .await;

    let h = harness(None, Duration::from_secs(5)).await;
    let request = request_for(&page_server.uri());

    let first = h
        .analyzer
        .analyze(&request, &CancellationToken::new())
        .await
        .expect("first run")
        .result;
    let second = h
        .analyzer
        .analyze(&request, &CancellationToken::new())
        .await
        .expect("second run")
        .result;

    // Idempotent identity, non-idempotent content.
    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at >= first.updated_at);
    assert_eq!(first.page_title, "First");
    assert_eq!(second.page_title, "Second");
    assert_eq!(second.headings.h2, 2);
    assert!(!first.has_login_form);
    assert!(second.has_login_form);

    let all = h.store.list_by_owner("tester").await.expect("list");
    assert_eq!(all.len(), 1, "one stored record per (url, owner)");
}

#[tokio::test]
async fn test_non_2xx_page_is_still_analyzed() {
    let page_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500).set_body_string(
            "<!DOCTYPE html><html><head><title>Server Error</title></head>\
             <body><h1>Oops</h1></body></html>",
        ))
        .mount(&page_server)
        .await;

    let h = harness(None, Duration::from_secs(5)).await;
    let result = h
        .analyzer
        .analyze(&request_for(&page_server.uri()), &CancellationToken::new())
        .await
        .expect("error pages are analyzable")
        .result;

    assert_eq!(result.page_title, "Server Error");
    assert_eq!(result.html_version, "HTML5");
    assert_eq!(result.headings.h1, 1);
}

#[tokio::test]
async fn test_debug_mode_returns_raw_body() {
    let page_server = MockServer::start().await;
    let body = "<!DOCTYPE html><html><head><title>Raw</title></head><body></body></html>";
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&page_server)
        .await;

    let h = harness(None, Duration::from_secs(5)).await;
    let mut request = request_for(&page_server.uri());
    request.debug = true;

    let outcome = h
        .analyzer
        .analyze(&request, &CancellationToken::new())
        .await
        .expect("analysis succeeds");
    assert_eq!(outcome.raw_body.as_deref(), Some(body));
}

#[tokio::test]
async fn test_invalid_url_fails_before_any_fetch() {
    let h = harness(None, Duration::from_secs(5)).await;

    for bad in ["not a url", "/relative/path", "ftp://example.com/file"] {
        let err = h
            .analyzer
            .analyze(&request_for(bad), &CancellationToken::new())
            .await
            .expect_err("malformed URL must be rejected");
        assert!(matches!(err, AnalysisError::Input(_)), "url: {bad}");
    }

    assert!(h.store.list_by_owner("tester").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_page_is_fetch_error_and_not_persisted() {
    // Bind a port and drop the listener so connecting is refused.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);

    let h = harness(None, Duration::from_secs(5)).await;
    let url = format!("http://127.0.0.1:{port}/");
    let err = h
        .analyzer
        .analyze(&request_for(&url), &CancellationToken::new())
        .await
        .expect_err("connection refused is a fetch error");
    assert!(matches!(err, AnalysisError::Fetch(_)));
    assert!(h.store.list_by_owner("tester").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_inaccessible_links_preserve_document_order_under_concurrency() {
    let page_server = MockServer::start().await;
    let uri = page_server.uri();

    // slow-fail responds after the fast failures; document order must win.
    let body = format!(
        "<!DOCTYPE html><html><body>\
         <a href=\"{uri}/slow-fail\">a</a>\
         <a href=\"{uri}/fast-ok\">b</a>\
         <a href=\"{uri}/fast-fail\">c</a>\
         <a href=\"{uri}/fail-too\">d</a>\
         </body></html>"
    );

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&page_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/slow-fail"))
        .respond_with(ResponseTemplate::new(503).set_delay(Duration::from_millis(300)))
        .mount(&page_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/fast-ok"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&page_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/fast-fail"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&page_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/fail-too"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&page_server)
        .await;

    let h = harness(None, Duration::from_secs(5)).await;
    let result = h
        .analyzer
        .analyze(&request_for(&uri), &CancellationToken::new())
        .await
        .expect("analysis succeeds")
        .result;

    assert_eq!(
        result.inaccessible_links,
        vec![
            format!("{uri}/slow-fail"),
            format!("{uri}/fast-fail"),
            format!("{uri}/fail-too"),
        ]
    );
}

#[tokio::test]
async fn test_probe_timeout_marks_link_inaccessible() {
    let page_server = MockServer::start().await;
    let uri = page_server.uri();

    let body = format!("<html><body><a href=\"{uri}/hang\">hang</a></body></html>");
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&page_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/hang"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .mount(&page_server)
        .await;

    // Tight per-probe timeout; the analysis itself must still finish.
    let h = harness(None, Duration::from_millis(200)).await;
    let result = h
        .analyzer
        .analyze(&request_for(&uri), &CancellationToken::new())
        .await
        .expect("probe timeout never aborts the analysis")
        .result;

    assert_eq!(result.inaccessible_links, vec![format!("{uri}/hang")]);
    assert_eq!(result.internal_links, 1);
}

#[tokio::test]
async fn test_cancellation_abandons_probes_and_persists_nothing() {
    let page_server = MockServer::start().await;
    let uri = page_server.uri();

    let body = format!(
        "<html><body>\
         <a href=\"{uri}/slow1\">1</a>\
         <a href=\"{uri}/slow2\">2</a>\
         </body></html>"
    );
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&page_server)
        .await;
    for slow in ["/slow1", "/slow2"] {
        Mock::given(method("HEAD"))
            .and(path(slow))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
            .mount(&page_server)
            .await;
    }

    let h = harness(None, Duration::from_secs(60)).await;
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let err = h
        .analyzer
        .analyze(&request_for(&uri), &cancel)
        .await
        .expect_err("cancellation aborts the call");
    assert!(matches!(err, AnalysisError::Cancelled));

    assert!(
        h.store
            .find_by_url_and_owner(&uri, "tester")
            .await
            .expect("lookup")
            .is_none(),
        "a cancelled analysis must not reconcile partial data"
    );
}

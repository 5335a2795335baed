use boilerplate_web::core::page::{BRAND_LABEL, DEMO_TRIGGER_ID, RESULT_CONTAINER_ID};
use boilerplate_web::domain::model::{FailurePolicy, SwapOutcome};
use boilerplate_web::core::binder::BinderOptions;
use boilerplate_web::{Bootstrapper, FetchBinder, HttpFetcher, ShellDocument};
use httpmock::prelude::*;
use std::sync::Arc;

fn binder_for(server: &MockServer) -> FetchBinder {
    let fetcher = HttpFetcher::new(&server.base_url()).unwrap();
    FetchBinder::bootstrap(
        &Bootstrapper::default(),
        ShellDocument::default(),
        Arc::new(fetcher),
    )
    .unwrap()
}

/// 載入頁面 → 檢查品牌文字 → 點擊 Test HTMX → 後端回 pong
#[tokio::test]
async fn test_click_test_htmx_swaps_backend_text() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/hello-htmx");
        then.status(200).body("pong");
    });

    let binder = binder_for(&server);
    let mount = binder.mount().await;
    let navbar_html = mount.render_document();
    assert!(navbar_html.contains(&format!(">{}</a>", BRAND_LABEL)));
    assert_eq!(BRAND_LABEL, "OpenCode Boilerplate Web");

    let outcome = binder.click(DEMO_TRIGGER_ID).await.unwrap();

    api_mock.assert();
    assert!(matches!(outcome, SwapOutcome::Swapped { .. }));
    assert_eq!(binder.text_of(RESULT_CONTAINER_ID).await.unwrap(), "pong");
}

#[tokio::test]
async fn test_result_container_starts_empty_and_unique() {
    let server = MockServer::start();
    let binder = binder_for(&server);
    let mount = binder.mount().await;

    assert_eq!(mount.count_id(RESULT_CONTAINER_ID), 1);
    assert_eq!(mount.inner_html(RESULT_CONTAINER_ID).unwrap(), "");
}

#[tokio::test]
async fn test_each_click_issues_exactly_one_get() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/hello-htmx");
        then.status(200).body("<span>hi</span>");
    });

    let binder = binder_for(&server);
    binder.click(DEMO_TRIGGER_ID).await.unwrap();
    api_mock.assert_hits(1);

    binder.click(DEMO_TRIGGER_ID).await.unwrap();
    api_mock.assert_hits(2);
}

#[tokio::test]
async fn test_fragment_is_swapped_without_escaping() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/hello-htmx");
        then.status(200)
            .header("Content-Type", "text/html")
            .body("<span>hi</span>");
    });

    let binder = binder_for(&server);
    binder.click(DEMO_TRIGGER_ID).await.unwrap();

    assert_eq!(
        binder.inner_html(RESULT_CONTAINER_ID).await.unwrap(),
        "<span>hi</span>"
    );
    let html = binder.mount().await.render_document();
    assert!(html.contains("<div id=\"response\" class=\"mt-4\"><span>hi</span></div>"));
}

#[tokio::test]
async fn test_server_error_keeps_previous_content_by_default() {
    let server = MockServer::start();
    let mut ok_mock = server.mock(|when, then| {
        when.method(GET).path("/api/hello-htmx");
        then.status(200).body("<span>hi</span>");
    });

    let binder = binder_for(&server);
    binder.click(DEMO_TRIGGER_ID).await.unwrap();
    ok_mock.delete();

    let error_mock = server.mock(|when, then| {
        when.method(GET).path("/api/hello-htmx");
        then.status(500).body("<h1>Internal Server Error</h1>");
    });

    let outcome = binder.click(DEMO_TRIGGER_ID).await.unwrap();

    error_mock.assert();
    assert!(matches!(
        outcome,
        SwapOutcome::Failed { rendered: false, ref reason, .. } if reason.contains("500")
    ));
    assert_eq!(
        binder.inner_html(RESULT_CONTAINER_ID).await.unwrap(),
        "<span>hi</span>"
    );
}

#[tokio::test]
async fn test_unreachable_backend_with_message_policy() {
    // 綁定後立即釋放，取得一個沒有人監聽的埠
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let fetcher = HttpFetcher::new(&format!("http://{}", addr)).unwrap();
    let binder = FetchBinder::bootstrap(
        &Bootstrapper::default(),
        ShellDocument::default(),
        Arc::new(fetcher),
    )
    .unwrap()
    .with_options(BinderOptions {
        on_failure: FailurePolicy::Message,
        failure_message: "<p>Backend unavailable</p>".to_string(),
        ..BinderOptions::default()
    });

    let outcome = binder.click(DEMO_TRIGGER_ID).await.unwrap();

    assert!(matches!(outcome, SwapOutcome::Failed { rendered: true, .. }));
    assert_eq!(
        binder.inner_html(RESULT_CONTAINER_ID).await.unwrap(),
        "<p>Backend unavailable</p>"
    );
}

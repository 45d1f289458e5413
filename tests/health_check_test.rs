mod common;

use common::TestApp;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("invalid json");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "dues-service");

    app.cleanup().await;
}

#[tokio::test]
async fn metrics_endpoint_renders_prometheus_text() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/metrics"))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), reqwest::StatusCode::OK);

    app.cleanup().await;
}

#[tokio::test]
async fn tenant_scoped_routes_require_the_tenant_header() {
    let app = TestApp::spawn().await;

    // No X-Tenant-ID header at all
    let response = app
        .client
        .get(app.url("/clients"))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);

    app.cleanup().await;
}

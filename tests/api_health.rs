// tests/api_health.rs

mod common;

use axum::http::StatusCode;

use common::{TestApp, TestAppOptions};
use pitchgenie::services::health::HealthStatus;

#[tokio::test]
async fn healthy_when_every_check_passes() {
    let app = TestApp::new();

    let res = app.get("/api/health", None).await;

    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
    for check in ["database", "ai_service", "stripe", "storage"] {
        assert_eq!(body["checks"][check]["status"], "healthy", "{check}");
        assert!(body["checks"][check]["responseTime"].is_u64());
    }
}

#[tokio::test]
async fn database_outage_returns_503() {
    let app = TestApp::with_options(TestAppOptions { database: HealthStatus::Unhealthy, ..Default::default() });

    let res = app.get("/api/health", None).await;

    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.json()["status"], "unhealthy");
    assert_eq!(res.json()["checks"]["database"]["status"], "unhealthy");
}

#[tokio::test]
async fn missing_ai_key_degrades_the_service() {
    let app = TestApp::with_options(TestAppOptions { ai_configured: false, ..Default::default() });

    let res = app.get("/api/health", None).await;

    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.json()["checks"]["ai_service"]["status"], "degraded");
}

#[tokio::test]
async fn disabled_webhook_is_still_healthy() {
    let app = TestApp::with_options(TestAppOptions { webhook_secret: None, ..Default::default() });

    let res = app.get("/api/health", None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["checks"]["stripe"]["details"]["webhookEnabled"], false);
}

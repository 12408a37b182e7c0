//! Integration tests for the API Server
//!
//! Tests HTTP endpoints, health checks, metrics, and series reads/refreshes.


use serde_json::Value;

use test_utils::TestApiServer;

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "sentiment-gauge");
    assert_eq!(body["series"].as_array().map(|s| s.len()), Some(3));
    assert_eq!(body["stale_series"], serde_json::json!([]));
}

#[tokio::test]
async fn health_degrades_while_a_series_is_stale() {
    let app = TestApiServer::new().await;

    let _ = app.server.post("/api/series/stock/refresh").await;
    let body: Value = app.server.get("/health").await.json();
    assert_eq!(body["status"], "healthy");

    let _ = app
        .server
        .post("/api/series/gold/refresh")
        .expect_failure()
        .await;
    let body: Value = app.server.get("/health").await.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["stale_series"], serde_json::json!(["gold"]));
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new().await;
    let _ = app.server.post("/api/series/crypto/refresh").await;

    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    assert!(body.contains("http_requests_total"));
    assert!(body.contains("http_request_duration_seconds"));
    assert!(body.contains("scoring_passes_total{origin=\"authoritative\",series=\"crypto\"} 1"));
    assert!(body.contains("current_score{series=\"crypto\"} 54"));
}

#[tokio::test]
async fn series_reads_neutral_before_first_commit() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/series/stock").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["series"], "stock");
    assert_eq!(body["score"], 50);
    assert_eq!(body["mood"], "Neutral");
    assert_eq!(body["recent_scores"], serde_json::json!([]));
    assert!(body["last_update"].is_null());
}

#[tokio::test]
async fn refresh_commits_and_read_reflects_it() {
    let app = TestApiServer::new().await;

    let response = app.server.post("/api/series/stock/refresh").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["score"], 54);
    assert_eq!(body["source"], "computed");
    assert_eq!(body["stale"], false);
    assert_eq!(body["sub_scores"]["volatility"], 86);

    let response = app.server.get("/api/series/stock").await;
    let body: Value = response.json();
    assert_eq!(body["score"], 54);
    assert_eq!(body["recent_scores"], serde_json::json!([54]));
    assert!(body["last_update"].is_string());
    assert_eq!(body["delta"]["current"], 54);
}

#[tokio::test]
async fn refresh_accepts_calibration_override() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/series/stock/refresh")
        .add_query_param("calibration", 1.0)
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["score"], 63);
    assert_eq!(body["calibration_factor"], 1.0);
}

#[tokio::test]
async fn refresh_rejects_invalid_calibration() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/series/stock/refresh")
        .add_query_param("calibration", 2.5)
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn exhausted_refresh_returns_stale_last_known_score() {
    let app = TestApiServer::new().await;
    app.store.commit("gold", 33.0).await.unwrap();

    let response = app
        .server
        .post("/api/series/gold/refresh")
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), 503);

    let body: Value = response.json();
    assert_eq!(body["score"], 33);
    assert_eq!(body["stale"], true);
    assert_eq!(body["mood"], "Fear");
}

#[tokio::test]
async fn unknown_series_is_not_found() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/series/silver").expect_failure().await;
    assert_eq!(response.status_code(), 404);

    let response = app
        .server
        .post("/api/series/silver/refresh")
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), 404);
}

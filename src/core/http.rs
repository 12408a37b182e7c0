//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::core::pipeline::ScorePipeline;
use crate::error::EngineError;
use crate::metrics::Metrics;
use crate::models::Mood;
use crate::scoring::Calibration;

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub pipeline: Arc<ScorePipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<ScorePipeline>, metrics: Arc<Metrics>) -> Self {
        Self {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics,
            start_time: Arc::new(Instant::now()),
            pipeline,
        }
    }
}

/// Degraded while any series' latest refresh exhausted every source
#[derive(Clone, Debug, Default)]
pub struct HealthStatus {
    pub stale_series: BTreeSet<String>,
}

impl HealthStatus {
    pub fn status(&self) -> &'static str {
        if self.stale_series.is_empty() {
            "healthy"
        } else {
            "degraded"
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status(),
        "uptime_seconds": uptime_seconds,
        "service": "sentiment-gauge",
        "series": state.pipeline.series_names(),
        "stale_series": health.stale_series,
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
struct RefreshQuery {
    /// Calibration factor overriding the series setting for this pass
    calibration: Option<f64>,
}

/// Current score, history and last change for a series
async fn get_series(
    State(state): State<AppState>,
    Path(series): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    if !state.pipeline.has_series(&series) {
        return Err(StatusCode::NOT_FOUND);
    }

    let current = state
        .pipeline
        .engine()
        .store()
        .get(&series)
        .await
        .map_err(|e| {
            error!(error = %e, series = %series, "Failed to load series");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let score = current.current_score();
    Ok(Json(json!({
        "series": series,
        "score": score,
        "mood": Mood::from_score(score).label(),
        "recent_scores": current.recent_scores(),
        "last_update": current.last_update,
        "delta": current.delta(),
    })))
}

/// Run one pass of the cascade for a series
async fn refresh_series(
    State(state): State<AppState>,
    Path(series): Path<String>,
    Query(params): Query<RefreshQuery>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    if !state.pipeline.has_series(&series) {
        return Err(StatusCode::NOT_FOUND);
    }

    let calibration = params
        .calibration
        .map(Calibration::new)
        .transpose()
        .map_err(|_| StatusCode::BAD_REQUEST)?;

    let result = state.pipeline.run_with(&series, calibration).await;
    match &result {
        Ok(_) => {
            state.health.write().await.stale_series.remove(&series);
        }
        Err(EngineError::AllSourcesExhausted { .. }) => {
            state.health.write().await.stale_series.insert(series.clone());
        }
        Err(_) => {}
    }

    match result {
        Ok(report) => Ok((
            StatusCode::OK,
            Json(json!({
                "series": report.series,
                "score": report.score(),
                "mood": report.composite.mood.label(),
                "source": report.source,
                "origin": report.composite.origin,
                "sub_scores": report.composite.sub_scores,
                "unavailable": report.composite.unavailable,
                "calibration_factor": report.composite.calibration_factor,
                "warning": report.warning,
                "stale": false,
            })),
        )),
        Err(EngineError::AllSourcesExhausted { series, last_known }) => Ok((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "series": series,
                "score": last_known,
                "mood": Mood::from_score(last_known).label(),
                "stale": true,
                "error": "all score sources exhausted",
            })),
        )),
        Err(e) => {
            error!(error = %e, series = %series, "Scoring pass failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/series/{series}", get(get_series))
        .route("/api/series/{series}/refresh", post(refresh_series))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(
    port: u16,
    pipeline: Arc<ScorePipeline>,
    metrics: Arc<Metrics>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let state = AppState::new(pipeline, metrics);
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}

//! Sentiment Gauge API Server
//!
//! HTTP API with health check, metrics, per-series score reads and
//! on-demand refresh passes.

use dotenvy::dotenv;
use sentiment_gauge::core::{bootstrap::pipeline_from_env, http::start_server};
use sentiment_gauge::logging;
use sentiment_gauge::metrics::Metrics;
use std::env;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let env = sentiment_gauge::config::get_environment();
    info!("Starting Sentiment Gauge API Server");
    info!(environment = %env, "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let metrics = Arc::new(Metrics::new()?);
    let pipeline = Arc::new(pipeline_from_env(Some(metrics.clone())).await?);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, pipeline, metrics).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}

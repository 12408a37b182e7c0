//! Wire the store, engine and per-series sources from the environment

use std::sync::Arc;

use tracing::info;

use crate::config::{self, EngineConfig, CRYPTO_SERIES, STOCK_SERIES};
use crate::core::pipeline::{ScorePipeline, SeriesSources};
use crate::metrics::Metrics;
use crate::scoring::ScoringEngine;
use crate::sources::{
    CachedCompositeSource, CompositeFormat, HttpCompositeSource, HttpSnapshotSource, JsonFileFeed,
};
use crate::store::{self, SeriesStore};

pub type BootstrapError = Box<dyn std::error::Error + Send + Sync>;

/// Sources for one series.
///
/// `crypto` answers from its index only. `stock` and any other series use the
/// stock index when configured, then local readings, then the daily snapshot.
pub fn sources_for(series: &str, config: &EngineConfig) -> Result<SeriesSources, BootstrapError> {
    let mut sources = SeriesSources::new();

    if series == CRYPTO_SERIES {
        let url = config::get_crypto_index_url();
        config::validate_url(&url)?;
        let index = HttpCompositeSource::new(
            "crypto-index",
            url,
            CompositeFormat::AlternativeMe,
            config.fetch_timeout,
        )?;
        return Ok(sources.with_authoritative(CachedCompositeSource::new(
            Arc::new(index),
            config.min_refetch_interval,
        )));
    }

    if series == STOCK_SERIES {
        if let Some((url, key, host)) = config::get_stock_index() {
            config::validate_url(&url)?;
            let index = HttpCompositeSource::new(
                "stock-index",
                url,
                CompositeFormat::CnnGraph,
                config.fetch_timeout,
            )?
            .with_api_credentials(key, host);
            sources = sources.with_authoritative(CachedCompositeSource::new(
                Arc::new(index),
                config.min_refetch_interval,
            ));
        }
    }

    if let Some(path) = config::get_readings_path() {
        sources = sources.with_indicators(Arc::new(JsonFileFeed::new(path)));
    }

    if let Some(url) = config::get_snapshot_url() {
        config::validate_url(&url)?;
        sources = sources.with_snapshot(Arc::new(HttpSnapshotSource::new(url, config.fetch_timeout)?));
    }

    Ok(sources)
}

/// Build the full pipeline for every configured series
pub async fn pipeline_from_env(metrics: Option<Arc<Metrics>>) -> Result<ScorePipeline, BootstrapError> {
    let config = EngineConfig::from_env()?;
    let backend = store::backend_from_env().await?;
    let store = Arc::new(SeriesStore::with_capacity(backend, config.history_capacity));
    let engine = Arc::new(ScoringEngine::new(store, config.clone())?);

    let mut pipeline = ScorePipeline::new(engine);
    if let Some(metrics) = metrics {
        pipeline = pipeline.with_metrics(metrics);
    }

    for name in config.series.keys() {
        let sources = sources_for(name, &config)?;
        info!(
            series = %name,
            authoritative = sources.authoritative.is_some(),
            indicators = sources.indicators.is_some(),
            snapshot = sources.snapshot.is_some(),
            calibration = ?config.series_config(name).calibration.map(|c| c.factor()),
            "Configured series"
        );
        pipeline = pipeline.with_series(name.clone(), sources);
    }

    Ok(pipeline)
}

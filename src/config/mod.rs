//! Configuration loaded from environment variables (`.env` supported by the binaries)

use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

use crate::error::ConfigError;
use crate::scoring::calibration::Calibration;
use crate::scoring::weights::IndicatorWeights;

pub const STOCK_SERIES: &str = "stock";
pub const CRYPTO_SERIES: &str = "crypto";

pub const DEFAULT_STOCK_CALIBRATION: f64 = 0.33;
pub const DEFAULT_MIN_REFETCH_SECONDS: u64 = 15 * 60;
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_STATE_PATH: &str = "sentiment_state.json";
pub const DEFAULT_CRYPTO_INDEX_URL: &str = "https://api.alternative.me/fng/";

/// Deployment environment (`production`, `sandbox`, ...)
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

/// Redis connection string, if a Redis-backed store is configured
pub fn get_redis_url() -> Option<String> {
    env::var("REDIS_URL").ok().filter(|url| !url.is_empty())
}

/// Path of the JSON state file used when Redis is not configured
pub fn get_state_path() -> String {
    env::var("STATE_PATH").unwrap_or_else(|_| DEFAULT_STATE_PATH.to_string())
}

/// URL of the published daily aggregate document
pub fn get_snapshot_url() -> Option<String> {
    env::var("SNAPSHOT_URL").ok().filter(|url| !url.is_empty())
}

/// URL of the authoritative stock index, with optional RapidAPI-style credentials
pub fn get_stock_index() -> Option<(String, Option<String>, Option<String>)> {
    let url = env::var("STOCK_INDEX_URL").ok().filter(|url| !url.is_empty())?;
    let key = env::var("STOCK_INDEX_API_KEY").ok().filter(|v| !v.is_empty());
    let host = env::var("STOCK_INDEX_API_HOST").ok().filter(|v| !v.is_empty());
    Some((url, key, host))
}

pub fn get_crypto_index_url() -> String {
    env::var("CRYPTO_INDEX_URL").unwrap_or_else(|_| DEFAULT_CRYPTO_INDEX_URL.to_string())
}

/// Optional JSON file of raw indicator readings used for local recomputation
pub fn get_readings_path() -> Option<String> {
    env::var("READINGS_PATH").ok().filter(|p| !p.is_empty())
}

/// Series to score, comma separated
pub fn get_series_names() -> Vec<String> {
    env::var("SERIES")
        .unwrap_or_else(|_| format!("{},{}", STOCK_SERIES, CRYPTO_SERIES))
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Validate that a configured URL parses
pub fn validate_url(raw: &str) -> Result<url::Url, ConfigError> {
    url::Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Per-series settings
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesConfig {
    pub name: String,
    /// Applied to locally computed scores only; `None` leaves them untouched.
    pub calibration: Option<Calibration>,
}

impl SeriesConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calibration: None,
        }
    }

    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = Some(calibration);
        self
    }
}

/// Engine-wide configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub weights: IndicatorWeights,
    pub series: BTreeMap<String, SeriesConfig>,
    pub history_capacity: usize,
    pub min_refetch_interval: Duration,
    pub fetch_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let mut series = BTreeMap::new();
        series.insert(
            STOCK_SERIES.to_string(),
            SeriesConfig::new(STOCK_SERIES)
                .with_calibration(Calibration::stock_default()),
        );
        series.insert(CRYPTO_SERIES.to_string(), SeriesConfig::new(CRYPTO_SERIES));

        Self {
            weights: IndicatorWeights::default(),
            series,
            history_capacity: crate::models::series::DEFAULT_HISTORY_CAPACITY,
            min_refetch_interval: Duration::from_secs(DEFAULT_MIN_REFETCH_SECONDS),
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
        }
    }
}

impl EngineConfig {
    /// Build configuration from the environment, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(factor) = parse_env::<f64>("STOCK_CALIBRATION_FACTOR")? {
            let calibration = Calibration::new(factor)?;
            config
                .series
                .entry(STOCK_SERIES.to_string())
                .or_insert_with(|| SeriesConfig::new(STOCK_SERIES))
                .calibration = Some(calibration);
        }

        if let Some(seconds) = parse_env::<u64>("MIN_REFETCH_SECONDS")? {
            config.min_refetch_interval = Duration::from_secs(seconds);
        }

        if let Some(millis) = parse_env::<u64>("FETCH_TIMEOUT_MS")? {
            if millis == 0 {
                return Err(ConfigError::InvalidValue {
                    name: "FETCH_TIMEOUT_MS".to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
            config.fetch_timeout = Duration::from_millis(millis);
        }

        for name in get_series_names() {
            config
                .series
                .entry(name.clone())
                .or_insert_with(|| SeriesConfig::new(name));
        }

        config.weights.validate()?;
        Ok(config)
    }

    /// Settings for a series; unknown series get an uncalibrated default
    pub fn series_config(&self, series: &str) -> SeriesConfig {
        self.series
            .get(series)
            .cloned()
            .unwrap_or_else(|| SeriesConfig::new(series))
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse::<T>()
                .map(Some)
                .map_err(|e| ConfigError::InvalidValue {
                    name: name.to_string(),
                    reason: e.to_string(),
                })
        }
        _ => Ok(None),
    }
}

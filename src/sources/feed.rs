//! Indicator feeds over pre-computed raw readings

use std::path::PathBuf;

use async_trait::async_trait;

use super::IndicatorFeed;
use crate::error::SourceError;
use crate::models::{IndicatorKind, IndicatorReadings};

/// Fixed readings, e.g. from a caller that already fetched its inputs
pub struct StaticFeed {
    readings: IndicatorReadings,
}

impl StaticFeed {
    pub fn new(readings: IndicatorReadings) -> Self {
        Self { readings }
    }
}

#[async_trait]
impl IndicatorFeed for StaticFeed {
    async fn fetch(&self, kind: IndicatorKind) -> Result<f64, SourceError> {
        self.readings
            .get(kind)
            .value()
            .ok_or_else(|| SourceError::Unavailable(kind.key().to_string()))
    }
}

/// Readings from a JSON object keyed by indicator (`{"volatility": 15.0, "momentum": null}`),
/// re-read on every fetch so an external collector can refresh it in place.
pub struct JsonFileFeed {
    path: PathBuf,
}

impl JsonFileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn load(&self) -> Result<IndicatorReadings, SourceError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| SourceError::Unavailable(format!("{}: {}", self.path.display(), e)))?;
        serde_json::from_slice(&bytes).map_err(|e| SourceError::Parse(e.to_string()))
    }
}

#[async_trait]
impl IndicatorFeed for JsonFileFeed {
    async fn fetch(&self, kind: IndicatorKind) -> Result<f64, SourceError> {
        self.load()
            .await?
            .get(kind)
            .value()
            .ok_or_else(|| SourceError::Unavailable(kind.key().to_string()))
    }
}

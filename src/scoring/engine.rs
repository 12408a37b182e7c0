//! Normalize, aggregate, calibrate and commit one scoring pass

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{ConfigError, StoreError};
use crate::indicators::normalize_all;
use crate::models::{
    CompositeScore, IndicatorKind, IndicatorReadings, ScoreOrigin, ScoreWarning, SubScore,
};
use crate::scoring::aggregation::Aggregator;
use crate::scoring::calibration::Calibration;
use crate::store::{CommitOutcome, SeriesStore};

/// A composite after the commit policy ran, plus any soft warning
#[derive(Debug, Clone, PartialEq)]
pub struct CommitResult {
    pub composite: CompositeScore,
    pub warning: Option<ScoreWarning>,
}

pub struct ScoringEngine {
    store: Arc<SeriesStore>,
    config: EngineConfig,
}

impl ScoringEngine {
    pub fn new(store: Arc<SeriesStore>, config: EngineConfig) -> Result<Self, ConfigError> {
        config.weights.validate()?;
        Ok(Self { store, config })
    }

    pub fn store(&self) -> &Arc<SeriesStore> {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Calibration for `series`; an explicit override wins over the series setting
    pub fn calibration_for(
        &self,
        series: &str,
        calibration_override: Option<Calibration>,
    ) -> Option<Calibration> {
        calibration_override.or_else(|| self.config.series_config(series).calibration)
    }

    /// Normalize and aggregate raw readings without touching any series
    pub fn compose(&self, readings: &IndicatorReadings) -> CompositeScore {
        self.compose_sub_scores(normalize_all(readings), ScoreOrigin::Computed)
    }

    /// Aggregate already-normalized sub-scores; absent kinds count as unavailable
    pub fn compose_sub_scores(
        &self,
        sub_scores: BTreeMap<IndicatorKind, SubScore>,
        origin: ScoreOrigin,
    ) -> CompositeScore {
        let raw = Aggregator::aggregate(&sub_scores, &self.config.weights);

        if tracing::enabled!(tracing::Level::DEBUG) {
            let contributions = Aggregator::contributions(&sub_scores, &self.config.weights);
            for driver in Aggregator::top_drivers(&contributions, 3) {
                debug!(
                    indicator = %driver.kind,
                    sub_score = driver.sub_score.value(),
                    weight = driver.weight,
                    "Score driver"
                );
            }
        }

        let unavailable = IndicatorKind::ALL
            .iter()
            .copied()
            .filter(|kind| !sub_scores.contains_key(kind))
            .collect();

        let mut composite = CompositeScore::new(raw, origin);
        composite.raw_score = Some(raw);
        composite.sub_scores = sub_scores;
        composite.unavailable = unavailable;
        composite
    }

    /// Apply calibration to a locally computed composite
    pub fn calibrate(&self, composite: CompositeScore, calibration: Option<Calibration>) -> CompositeScore {
        match calibration {
            Some(calibration) => {
                let origin = composite.origin;
                let calibrated = calibration.apply(composite.final_score);
                let mut composite = composite.with_final_score(calibrated, origin);
                composite.calibration_factor = Some(calibration.factor());
                composite
            }
            None => composite,
        }
    }

    /// Full local pass: normalize, aggregate, calibrate, commit.
    ///
    /// The returned composite's `final_score` is the series' current score
    /// after the commit, and its origin is `Previous` if nothing was appended.
    pub async fn score(
        &self,
        series: &str,
        readings: &IndicatorReadings,
        calibration_override: Option<Calibration>,
    ) -> Result<CompositeScore, StoreError> {
        let composite = self.compose(readings);
        let composite = self.calibrate(composite, self.calibration_for(series, calibration_override));
        let candidate = f64::from(composite.final_score);
        Ok(self.commit(series, composite, candidate).await?.composite)
    }

    /// Offer `candidate` to the series and fold the outcome into `composite`
    pub async fn commit(
        &self,
        series: &str,
        composite: CompositeScore,
        candidate: f64,
    ) -> Result<CommitResult, StoreError> {
        let origin = composite.origin;
        match self.store.commit(series, candidate).await? {
            CommitOutcome::Committed(state) => Ok(CommitResult {
                composite: composite.with_final_score(state.current_score(), origin),
                warning: None,
            }),
            CommitOutcome::Rejected { attempted, series } => Ok(CommitResult {
                composite: composite
                    .with_final_score(series.current_score(), ScoreOrigin::Previous),
                warning: Some(ScoreWarning::InvalidScore { attempted }),
            }),
        }
    }
}

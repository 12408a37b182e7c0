//! Fallback cascade producing one committed score per pass
//!
//! Tiers, first success wins:
//! 1. authoritative composite (fresh, or cached within the refetch interval)
//! 2. last cached authoritative composite when the refetch failed or returned
//!    an out-of-range score
//! 3. local recomputation from raw indicators
//! 4. published daily snapshot
//!
//! When every tier fails the persisted score is left untouched and the pass
//! reports `EngineError::AllSourcesExhausted`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::error::{EngineError, StoreError};
use crate::metrics::Metrics;
use crate::models::{
    CompositeScore, IndicatorKind, ScoreOrigin, ScoreReport, ScoreWarning, SubScore,
};
use crate::scoring::{inspect_snapshot, Calibration, ScoringEngine};
use crate::sources::{collect_readings, CachedCompositeSource, IndicatorFeed, SnapshotSource};
use crate::store::validate_score;

/// Sources consulted for one series, in cascade order
#[derive(Default)]
pub struct SeriesSources {
    pub authoritative: Option<CachedCompositeSource>,
    pub indicators: Option<Arc<dyn IndicatorFeed>>,
    pub snapshot: Option<Arc<dyn SnapshotSource>>,
}

impl SeriesSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_authoritative(mut self, source: CachedCompositeSource) -> Self {
        self.authoritative = Some(source);
        self
    }

    pub fn with_indicators(mut self, feed: Arc<dyn IndicatorFeed>) -> Self {
        self.indicators = Some(feed);
        self
    }

    pub fn with_snapshot(mut self, source: Arc<dyn SnapshotSource>) -> Self {
        self.snapshot = Some(source);
        self
    }
}

/// Candidate produced by a tier, before the commit policy
struct Candidate {
    composite: CompositeScore,
    value: f64,
    /// Set when a higher tier answered with a score the commit policy rejects
    warning: Option<ScoreWarning>,
}

pub struct ScorePipeline {
    engine: Arc<ScoringEngine>,
    series: BTreeMap<String, SeriesSources>,
    metrics: Option<Arc<Metrics>>,
}

impl ScorePipeline {
    pub fn new(engine: Arc<ScoringEngine>) -> Self {
        Self {
            engine,
            series: BTreeMap::new(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_series(mut self, name: impl Into<String>, sources: SeriesSources) -> Self {
        self.series.insert(name.into(), sources);
        self
    }

    pub fn engine(&self) -> &Arc<ScoringEngine> {
        &self.engine
    }

    pub fn has_series(&self, series: &str) -> bool {
        self.series.contains_key(series)
    }

    pub fn series_names(&self) -> Vec<String> {
        self.series.keys().cloned().collect()
    }

    pub async fn run(&self, series: &str) -> Result<ScoreReport, EngineError> {
        self.run_with(series, None).await
    }

    /// One pass through the cascade followed by the commit step
    pub async fn run_with(
        &self,
        series: &str,
        calibration_override: Option<Calibration>,
    ) -> Result<ScoreReport, EngineError> {
        let started = Instant::now();
        let calibration = self.engine.calibration_for(series, calibration_override);

        let candidate = match self.series.get(series) {
            Some(sources) => self.resolve(series, sources, calibration).await,
            None => {
                warn!(series = %series, "No sources configured for series");
                None
            }
        };

        let Some(Candidate {
            composite,
            value,
            warning: tier_warning,
        }) = candidate
        else {
            return Err(self.exhausted(series).await?);
        };

        let source = composite.origin;
        let committed = self.engine.commit(series, composite, value).await?;
        let warning = committed.warning.or(tier_warning);

        if let Some(metrics) = &self.metrics {
            metrics
                .scoring_passes_total
                .with_label_values(&[series, committed.composite.origin.as_str()])
                .inc();
            if warning.is_some() {
                metrics
                    .score_commits_rejected_total
                    .with_label_values(&[series])
                    .inc();
            }
            metrics
                .current_score
                .with_label_values(&[series])
                .set(i64::from(committed.composite.final_score));
            metrics
                .scoring_pass_duration_seconds
                .observe(started.elapsed().as_secs_f64());
        }

        info!(
            series = %series,
            source = source.as_str(),
            score = committed.composite.final_score,
            mood = committed.composite.mood.label(),
            "Scoring pass complete"
        );

        Ok(ScoreReport {
            series: series.to_string(),
            source,
            composite: committed.composite,
            warning,
        })
    }

    async fn exhausted(&self, series: &str) -> Result<EngineError, StoreError> {
        let last_known = self.engine.store().current_score(series).await?;
        if let Some(metrics) = &self.metrics {
            metrics
                .sources_exhausted_total
                .with_label_values(&[series])
                .inc();
        }
        warn!(series = %series, last_known = last_known, "All score sources exhausted, keeping last known score");
        Ok(EngineError::AllSourcesExhausted {
            series: series.to_string(),
            last_known,
        })
    }

    async fn resolve(
        &self,
        series: &str,
        sources: &SeriesSources,
        calibration: Option<Calibration>,
    ) -> Option<Candidate> {
        let mut warning = None;

        if let Some(authoritative) = &sources.authoritative {
            match authoritative.get().await {
                Ok(cached) if validate_score(cached.value()).is_some() => {
                    let value = cached.value();
                    return Some(Candidate {
                        composite: CompositeScore::new(SubScore::from_f64(value).value(), cached.origin()),
                        value,
                        warning: None,
                    });
                }
                Ok(cached) => {
                    let attempted = cached.value();
                    warn!(series = %series, source = %authoritative.name(), attempted = attempted, "Authoritative score out of range, falling back");
                    warning = Some(ScoreWarning::InvalidScore { attempted });

                    if let Some(value) = authoritative.cached_value().await {
                        return Some(Candidate {
                            composite: CompositeScore::new(
                                SubScore::from_f64(value).value(),
                                ScoreOrigin::CachedAuthoritative,
                            ),
                            value,
                            warning,
                        });
                    }
                }
                Err(e) => {
                    warn!(series = %series, source = %authoritative.name(), error = %e, "Authoritative score unavailable, falling back");
                }
            }
        }

        if let Some(feed) = &sources.indicators {
            let readings = collect_readings(
                feed.as_ref(),
                &IndicatorKind::ALL,
                self.engine.config().fetch_timeout,
                self.metrics.as_deref(),
            )
            .await;

            if readings.available_count() > 0 {
                let composite = self.engine.calibrate(self.engine.compose(&readings), calibration);
                let value = f64::from(composite.final_score);
                return Some(Candidate {
                    composite,
                    value,
                    warning,
                });
            }
            warn!(series = %series, "Every indicator fetch failed, falling back");
        }

        if let Some(snapshot_source) = &sources.snapshot {
            match snapshot_source.fetch_snapshot().await {
                Ok(snapshot) => {
                    let sub_scores = snapshot.scores.sub_scores();
                    if !sub_scores.is_empty() {
                        let composite = self
                            .engine
                            .compose_sub_scores(sub_scores, ScoreOrigin::DailySnapshot);
                        inspect_snapshot(&snapshot, composite.final_score);
                        let composite = self.engine.calibrate(composite, calibration);
                        let value = f64::from(composite.final_score);
                        return Some(Candidate {
                            composite,
                            value,
                            warning,
                        });
                    }
                    warn!(series = %series, "Daily snapshot carries no usable sub-scores");
                }
                Err(e) => {
                    warn!(series = %series, error = %e, "Daily snapshot unavailable");
                }
            }
        }

        // No lower tier answered: the commit policy rejects the out-of-range
        // value and the pass keeps the previous score.
        match warning {
            Some(ScoreWarning::InvalidScore { attempted }) => Some(Candidate {
                composite: CompositeScore::new(
                    SubScore::from_f64(attempted).value(),
                    ScoreOrigin::Authoritative,
                ),
                value: attempted,
                warning: None,
            }),
            None => None,
        }
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::{codec, KeyValueBackend};
use crate::error::StoreError;
use crate::models::{MarketSeries, SeriesDelta, DEFAULT_HISTORY_CAPACITY};

/// Result of offering a candidate score to a series
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// Appended; the series as persisted after the append
    Committed(MarketSeries),
    /// Discarded; the series is unchanged
    Rejected { attempted: f64, series: MarketSeries },
}

impl CommitOutcome {
    pub fn series(&self) -> &MarketSeries {
        match self {
            CommitOutcome::Committed(series) => series,
            CommitOutcome::Rejected { series, .. } => series,
        }
    }

    pub fn current_score(&self) -> u8 {
        self.series().current_score()
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed(_))
    }
}

/// A candidate is committable only as an integer within [0, 100]
pub fn validate_score(candidate: f64) -> Option<u8> {
    if candidate.is_finite() && candidate.fract() == 0.0 && (0.0..=100.0).contains(&candidate) {
        Some(candidate as u8)
    } else {
        None
    }
}

/// Series state over a key-value backend.
///
/// Commits for one series are serialized by a per-series lock; different
/// series never contend. The lock lives in this process only: one writer
/// process per state file or Redis database.
pub struct SeriesStore {
    backend: Arc<dyn KeyValueBackend>,
    capacity: usize,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SeriesStore {
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self::with_capacity(backend, DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(backend: Arc<dyn KeyValueBackend>, capacity: usize) -> Self {
        Self {
            backend,
            capacity: capacity.max(1),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    async fn series_lock(&self, series: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(series.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Persisted state; a series never written reads as empty
    pub async fn get(&self, series: &str) -> Result<MarketSeries, StoreError> {
        let values = self.backend.get_values(&codec::keys(series)).await?;
        Ok(codec::decode(series, &values, self.capacity)?
            .unwrap_or_else(|| MarketSeries::with_capacity(series, self.capacity)))
    }

    /// Last committed score, or 50 before the first commit
    pub async fn current_score(&self, series: &str) -> Result<u8, StoreError> {
        Ok(self.get(series).await?.current_score())
    }

    pub async fn delta(&self, series: &str) -> Result<SeriesDelta, StoreError> {
        Ok(self.get(series).await?.delta())
    }

    pub async fn commit(&self, series: &str, candidate: f64) -> Result<CommitOutcome, StoreError> {
        self.commit_at(series, candidate, Utc::now()).await
    }

    /// Validate and append `candidate` as of `at`.
    ///
    /// An invalid candidate is a soft rejection: nothing is written and the
    /// unchanged series is returned.
    pub async fn commit_at(
        &self,
        series: &str,
        candidate: f64,
        at: DateTime<Utc>,
    ) -> Result<CommitOutcome, StoreError> {
        let lock = self.series_lock(series).await;
        let _guard = lock.lock().await;

        let mut state = self.get(series).await?;
        let Some(score) = validate_score(candidate) else {
            warn!(
                series = %series,
                attempted = candidate,
                current = state.current_score(),
                "Rejected invalid score, keeping previous"
            );
            return Ok(CommitOutcome::Rejected {
                attempted: candidate,
                series: state,
            });
        };

        state.push(score, at);
        self.backend.set_values(codec::encode(&state)).await?;
        info!(series = %series, score = score, history = state.len(), "Committed score");
        Ok(CommitOutcome::Committed(state))
    }
}

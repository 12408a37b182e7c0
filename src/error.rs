//! Error taxonomy for the scoring engine.
//!
//! A missing indicator is not an error at this level: it is carried as
//! `Reading::Unavailable` and resolved by the aggregator. An out-of-range score
//! is a soft outcome of the commit step (`CommitOutcome::Rejected`).

use thiserror::Error;

/// Failure to obtain a value from an external source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("request timed out after {0} ms")]
    Timeout(u64),

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("source unavailable: {0}")]
    Unavailable(String),
}

impl SourceError {
    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            SourceError::Status { status, .. } => *status == 429 || *status >= 500,
            SourceError::Timeout(_) => true,
            SourceError::Parse(_) | SourceError::Unavailable(_) => false,
        }
    }
}

/// Failure reading or writing persisted series state.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("corrupt value at '{key}': {reason}")]
    Corrupt { key: String, reason: String },
}

/// Invalid engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("indicator weights must sum to 1.0, got {sum:.4}")]
    InvalidWeights { sum: f64 },

    #[error("calibration factor must be within (0, 1], got {0}")]
    InvalidCalibration(f64),

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

/// Errors surfaced by a scoring pass.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Every tier of the fallback cascade failed. `last_known` is the
    /// persisted score the caller should keep showing, marked stale.
    #[error("all score sources exhausted for series '{series}' (last known score {last_known})")]
    AllSourcesExhausted { series: String, last_known: u8 },

    #[error("series store error: {0}")]
    Store(#[from] StoreError),
}

//! Persisted per-series state: bounded score history and last update time
//!
//! Commits are read-modify-write under an in-process lock, so only one
//! process may write a given state file or Redis database. Run either
//! `api-server` or scheduled `refresh` passes against it, not both.

pub mod codec;
pub mod file;
pub mod memory;
pub mod redis;
pub mod series_store;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config;
use crate::error::StoreError;

pub use self::file::FileBackend;
pub use self::memory::MemoryBackend;
pub use self::redis::RedisBackend;
pub use self::series_store::{validate_score, CommitOutcome, SeriesStore};

/// Durable key-value storage underneath `SeriesStore`
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// Values for `keys`, in order; `None` for keys never written
    async fn get_values(&self, keys: &[String]) -> Result<Vec<Option<Value>>, StoreError>;

    /// Write all entries as one unit
    async fn set_values(&self, entries: Vec<(String, Value)>) -> Result<(), StoreError>;
}

/// Redis when `REDIS_URL` is set, otherwise the JSON file at `STATE_PATH`
pub async fn backend_from_env() -> Result<Arc<dyn KeyValueBackend>, StoreError> {
    match config::get_redis_url() {
        Some(url) => {
            tracing::info!("Using Redis series store");
            Ok(Arc::new(RedisBackend::connect(&url).await?))
        }
        None => {
            let path = config::get_state_path();
            tracing::info!(path = %path, "Using JSON file series store");
            Ok(Arc::new(FileBackend::new(path)))
        }
    }
}

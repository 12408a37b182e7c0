//! Upstream score and indicator sources feeding the fallback cascade

pub mod cache;
pub mod collect;
pub mod feed;
pub mod http;

use async_trait::async_trait;

use crate::error::SourceError;
use crate::models::{DailySnapshot, IndicatorKind};

pub use cache::{CachedCompositeSource, CachedScore};
pub use collect::collect_readings;
pub use feed::{JsonFileFeed, StaticFeed};
pub use http::{CompositeFormat, HttpCompositeSource, HttpSnapshotSource};

/// An externally published composite score (0-100)
#[async_trait]
pub trait CompositeSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_score(&self) -> Result<f64, SourceError>;
}

/// Raw per-indicator readings for local recomputation
#[async_trait]
pub trait IndicatorFeed: Send + Sync {
    async fn fetch(&self, kind: IndicatorKind) -> Result<f64, SourceError>;
}

/// The published daily aggregate document
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<DailySnapshot, SourceError>;
}

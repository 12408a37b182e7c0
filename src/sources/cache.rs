//! Minimum-refetch cache in front of an authoritative composite source

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::CompositeSource;
use crate::error::SourceError;
use crate::models::ScoreOrigin;
use crate::store::validate_score;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CachedScore {
    /// Fetched during this call
    Fresh(f64),
    /// Served from cache because the refetch interval has not elapsed
    Cached(f64),
    /// Served from cache because the refetch failed
    Stale(f64),
}

impl CachedScore {
    pub fn value(&self) -> f64 {
        match self {
            CachedScore::Fresh(v) | CachedScore::Cached(v) | CachedScore::Stale(v) => *v,
        }
    }

    pub fn origin(&self) -> ScoreOrigin {
        match self {
            CachedScore::Fresh(_) | CachedScore::Cached(_) => ScoreOrigin::Authoritative,
            CachedScore::Stale(_) => ScoreOrigin::CachedAuthoritative,
        }
    }
}

struct CacheEntry {
    value: f64,
    fetched_at: Instant,
}

pub struct CachedCompositeSource {
    inner: Arc<dyn CompositeSource>,
    min_refetch: Duration,
    last: Mutex<Option<CacheEntry>>,
}

impl CachedCompositeSource {
    pub fn new(inner: Arc<dyn CompositeSource>, min_refetch: Duration) -> Self {
        Self {
            inner,
            min_refetch,
            last: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Last cached value regardless of its age
    pub async fn cached_value(&self) -> Option<f64> {
        self.last.lock().await.as_ref().map(|entry| entry.value)
    }

    /// Fresh value when allowed, else the cached one.
    ///
    /// Only values that would pass the commit policy are cached, so an invalid
    /// response is reported once and never replayed.
    pub async fn get(&self) -> Result<CachedScore, SourceError> {
        let mut last = self.last.lock().await;

        if let Some(entry) = last.as_ref() {
            if entry.fetched_at.elapsed() < self.min_refetch {
                debug!(source = %self.name(), value = entry.value, "Within refetch interval, using cached score");
                return Ok(CachedScore::Cached(entry.value));
            }
        }

        match self.inner.fetch_score().await {
            Ok(value) => {
                if validate_score(value).is_some() {
                    *last = Some(CacheEntry {
                        value,
                        fetched_at: Instant::now(),
                    });
                }
                Ok(CachedScore::Fresh(value))
            }
            Err(e) => match last.as_ref() {
                Some(entry) => {
                    warn!(source = %self.name(), error = %e, cached = entry.value, "Refetch failed, serving cached score");
                    Ok(CachedScore::Stale(entry.value))
                }
                None => Err(e),
            },
        }
    }
}

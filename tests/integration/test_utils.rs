//! Fakes and helpers shared by the integration tests

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sentiment_gauge::config::EngineConfig;
use sentiment_gauge::core::pipeline::{ScorePipeline, SeriesSources};
use sentiment_gauge::error::SourceError;
use sentiment_gauge::metrics::Metrics;
use sentiment_gauge::models::{DailySnapshot, IndicatorKind};
use sentiment_gauge::scoring::ScoringEngine;
use sentiment_gauge::sources::{CompositeSource, IndicatorFeed, SnapshotSource};
use sentiment_gauge::store::{MemoryBackend, SeriesStore};

/// Authoritative source answering from a scripted queue
pub struct FakeComposite {
    responses: Mutex<VecDeque<Result<f64, SourceError>>>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeComposite {
    pub fn new(responses: Vec<Result<f64, SourceError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompositeSource for FakeComposite {
    fn name(&self) -> &str {
        "fake-index"
    }

    async fn fetch_score(&self) -> Result<f64, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SourceError::Unavailable("no scripted response".into())))
    }
}

/// Indicator feed over fixed values; `slow` kinds never answer in time
#[derive(Default)]
pub struct FakeFeed {
    values: HashMap<IndicatorKind, f64>,
    slow: HashSet<IndicatorKind>,
}

#[allow(dead_code)]
impl FakeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: IndicatorKind, value: f64) -> Self {
        self.values.insert(kind, value);
        self
    }

    pub fn slow(mut self, kind: IndicatorKind, value: f64) -> Self {
        self.values.insert(kind, value);
        self.slow.insert(kind);
        self
    }

    /// Volatility 15, Momentum +0.05, Put/Call 0.85
    pub fn three_indicators() -> Self {
        Self::new()
            .with(IndicatorKind::Volatility, 15.0)
            .with(IndicatorKind::Momentum, 0.05)
            .with(IndicatorKind::PutCall, 0.85)
    }
}

#[async_trait]
impl IndicatorFeed for FakeFeed {
    async fn fetch(&self, kind: IndicatorKind) -> Result<f64, SourceError> {
        if self.slow.contains(&kind) {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        self.values
            .get(&kind)
            .copied()
            .ok_or_else(|| SourceError::Unavailable(kind.key().to_string()))
    }
}

pub struct FakeSnapshot {
    snapshot: Option<DailySnapshot>,
}

#[allow(dead_code)]
impl FakeSnapshot {
    pub fn new(snapshot: DailySnapshot) -> Arc<Self> {
        Arc::new(Self {
            snapshot: Some(snapshot),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { snapshot: None })
    }
}

#[async_trait]
impl SnapshotSource for FakeSnapshot {
    async fn fetch_snapshot(&self) -> Result<DailySnapshot, SourceError> {
        self.snapshot
            .clone()
            .ok_or_else(|| SourceError::Status {
                status: 503,
                url: "fake://snapshot".into(),
            })
    }
}

/// Engine over an in-memory store
#[allow(dead_code)]
pub struct TestEngine {
    pub engine: Arc<ScoringEngine>,
    pub store: Arc<SeriesStore>,
    pub backend: Arc<MemoryBackend>,
    pub metrics: Arc<Metrics>,
}

#[allow(dead_code)]
impl TestEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let store = Arc::new(SeriesStore::with_capacity(
            backend.clone(),
            config.history_capacity,
        ));
        let engine = Arc::new(ScoringEngine::new(store.clone(), config).expect("valid config"));
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        Self {
            engine,
            store,
            backend,
            metrics,
        }
    }

    pub fn pipeline(&self, series: Vec<(&str, SeriesSources)>) -> ScorePipeline {
        series.into_iter().fold(
            ScorePipeline::new(self.engine.clone()).with_metrics(self.metrics.clone()),
            |pipeline, (name, sources)| pipeline.with_series(name, sources),
        )
    }
}

/// Unique path under the system temp dir
#[allow(dead_code)]
pub fn temp_path(label: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir().join(format!(
        "sentiment-gauge-{}-{}-{}-{}.json",
        label,
        std::process::id(),
        nanos,
        n
    ))
}

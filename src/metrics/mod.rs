//! Prometheus metrics for scoring passes and the HTTP surface

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub scoring_passes_total: IntCounterVec,
    pub score_commits_rejected_total: IntCounterVec,
    pub indicator_fetch_failures_total: IntCounterVec,
    pub sources_exhausted_total: IntCounterVec,
    pub current_score: IntGaugeVec,
    pub scoring_pass_duration_seconds: Histogram,
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let scoring_passes_total = IntCounterVec::new(
            Opts::new(
                "scoring_passes_total",
                "Completed scoring passes by series and answering source",
            ),
            &["series", "origin"],
        )?;
        let score_commits_rejected_total = IntCounterVec::new(
            Opts::new(
                "score_commits_rejected_total",
                "Scores rejected by the commit policy",
            ),
            &["series"],
        )?;
        let indicator_fetch_failures_total = IntCounterVec::new(
            Opts::new(
                "indicator_fetch_failures_total",
                "Indicator fetches that failed or timed out",
            ),
            &["indicator"],
        )?;
        let sources_exhausted_total = IntCounterVec::new(
            Opts::new(
                "sources_exhausted_total",
                "Scoring passes where every fallback tier failed",
            ),
            &["series"],
        )?;
        let current_score = IntGaugeVec::new(
            Opts::new("current_score", "Current committed score per series"),
            &["series"],
        )?;
        let scoring_pass_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "scoring_pass_duration_seconds",
            "Wall-clock duration of a scoring pass",
        ))?;
        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests served")?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently in flight")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency",
        ))?;

        registry.register(Box::new(scoring_passes_total.clone()))?;
        registry.register(Box::new(score_commits_rejected_total.clone()))?;
        registry.register(Box::new(indicator_fetch_failures_total.clone()))?;
        registry.register(Box::new(sources_exhausted_total.clone()))?;
        registry.register(Box::new(current_score.clone()))?;
        registry.register(Box::new(scoring_pass_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            scoring_passes_total,
            score_commits_rejected_total,
            indicator_fetch_failures_total,
            sources_exhausted_total,
            current_score,
            scoring_pass_duration_seconds,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
        })
    }

    /// Render all registered metrics in the Prometheus text format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

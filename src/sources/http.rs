//! reqwest adapters for the authoritative indexes and the daily snapshot

use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use serde_json::Value;
use tracing::warn;

use super::{CompositeSource, SnapshotSource};
use crate::error::SourceError;
use crate::models::DailySnapshot;

pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Wire format of an authoritative composite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeFormat {
    /// `{"data":[{"value":"54","value_classification":"Neutral"}]}`
    AlternativeMe,
    /// `{"fear_and_greed":{"score":61.3,"rating":"greed"}}`; rounded on parse
    CnnGraph,
}

/// Extract the composite score from a response body
pub fn parse_composite(format: CompositeFormat, body: &Value) -> Result<f64, SourceError> {
    match format {
        CompositeFormat::AlternativeMe => {
            let value = body
                .pointer("/data/0/value")
                .ok_or_else(|| SourceError::Parse("missing data[0].value".to_string()))?;
            match value {
                Value::String(raw) => raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| SourceError::Parse(format!("value '{}': {}", raw, e))),
                Value::Number(n) => n
                    .as_f64()
                    .ok_or_else(|| SourceError::Parse(format!("value {}", n))),
                other => Err(SourceError::Parse(format!("unexpected value {}", other))),
            }
        }
        CompositeFormat::CnnGraph => body
            .pointer("/fear_and_greed/score")
            .and_then(Value::as_f64)
            .map(f64::round)
            .ok_or_else(|| SourceError::Parse("missing fear_and_greed.score".to_string())),
    }
}

fn retry_policy(max_retries: usize) -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(200))
        .with_max_delay(Duration::from_secs(2))
        .with_max_times(max_retries)
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, SourceError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("sentiment-gauge/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

async fn get_json(
    client: &reqwest::Client,
    url: &str,
    headers: &[(&'static str, String)],
) -> Result<Value, SourceError> {
    let mut request = client.get(url);
    for (name, value) in headers {
        request = request.header(*name, value.as_str());
    }
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| SourceError::Parse(e.to_string()))
}

pub struct HttpCompositeSource {
    name: String,
    client: reqwest::Client,
    url: String,
    format: CompositeFormat,
    headers: Vec<(&'static str, String)>,
    max_retries: usize,
}

impl HttpCompositeSource {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        format: CompositeFormat,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            name: name.into(),
            client: build_client(timeout)?,
            url: url.into(),
            format,
            headers: Vec::new(),
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// RapidAPI-style credentials for proxied index endpoints
    pub fn with_api_credentials(mut self, key: Option<String>, host: Option<String>) -> Self {
        if let Some(key) = key {
            self.headers.push(("X-RapidAPI-Key", key));
        }
        if let Some(host) = host {
            self.headers.push(("X-RapidAPI-Host", host));
        }
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }
}

#[async_trait]
impl CompositeSource for HttpCompositeSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_score(&self) -> Result<f64, SourceError> {
        let body = (|| get_json(&self.client, &self.url, &self.headers))
            .retry(retry_policy(self.max_retries))
            .when(SourceError::is_transient)
            .notify(|e: &SourceError, after: Duration| {
                warn!(source = %self.name, error = %e, retry_in_ms = after.as_millis() as u64, "Retrying composite fetch");
            })
            .await?;
        parse_composite(self.format, &body)
    }
}

pub struct HttpSnapshotSource {
    client: reqwest::Client,
    url: String,
    max_retries: usize,
}

impl HttpSnapshotSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(timeout)?,
            url: url.into(),
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch_snapshot(&self) -> Result<DailySnapshot, SourceError> {
        let body = (|| get_json(&self.client, &self.url, &[]))
            .retry(retry_policy(self.max_retries))
            .when(SourceError::is_transient)
            .notify(|e: &SourceError, after: Duration| {
                warn!(url = %self.url, error = %e, retry_in_ms = after.as_millis() as u64, "Retrying snapshot fetch");
            })
            .await?;
        serde_json::from_value(body).map_err(|e| SourceError::Parse(e.to_string()))
    }
}

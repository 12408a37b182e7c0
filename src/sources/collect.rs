use std::time::Duration;

use futures_util::future::join_all;
use tracing::debug;

use super::IndicatorFeed;
use crate::error::SourceError;
use crate::metrics::Metrics;
use crate::models::{IndicatorKind, IndicatorReadings, Reading};

/// Fetch every requested indicator concurrently, each bounded by `timeout`.
///
/// Failures and timeouts become `Reading::Unavailable`; this never fails.
pub async fn collect_readings(
    feed: &dyn IndicatorFeed,
    kinds: &[IndicatorKind],
    timeout: Duration,
    metrics: Option<&Metrics>,
) -> IndicatorReadings {
    let fetches = kinds.iter().map(|&kind| async move {
        let fetched = tokio::time::timeout(timeout, feed.fetch(kind))
            .await
            .unwrap_or_else(|_| Err(SourceError::Timeout(timeout.as_millis() as u64)));
        let reading = match fetched {
            Ok(value) => Reading::from_value(value),
            Err(e) => {
                debug!(indicator = %kind, error = %e, "Indicator unavailable");
                Reading::Unavailable
            }
        };
        (kind, reading)
    });

    let mut readings = IndicatorReadings::new();
    for (kind, reading) in join_all(fetches).await {
        if !reading.is_available() {
            if let Some(metrics) = metrics {
                metrics
                    .indicator_fetch_failures_total
                    .with_label_values(&[kind.key()])
                    .inc();
            }
        }
        readings.set(kind, reading);
    }
    readings
}

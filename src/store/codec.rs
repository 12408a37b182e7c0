//! Key layout and value encoding of persisted series state
//!
//! | key                              | value                                  |
//! |----------------------------------|----------------------------------------|
//! | `<series>.recentScores`          | JSON array of at most 7 integers       |
//! | `<series>.recentCommitTimes`     | JSON array of RFC 3339 strings / null  |
//! | `<series>.lastUpdateTimestamp`   | RFC 3339 string                        |

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::error::StoreError;
use crate::models::{MarketSeries, ScoreEntry, SubScore};

pub fn recent_scores_key(series: &str) -> String {
    format!("{}.recentScores", series)
}

pub fn commit_times_key(series: &str) -> String {
    format!("{}.recentCommitTimes", series)
}

pub fn last_update_key(series: &str) -> String {
    format!("{}.lastUpdateTimestamp", series)
}

/// Keys in the order `decode` expects their values
pub fn keys(series: &str) -> Vec<String> {
    vec![
        recent_scores_key(series),
        commit_times_key(series),
        last_update_key(series),
    ]
}

pub fn encode(series: &MarketSeries) -> Vec<(String, Value)> {
    let scores = Value::Array(
        series
            .entries()
            .map(|e| Value::from(e.score))
            .collect(),
    );
    let times = Value::Array(
        series
            .entries()
            .map(|e| {
                e.committed_at
                    .map(|t| Value::String(t.to_rfc3339()))
                    .unwrap_or(Value::Null)
            })
            .collect(),
    );
    let last_update = series
        .last_update
        .map(|t| Value::String(t.to_rfc3339()))
        .unwrap_or(Value::Null);

    vec![
        (recent_scores_key(&series.name), scores),
        (commit_times_key(&series.name), times),
        (last_update_key(&series.name), last_update),
    ]
}

/// Rebuild a series from the values stored under `keys(series)`.
///
/// Returns `None` when nothing was ever written. Entries outside [0, 100]
/// are dropped; a value of the wrong JSON shape is `StoreError::Corrupt`.
pub fn decode(
    series: &str,
    values: &[Option<Value>],
    capacity: usize,
) -> Result<Option<MarketSeries>, StoreError> {
    let value_at = |i: usize| values.get(i).cloned().flatten().filter(|v| !v.is_null());
    let scores = value_at(0);
    let times = value_at(1);
    let last_update = value_at(2);

    if scores.is_none() && last_update.is_none() {
        return Ok(None);
    }

    let scores: Vec<i64> = match scores {
        Some(v) => serde_json::from_value(v).map_err(|e| StoreError::Corrupt {
            key: recent_scores_key(series),
            reason: e.to_string(),
        })?,
        None => Vec::new(),
    };

    let times: Vec<Option<String>> = match times {
        Some(v) => serde_json::from_value(v).map_err(|e| StoreError::Corrupt {
            key: commit_times_key(series),
            reason: e.to_string(),
        })?,
        None => Vec::new(),
    };

    let last_update = match last_update {
        Some(Value::String(raw)) => parse_time(&raw),
        Some(other) => {
            return Err(StoreError::Corrupt {
                key: last_update_key(series),
                reason: format!("expected timestamp string, got {}", other),
            })
        }
        None => None,
    };

    // Commit times align with the newest scores when the lists differ in length
    let offset = scores.len().saturating_sub(times.len());
    let mut entries = Vec::with_capacity(scores.len());
    for (i, raw) in scores.iter().enumerate() {
        let Some(score) = SubScore::new(*raw) else {
            warn!(series = %series, value = *raw, "dropping out-of-range persisted score");
            continue;
        };
        let committed_at = i
            .checked_sub(offset)
            .and_then(|j| times.get(j))
            .and_then(|t| t.as_deref())
            .and_then(parse_time);
        entries.push(ScoreEntry {
            score: score.value(),
            committed_at,
        });
    }

    Ok(Some(MarketSeries::from_entries(
        series,
        entries,
        last_update,
        capacity,
    )))
}

fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .ok()
}

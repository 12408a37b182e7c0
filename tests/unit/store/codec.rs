//! Unit tests for the persisted key layout

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use sentiment_gauge::error::StoreError;
use sentiment_gauge::models::MarketSeries;
use sentiment_gauge::store::codec::{self, decode, encode};

#[test]
fn test_key_names() {
    assert_eq!(codec::recent_scores_key("stock"), "stock.recentScores");
    assert_eq!(codec::last_update_key("stock"), "stock.lastUpdateTimestamp");
    assert_eq!(codec::commit_times_key("crypto"), "crypto.recentCommitTimes");
}

#[test]
fn test_encode_layout() {
    let when = Utc.with_ymd_and_hms(2025, 5, 11, 9, 30, 0).unwrap();
    let mut series = MarketSeries::new("stock");
    series.push(44, when);
    series.push(47, when);

    let encoded = encode(&series);
    assert_eq!(encoded[0], ("stock.recentScores".to_string(), json!([44, 47])));
    assert_eq!(
        encoded[2],
        (
            "stock.lastUpdateTimestamp".to_string(),
            Value::String(when.to_rfc3339())
        )
    );
}

#[test]
fn test_nothing_written_decodes_to_none() {
    assert!(decode("stock", &[None, None, None], 7).unwrap().is_none());
}

#[test]
fn test_scores_without_commit_times() {
    let values = vec![Some(json!([40, 55, 60])), None, None];
    let series = decode("stock", &values, 7).unwrap().unwrap();
    assert_eq!(series.recent_scores(), vec![40, 55, 60]);
    assert!(series.entries().all(|e| e.committed_at.is_none()));
    assert_eq!(series.current_score(), 60);
}

#[test]
fn test_shorter_commit_times_align_with_newest_scores() {
    let values = vec![
        Some(json!([40, 55, 60])),
        Some(json!(["2025-05-11T10:00:00+00:00"])),
        Some(json!("2025-05-11T10:00:00+00:00")),
    ];
    let series = decode("stock", &values, 7).unwrap().unwrap();
    let times: Vec<_> = series.entries().map(|e| e.committed_at.is_some()).collect();
    assert_eq!(times, vec![false, false, true]);
    assert!(series.last_update.is_some());
}

#[test]
fn test_out_of_range_persisted_scores_are_dropped() {
    let values = vec![Some(json!([40, 140, -2, 60])), None, None];
    let series = decode("stock", &values, 7).unwrap().unwrap();
    assert_eq!(series.recent_scores(), vec![40, 60]);
}

#[test]
fn test_wrong_shape_is_corrupt() {
    let values = vec![Some(json!("not a list")), None, None];
    assert!(matches!(
        decode("stock", &values, 7),
        Err(StoreError::Corrupt { key, .. }) if key == "stock.recentScores"
    ));
}

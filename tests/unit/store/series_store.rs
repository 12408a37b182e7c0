//! Unit tests for the commit-with-fallback policy

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use sentiment_gauge::store::{validate_score, CommitOutcome, MemoryBackend, SeriesStore};

fn store() -> (SeriesStore, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    (SeriesStore::new(backend.clone()), backend)
}

#[test]
fn test_validate_score() {
    assert_eq!(validate_score(0.0), Some(0));
    assert_eq!(validate_score(100.0), Some(100));
    assert_eq!(validate_score(63.0), Some(63));
    assert_eq!(validate_score(-1.0), None);
    assert_eq!(validate_score(101.0), None);
    assert_eq!(validate_score(50.5), None);
    assert_eq!(validate_score(f64::NAN), None);
}

#[tokio::test]
async fn test_first_read_is_neutral_and_empty() {
    let (store, _) = store();
    let series = store.get("stock").await.unwrap();
    assert!(series.is_empty());
    assert_eq!(store.current_score("stock").await.unwrap(), 50);
}

#[tokio::test]
async fn test_invalid_commits_leave_history_untouched() {
    let (store, backend) = store();
    store.commit("stock", 42.0).await.unwrap();
    let before = store.get("stock").await.unwrap();

    for candidate in [-1.0, 101.0, 50.5] {
        let outcome = store.commit("stock", candidate).await.unwrap();
        assert!(matches!(outcome, CommitOutcome::Rejected { .. }));
        assert_eq!(outcome.current_score(), 42);
    }

    let after = store.get("stock").await.unwrap();
    assert_eq!(before.recent_scores(), after.recent_scores());
    assert_eq!(store.current_score("stock").await.unwrap(), 42);
    assert_eq!(
        backend.raw("stock.recentScores").await,
        Some(serde_json::json!([42]))
    );
}

#[tokio::test]
async fn test_rejection_on_fresh_series_writes_nothing() {
    let (store, backend) = store();
    let outcome = store.commit("crypto", 250.0).await.unwrap();
    assert!(!outcome.is_committed());
    assert_eq!(outcome.current_score(), 50);
    assert!(backend.raw("crypto.recentScores").await.is_none());
}

#[tokio::test]
async fn test_ten_commits_keep_last_seven() {
    let (store, _) = store();
    for score in 1..=10 {
        store.commit("stock", f64::from(score * 5)).await.unwrap();
    }
    let series = store.get("stock").await.unwrap();
    assert_eq!(series.recent_scores(), vec![20, 25, 30, 35, 40, 45, 50]);
}

#[tokio::test]
async fn test_current_score_after_commits() {
    let (store, _) = store();
    for score in [40.0, 55.0, 60.0] {
        store.commit("stock", score).await.unwrap();
    }
    assert_eq!(store.current_score("stock").await.unwrap(), 60);
}

#[tokio::test]
async fn test_delta_after_identical_run() {
    let (store, _) = store();
    let start = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
    for (day, score) in [50.0, 50.0, 50.0, 62.0].into_iter().enumerate() {
        store
            .commit_at("stock", score, start + Duration::days(day as i64))
            .await
            .unwrap();
    }

    let delta = store.delta("stock").await.unwrap();
    assert_eq!(delta.current, 62);
    assert_eq!(delta.previous, Some(50));
    assert_eq!(delta.change, 12);
    assert_eq!(delta.last_changed_at, Some(start + Duration::days(3)));
}

#[tokio::test]
async fn test_delta_of_unchanged_run_points_at_first_commit() {
    let (store, _) = store();
    let start = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
    for day in 0..3 {
        store
            .commit_at("stock", 50.0, start + Duration::days(day))
            .await
            .unwrap();
    }

    let delta = store.delta("stock").await.unwrap();
    assert_eq!(delta.change, 0);
    assert_eq!(delta.last_changed_at, Some(start));
}

#[tokio::test]
async fn test_series_are_independent() {
    let (store, _) = store();
    store.commit("stock", 30.0).await.unwrap();
    store.commit("crypto", 80.0).await.unwrap();
    assert_eq!(store.current_score("stock").await.unwrap(), 30);
    assert_eq!(store.current_score("crypto").await.unwrap(), 80);
}

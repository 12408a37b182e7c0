//! Integration tests for persisted series state

use std::collections::BTreeSet;
use std::sync::Arc;

use sentiment_gauge::store::{FileBackend, KeyValueBackend, MemoryBackend, SeriesStore};

use crate::test_utils::temp_path;

#[tokio::test]
async fn file_store_survives_restart() {
    let path = temp_path("restart");

    {
        let store = SeriesStore::new(Arc::new(FileBackend::new(&path)));
        for score in [40.0, 55.0, 60.0] {
            store.commit("stock", score).await.unwrap();
        }
        store.commit("crypto", 71.0).await.unwrap();
    }

    let reopened = SeriesStore::new(Arc::new(FileBackend::new(&path)));
    let stock = reopened.get("stock").await.unwrap();
    assert_eq!(stock.recent_scores(), vec![40, 55, 60]);
    assert!(stock.last_update.is_some());
    assert!(stock.entries().all(|e| e.committed_at.is_some()));
    assert_eq!(reopened.current_score("crypto").await.unwrap(), 71);

    let raw: serde_json::Value =
        serde_json::from_slice(&tokio::fs::read(&path).await.unwrap()).unwrap();
    assert_eq!(raw["stock.recentScores"], serde_json::json!([40, 55, 60]));
    assert!(raw["stock.lastUpdateTimestamp"].is_string());

    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test]
async fn corrupt_state_file_is_reported() {
    let path = temp_path("corrupt");
    tokio::fs::write(&path, "[1, 2, 3]").await.unwrap();

    let store = SeriesStore::new(Arc::new(FileBackend::new(&path)));
    assert!(store.get("stock").await.is_err());

    let _ = tokio::fs::remove_file(&path).await;
}

async fn concurrent_commits_are_not_lost(backend: Arc<dyn KeyValueBackend>) {
    let store = Arc::new(SeriesStore::with_capacity(backend, 50));

    let handles: Vec<_> = (1..=20)
        .map(|score| {
            let store = store.clone();
            tokio::spawn(async move { store.commit("stock", f64::from(score)).await })
        })
        .collect();
    for handle in handles {
        assert!(handle.await.unwrap().unwrap().is_committed());
    }

    let series = store.get("stock").await.unwrap();
    assert_eq!(series.len(), 20);
    let committed: BTreeSet<u8> = series.recent_scores().into_iter().collect();
    assert_eq!(committed, (1..=20).collect::<BTreeSet<u8>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_commits_on_memory_backend() {
    concurrent_commits_are_not_lost(Arc::new(MemoryBackend::new())).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_commits_on_file_backend() {
    let path = temp_path("concurrent");
    concurrent_commits_are_not_lost(Arc::new(FileBackend::new(&path))).await;
    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn different_series_commit_in_parallel() {
    let store = Arc::new(SeriesStore::new(Arc::new(MemoryBackend::new())));

    let stock = {
        let store = store.clone();
        tokio::spawn(async move {
            for score in 0..5 {
                store.commit("stock", f64::from(score)).await.unwrap();
            }
        })
    };
    let crypto = {
        let store = store.clone();
        tokio::spawn(async move {
            for score in 90..95 {
                store.commit("crypto", f64::from(score)).await.unwrap();
            }
        })
    };
    stock.await.unwrap();
    crypto.await.unwrap();

    assert_eq!(store.get("stock").await.unwrap().recent_scores(), vec![0, 1, 2, 3, 4]);
    assert_eq!(store.get("crypto").await.unwrap().recent_scores(), vec![90, 91, 92, 93, 94]);
}

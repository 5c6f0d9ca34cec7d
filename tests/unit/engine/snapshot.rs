//! Unit tests for the shared indicator snapshot

use alertix::engine::SnapshotHandle;
use chrono::{TimeZone, Utc};

#[tokio::test]
async fn test_snapshot_starts_uncomputed() {
    let handle = SnapshotHandle::new();
    let snapshot = handle.read().await;
    assert!(!snapshot.is_computed());
    assert_eq!(snapshot.rsi, 0.0);
    assert_eq!(snapshot.macd, 0.0);
}

#[tokio::test]
async fn test_snapshot_publish_replaces_pair() {
    let handle = SnapshotHandle::new();
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

    handle.publish_at(55.0, -1.5, at).await;
    let snapshot = handle.clone().read().await;

    assert_eq!(snapshot.rsi, 55.0);
    assert_eq!(snapshot.macd, -1.5);
    assert_eq!(snapshot.computed_at, Some(at));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_snapshot_reads_are_never_torn() {
    let handle = SnapshotHandle::new();

    let writer = {
        let handle = handle.clone();
        tokio::spawn(async move {
            for i in 1..=2_000 {
                let value = i as f64;
                handle.publish(value, -value).await;
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let handle = handle.clone();
            tokio::spawn(async move {
                for _ in 0..2_000 {
                    let snapshot = handle.read().await;
                    assert_eq!(snapshot.rsi, -snapshot.macd, "torn read: {snapshot:?}");
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }

    let last = handle.read().await;
    assert_eq!(last.rsi, 2_000.0);
}

//! Unit tests for the alert evaluation cycle

use alertix::alerts::{AlertEvaluator, CycleReport};
use alertix::db::{AlertStore, InMemoryAlertStore};
use alertix::engine::SnapshotHandle;
use alertix::error::StoreError;
use alertix::models::{Alert, AlertStatus, NewAlert};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Store whose status writes fail a fixed number of times
struct FlakyStore {
    inner: InMemoryAlertStore,
    failing_updates: AtomicUsize,
    failing_reads: AtomicBool,
}

impl FlakyStore {
    fn new(failing_updates: usize) -> Self {
        Self {
            inner: InMemoryAlertStore::new(),
            failing_updates: AtomicUsize::new(failing_updates),
            failing_reads: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl AlertStore for FlakyStore {
    async fn create(&self, alert: NewAlert) -> Result<i64, StoreError> {
        self.inner.create(alert).await
    }

    async fn list_all(&self) -> Result<Vec<Alert>, StoreError> {
        if self.failing_reads.load(Ordering::SeqCst) {
            return Err(StoreError::InvalidRow("store offline".to_string()));
        }
        self.inner.list_all().await
    }

    async fn update_status(&self, id: i64, status: AlertStatus) -> Result<(), StoreError> {
        let remaining = self.failing_updates.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failing_updates.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::InvalidRow("write rejected".to_string()));
        }
        self.inner.update_status(id, status).await
    }

    fn backend(&self) -> &'static str {
        "flaky"
    }
}

#[tokio::test]
async fn test_cycle_completes_crossed_alerts_only() {
    let store = Arc::new(InMemoryAlertStore::new());
    let rsi_up = store.create(NewAlert::new(70.0, "up", "RSI")).await.unwrap();
    let macd_down = store.create(NewAlert::new(-1.0, "down", "MACD")).await.unwrap();

    let snapshot = SnapshotHandle::new();
    snapshot.publish(71.0, -0.5).await;

    let evaluator = AlertEvaluator::new(store.clone(), snapshot);
    let (alerts, report) = evaluator.run_cycle_with_report().await.unwrap();

    assert_eq!(
        report,
        CycleReport {
            evaluated: 2,
            triggered: 1,
            failed_updates: 0
        }
    );
    let status_of = |id: i64| alerts.iter().find(|a| a.id == id).unwrap().status;
    assert_eq!(status_of(rsi_up), AlertStatus::Completed);
    assert_eq!(status_of(macd_down), AlertStatus::Pending);

    let stored = store.list_all().await.unwrap();
    assert_eq!(stored, alerts);
}

#[tokio::test]
async fn test_completed_alerts_stay_completed() {
    let store = Arc::new(InMemoryAlertStore::new());
    store.create(NewAlert::new(70.0, "up", "RSI")).await.unwrap();

    let snapshot = SnapshotHandle::new();
    let evaluator = AlertEvaluator::new(store.clone(), snapshot.clone());

    snapshot.publish(80.0, 0.0).await;
    evaluator.run_cycle().await.unwrap();

    // indicator falls back below the threshold
    snapshot.publish(10.0, 0.0).await;
    let (alerts, report) = evaluator.run_cycle_with_report().await.unwrap();

    assert_eq!(report.evaluated, 0);
    assert_eq!(alerts[0].status, AlertStatus::Completed);
}

#[tokio::test]
async fn test_nothing_fires_before_first_snapshot() {
    let store = Arc::new(InMemoryAlertStore::new());
    store.create(NewAlert::new(-1.0, "up", "MACD")).await.unwrap();

    let evaluator = AlertEvaluator::new(store, SnapshotHandle::new());
    let (alerts, report) = evaluator.run_cycle_with_report().await.unwrap();

    assert_eq!(report.triggered, 0);
    assert_eq!(alerts[0].status, AlertStatus::Pending);
}

#[tokio::test]
async fn test_failed_status_write_is_retried_next_cycle() {
    let store = Arc::new(FlakyStore::new(1));
    store.create(NewAlert::new(70.0, "up", "RSI")).await.unwrap();

    let snapshot = SnapshotHandle::new();
    snapshot.publish(75.0, 0.0).await;
    let evaluator = AlertEvaluator::new(store.clone(), snapshot);

    let (alerts, report) = evaluator.run_cycle_with_report().await.unwrap();
    assert_eq!(report.failed_updates, 1);
    assert_eq!(alerts[0].status, AlertStatus::Pending);

    let (alerts, report) = evaluator.run_cycle_with_report().await.unwrap();
    assert_eq!(report.triggered, 1);
    assert_eq!(alerts[0].status, AlertStatus::Completed);
    assert_eq!(store.list_all().await.unwrap()[0].status, AlertStatus::Completed);
}

#[tokio::test]
async fn test_failed_read_aborts_cycle() {
    let store = Arc::new(FlakyStore::new(0));
    store.failing_reads.store(true, Ordering::SeqCst);

    let evaluator = AlertEvaluator::new(store, SnapshotHandle::new());
    assert!(evaluator.run_cycle().await.is_err());
}

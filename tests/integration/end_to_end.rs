//! End-to-end: scripted kline stream through ingestion, snapshot and alert evaluation

#[path = "ingestion/test_utils.rs"]
mod test_utils;

use alertix::alerts::{run_subscription, AlertEvaluator};
use alertix::config::ReconnectConfig;
use alertix::db::{AlertStore, InMemoryAlertStore};
use alertix::engine::{IngestionService, ShutdownSignal, SnapshotHandle};
use alertix::models::{AlertStatus, NewAlert};
use alertix::services::websocket::FeedService;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use test_utils::{final_frames, ScriptedConnector, Session};

#[tokio::test(start_paused = true)]
async fn rising_closes_fire_rsi_alert_only() {
    let store = Arc::new(InMemoryAlertStore::new());
    let rsi_up = store.create(NewAlert::new(99.0, "up", "RSI")).await.unwrap();
    let macd_down = store.create(NewAlert::new(0.0, "down", "MACD")).await.unwrap();

    let (shutdown, listener) = ShutdownSignal::channel();
    let snapshot = SnapshotHandle::new();

    let connector = ScriptedConnector::new(vec![Session::Frames(final_frames(
        (100..=125).map(f64::from),
    ))])
    .holding_last_open();
    let feed = FeedService::new(Arc::new(connector), ReconnectConfig::default());
    feed.start(IngestionService::new(snapshot.clone(), false), listener.clone())
        .await;

    while !snapshot.read().await.is_computed() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(feed.is_running().await);

    let evaluator = Arc::new(AlertEvaluator::new(store.clone(), snapshot.clone()));
    let (tx, mut rx) = mpsc::channel(1);
    let subscription = tokio::spawn(run_subscription(
        evaluator,
        tx,
        Duration::from_secs(5),
        listener,
    ));

    let delivered = rx.recv().await.unwrap();
    let status_of = |id: i64| delivered.iter().find(|a| a.id == id).unwrap().status;
    assert_eq!(status_of(rsi_up), AlertStatus::Completed);
    assert_eq!(status_of(macd_down), AlertStatus::Pending);

    let stored = store.list_all().await.unwrap();
    assert_eq!(stored, delivered);

    shutdown.trigger();
    subscription.await.unwrap();
    assert!(feed.join().await.is_ok());
    assert!(!feed.is_running().await);
}

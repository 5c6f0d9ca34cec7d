//! Integration tests for the background feed service

#[path = "ingestion/test_utils.rs"]
mod test_utils;

use alertix::config::ReconnectConfig;
use alertix::engine::{IngestionService, ShutdownSignal, SnapshotHandle};
use alertix::error::FeedError;
use alertix::services::market_data::{FeedConnector, FeedStream};
use alertix::services::websocket::FeedService;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use test_utils::{ScriptedConnector, Session};

/// Connector that crashes the ingestion task
struct PanickingConnector;

#[async_trait]
impl FeedConnector for PanickingConnector {
    fn endpoint(&self) -> &str {
        "panicking://klines"
    }

    async fn connect(&self) -> Result<FeedStream, FeedError> {
        panic!("connector blew up");
    }
}

fn silent_feed() -> Arc<ScriptedConnector> {
    Arc::new(ScriptedConnector::new(vec![Session::Frames(vec![])]).holding_last_open())
}

#[tokio::test]
async fn stop_is_not_blocked_by_a_pending_join() {
    let feed = Arc::new(FeedService::new(silent_feed(), ReconnectConfig::default()));
    let (_signal, listener) = ShutdownSignal::channel();
    feed.start(IngestionService::new(SnapshotHandle::new(), false), listener)
        .await;

    let joiner = {
        let feed = feed.clone();
        tokio::spawn(async move { feed.join().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!joiner.is_finished());

    let running = timeout(Duration::from_secs(2), feed.is_running())
        .await
        .expect("is_running should not wait for the join");
    assert!(running);

    timeout(Duration::from_secs(2), feed.stop())
        .await
        .expect("stop should not wait for the join");

    let joined = timeout(Duration::from_secs(2), joiner)
        .await
        .expect("join should return once the task is aborted")
        .unwrap();
    assert!(joined.is_ok());
    assert!(!feed.is_running().await);
}

#[tokio::test]
async fn join_reports_a_panicked_task() {
    let feed = FeedService::new(Arc::new(PanickingConnector), ReconnectConfig::default());
    let (_signal, listener) = ShutdownSignal::channel();
    feed.start(IngestionService::new(SnapshotHandle::new(), false), listener)
        .await;

    let result = timeout(Duration::from_secs(2), feed.join())
        .await
        .expect("join should return once the task panics");
    assert!(matches!(result, Err(FeedError::TaskFailed(_))));
}

#[tokio::test]
async fn second_start_is_ignored_while_running() {
    let connector = silent_feed();
    let feed = FeedService::new(connector.clone(), ReconnectConfig::default());
    let (signal, listener) = ShutdownSignal::channel();

    feed.start(IngestionService::new(SnapshotHandle::new(), false), listener.clone())
        .await;
    feed.start(IngestionService::new(SnapshotHandle::new(), false), listener)
        .await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(connector.connects(), 1);

    signal.trigger();
    assert!(feed.join().await.is_ok());
}

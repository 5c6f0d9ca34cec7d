//! Feed service: owns the long-lived ingestion task

use crate::config::ReconnectConfig;
use crate::engine::ingestion::IngestionService;
use crate::engine::shutdown::ShutdownListener;
use crate::error::FeedError;
use crate::services::market_data::FeedConnector;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{error, info, warn};

type IngestionTask = JoinHandle<Result<(), FeedError>>;

/// Runs the single ingestion task in the background
///
/// There is exactly one ingestion path per process; it is the only writer of
/// the indicator snapshot. The abort handle is kept apart from the join handle
/// so the task stays stoppable while someone is waiting on it.
pub struct FeedService {
    connector: Arc<dyn FeedConnector>,
    reconnect: ReconnectConfig,
    task: Arc<RwLock<Option<IngestionTask>>>,
    abort: Arc<RwLock<Option<AbortHandle>>>,
}

impl FeedService {
    pub fn new(connector: Arc<dyn FeedConnector>, reconnect: ReconnectConfig) -> Self {
        Self {
            connector,
            reconnect,
            task: Arc::new(RwLock::new(None)),
            abort: Arc::new(RwLock::new(None)),
        }
    }

    /// Spawn the ingestion task; a second call while running is ignored
    pub async fn start(&self, ingestion: IngestionService, shutdown: ShutdownListener) {
        let mut abort = self.abort.write().await;
        if abort.as_ref().is_some_and(|h| !h.is_finished()) {
            warn!("Feed service already running");
            return;
        }

        let connector = self.connector.clone();
        let reconnect = self.reconnect;
        let handle = tokio::spawn(async move {
            let result = ingestion.run(connector.as_ref(), reconnect, shutdown).await;
            match &result {
                Ok(()) => info!("Feed service: ingestion finished"),
                Err(e) => error!(error = %e, "Feed service: ingestion failed"),
            }
            result
        });

        *abort = Some(handle.abort_handle());
        *self.task.write().await = Some(handle);
        info!(endpoint = self.connector.endpoint(), "Feed service started");
    }

    /// Wait for the ingestion task to finish and return its result
    ///
    /// Only one caller receives the result; later calls return `Ok(())`.
    /// A task stopped through [`FeedService::stop`] also yields `Ok(())`.
    pub async fn join(&self) -> Result<(), FeedError> {
        let Some(handle) = self.task.write().await.take() else {
            return Ok(());
        };

        match handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => {
                error!(error = %e, "Feed service: ingestion task panicked");
                Err(FeedError::TaskFailed(e.to_string()))
            }
        }
    }

    /// Abort the ingestion task without waiting for a shutdown signal
    pub async fn stop(&self) {
        let abort = self.abort.write().await.take();
        if let Some(h) = abort {
            h.abort();
            info!("Feed service stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        let abort = self.abort.read().await;
        abort.as_ref().is_some_and(|h| !h.is_finished())
    }
}

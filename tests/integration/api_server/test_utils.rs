//! Test utilities for API server integration tests

use alertix::core::http::{create_router, AppState};
use alertix::db::{AlertStore, InMemoryAlertStore};
use alertix::engine::{ShutdownSignal, SnapshotHandle};
use alertix::metrics::Metrics;
use axum_test::TestServer;
use std::sync::Arc;
use std::time::Duration;

/// Test helper for API server integration tests
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub state: AppState,
    pub metrics: Arc<Metrics>,
    pub shutdown: ShutdownSignal,
}

#[allow(dead_code)]
impl TestApiServer {
    /// In-process server with the default 5s evaluation interval
    pub async fn new() -> Self {
        Self::build(Duration::from_secs(5), false)
    }

    /// Server on a real socket, needed for WebSocket upgrades
    pub async fn over_http(evaluation_interval: Duration) -> Self {
        Self::build(evaluation_interval, true)
    }

    fn build(evaluation_interval: Duration, http_transport: bool) -> Self {
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let store: Arc<dyn AlertStore> = Arc::new(InMemoryAlertStore::new());
        let (shutdown, listener) = ShutdownSignal::channel();

        let state = AppState::new(
            metrics.clone(),
            store,
            SnapshotHandle::new(),
            evaluation_interval,
            listener,
        );

        let app = create_router(state.clone());
        let server = if http_transport {
            TestServer::builder()
                .http_transport()
                .build(app)
                .expect("start test server")
        } else {
            TestServer::new(app).expect("start test server")
        };

        Self {
            server,
            state,
            metrics,
            shutdown,
        }
    }
}

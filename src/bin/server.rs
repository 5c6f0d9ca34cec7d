//! Alertix Server
//!
//! Runs the kline ingestion task and the HTTP/WebSocket surface in one process.
//! Each WebSocket subscriber gets its own alert evaluation loop.

use alertix::config::AppConfig;
use alertix::core::http::{start_server, AppState};
use alertix::db::{AlertStore, InMemoryAlertStore, PostgresAlertStore};
use alertix::engine::{IngestionService, ShutdownSignal, SnapshotHandle};
use alertix::logging;
use alertix::metrics::Metrics;
use alertix::services::binance::BinanceKlineConnector;
use alertix::services::websocket::FeedService;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    let config = AppConfig::from_env()?;
    logging::init_logging(&config.environment, &config.log_level);

    info!("Starting Alertix server");
    info!(environment = %config.environment, "Environment");
    info!(
        symbol = %config.feed.symbol,
        interval = %config.feed.interval,
        accept_interim = config.feed.accept_interim,
        "Tracking {} {} klines",
        config.feed.symbol,
        config.feed.interval
    );

    let metrics = Arc::new(Metrics::new()?);

    let store: Arc<dyn AlertStore> = match config.database_url.as_deref() {
        Some(url) => {
            info!("Initializing PostgreSQL alert store...");
            let store = PostgresAlertStore::connect(url).await?;
            metrics.database_connected.set(1.0);
            Arc::new(store)
        }
        None => {
            warn!("DATABASE_URL not set - alerts are kept in memory and lost on restart");
            metrics.database_connected.set(0.0);
            Arc::new(InMemoryAlertStore::new())
        }
    };

    let (shutdown, listener) = ShutdownSignal::channel();
    let snapshot = SnapshotHandle::new();

    let connector = Arc::new(BinanceKlineConnector::new(&config.feed)?);
    let feed = FeedService::new(connector, config.reconnect);
    let ingestion = IngestionService::new(snapshot.clone(), config.feed.accept_interim)
        .with_metrics(metrics.clone());
    feed.start(ingestion, listener.clone()).await;

    let state = AppState::new(
        metrics.clone(),
        store,
        snapshot,
        config.evaluation_interval,
        listener,
    );

    let port = config.port;
    let mut server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, state).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("Server started, waiting for shutdown signal...");
    let mut feed_running = true;
    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Shutting down...");
                break;
            }
            _ = &mut server_handle => {
                error!("HTTP server stopped");
                break;
            }
            result = feed.join(), if feed_running => {
                feed_running = false;
                // Keep serving: alerts still evaluate against the last published snapshot
                match result {
                    Ok(()) => warn!("Kline ingestion ended, indicators are frozen"),
                    Err(e) => error!(error = %e, "Kline ingestion failed, indicators are frozen"),
                }
            }
        }
    }

    shutdown.trigger();
    feed.stop().await;
    if !server_handle.is_finished() {
        let _ = server_handle.await;
    }
    info!("Server stopped");

    Ok(())
}

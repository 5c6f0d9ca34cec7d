//! Stream ingestion loop: kline frames in, indicator snapshots out

use crate::config::ReconnectConfig;
use crate::engine::shutdown::ShutdownListener;
use crate::engine::snapshot::SnapshotHandle;
use crate::engine::window::{PriceWindow, MIN_PRICES};
use crate::error::FeedError;
use crate::metrics::Metrics;
use crate::models::{IndicatorSnapshot, PriceTick};
use crate::services::binance::decode_tick;
use crate::services::market_data::{FeedConnector, FeedStream};
use backon::{BackoffBuilder, ExponentialBuilder, Retryable};
use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// What happened to one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Intra-interval candle dropped because only closed candles are accepted
    SkippedInterim,
    /// Price appended, but the window is still shorter than the MACD slow period
    InsufficientData { collected: usize },
    /// Price appended and a new snapshot published
    Published(IndicatorSnapshot),
}

enum StreamEnd {
    Shutdown,
    Dropped { error: FeedError, frames: usize },
}

/// Owns the price window and is the only writer of the indicator snapshot
pub struct IngestionService {
    window: PriceWindow,
    snapshot: SnapshotHandle,
    accept_interim: bool,
    metrics: Option<Arc<Metrics>>,
}

impl IngestionService {
    pub fn new(snapshot: SnapshotHandle, accept_interim: bool) -> Self {
        Self {
            window: PriceWindow::new(),
            snapshot,
            accept_interim,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn window(&self) -> &PriceWindow {
        &self.window
    }

    /// Apply one tick to the window and publish indicators when enough history exists
    pub async fn ingest_tick(&mut self, tick: PriceTick) -> TickOutcome {
        if !tick.is_final && !self.accept_interim {
            debug!(close_time = %tick.close_time, "Non-final kline skipped");
            return TickOutcome::SkippedInterim;
        }

        self.window.append(&tick);

        let Some((rsi, macd)) = self.window.indicators() else {
            info!(
                collected = self.window.len(),
                required = MIN_PRICES,
                "Insufficient data: {}/{} prices collected",
                self.window.len(),
                MIN_PRICES
            );
            return TickOutcome::InsufficientData {
                collected: self.window.len(),
            };
        };

        let snapshot = self.snapshot.publish(rsi, macd).await;
        if let Some(ref metrics) = self.metrics {
            metrics.indicator_updates_total.inc();
        }

        info!(
            close_time = %tick.close_time,
            close = tick.close_price,
            rsi = rsi,
            macd = macd,
            "Indicators updated - MACD: {:.6} | RSI: {:.6}",
            macd,
            rsi
        );

        TickOutcome::Published(snapshot)
    }

    /// Decode one raw frame and ingest it
    pub async fn ingest_message(&mut self, text: &str) -> Result<TickOutcome, FeedError> {
        let tick = decode_tick(text)?;
        Ok(self.ingest_tick(tick).await)
    }

    /// Run until shutdown, reconnecting with exponential backoff when the feed drops
    ///
    /// The price window survives reconnects. Returns an error once
    /// `reconnect.max_attempts` consecutive connection attempts have failed, or
    /// once that many consecutive sessions closed before delivering a frame.
    pub async fn run<C>(
        mut self,
        connector: &C,
        reconnect: ReconnectConfig,
        mut shutdown: ShutdownListener,
    ) -> Result<(), FeedError>
    where
        C: FeedConnector + ?Sized,
    {
        info!(endpoint = connector.endpoint(), "Starting kline ingestion");

        // Delays between sessions that dropped without a single frame
        let mut idle_sessions = backoff(&reconnect).build();

        loop {
            if shutdown.is_shutdown() {
                return Ok(());
            }

            let metrics = self.metrics.clone();
            let connect = (|| connector.connect())
                .retry(backoff(&reconnect))
                .notify(move |err: &FeedError, delay: Duration| {
                    warn!(
                        error = %err,
                        retry_in_ms = delay.as_millis() as u64,
                        "Kline stream connect failed, retrying"
                    );
                    if let Some(ref metrics) = metrics {
                        metrics.feed_reconnects_total.inc();
                    }
                });

            let mut stream = tokio::select! {
                _ = shutdown.recv() => return Ok(()),
                result = connect => result.map_err(|e| FeedError::ReconnectExhausted {
                    attempts: reconnect.max_attempts,
                    last: e.to_string(),
                })?,
            };

            self.set_connected(true);

            match self.consume(&mut stream, &mut shutdown).await {
                StreamEnd::Shutdown => {
                    self.set_connected(false);
                    info!("Kline ingestion stopped");
                    return Ok(());
                }
                StreamEnd::Dropped { error, frames } => {
                    self.set_connected(false);
                    warn!(
                        error = %error,
                        frames = frames,
                        prices = self.window.len(),
                        "Kline stream lost, indicators frozen until reconnect"
                    );

                    if frames > 0 {
                        idle_sessions = backoff(&reconnect).build();
                    }

                    let Some(delay) = idle_sessions.next() else {
                        return Err(FeedError::ReconnectExhausted {
                            attempts: reconnect.max_attempts,
                            last: error.to_string(),
                        });
                    };

                    tokio::select! {
                        _ = shutdown.recv() => return Ok(()),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
    }

    async fn consume(&mut self, stream: &mut FeedStream, shutdown: &mut ShutdownListener) -> StreamEnd {
        let mut frames = 0;
        loop {
            let next = tokio::select! {
                _ = shutdown.recv() => return StreamEnd::Shutdown,
                next = stream.next() => next,
            };

            let text = match next {
                None => {
                    return StreamEnd::Dropped {
                        error: FeedError::Closed,
                        frames,
                    }
                }
                Some(Err(error)) => return StreamEnd::Dropped { error, frames },
                Some(Ok(text)) => text,
            };
            frames += 1;

            if let Some(ref metrics) = self.metrics {
                metrics.feed_messages_total.inc();
            }

            if let Err(err) = self.ingest_message(&text).await {
                warn!(error = %err, "Skipping undecodable kline message");
                if let Some(ref metrics) = self.metrics {
                    metrics.feed_decode_errors_total.inc();
                }
            }
        }
    }

    fn set_connected(&self, connected: bool) {
        if let Some(ref metrics) = self.metrics {
            metrics.feed_connected.set(if connected { 1.0 } else { 0.0 });
        }
    }
}

fn backoff(reconnect: &ReconnectConfig) -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(reconnect.min_delay)
        .with_max_delay(reconnect.max_delay)
        .with_max_times(reconnect.max_attempts)
        .with_jitter()
}

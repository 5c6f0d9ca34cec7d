//! WebSocket transport for alert subscribers

use crate::alerts::{run_subscription, AlertSink, SubscriptionEnd};
use crate::core::http::AppState;
use crate::engine::shutdown::ShutdownSignal;
use crate::error::SinkError;
use crate::models::Alert;
use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, info};

/// Pushes each alert list as one JSON text frame
pub struct WebSocketAlertSink {
    sender: SplitSink<WebSocket, Message>,
}

impl WebSocketAlertSink {
    pub fn new(sender: SplitSink<WebSocket, Message>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl AlertSink for WebSocketAlertSink {
    async fn deliver(&mut self, alerts: &[Alert]) -> Result<(), SinkError> {
        let payload = serde_json::to_string(alerts)?;
        self.sender
            .send(Message::Text(payload.into()))
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))
    }
}

/// Run one evaluation loop for a connected subscriber
///
/// The loop is cancelled when the client closes the socket or the server shuts
/// down, and the socket is released when the loop ends for any reason.
pub async fn serve_subscriber(socket: WebSocket, state: AppState) {
    let (sender, mut receiver) = socket.split();
    let (disconnect, listener) = ShutdownSignal::channel();
    let mut server_shutdown = state.shutdown.clone();

    state.metrics.subscribers_active.inc();
    info!("Alert subscriber connected");

    // Inbound frames are ignored; the reader only watches for the client going away
    let watcher = tokio::spawn(async move {
        tokio::select! {
            _ = server_shutdown.recv() => {}
            _ = async {
                while let Some(Ok(message)) = receiver.next().await {
                    if matches!(message, Message::Close(_)) {
                        break;
                    }
                }
            } => {}
        }
        disconnect.trigger();
    });

    let end = run_subscription(
        state.evaluator.clone(),
        WebSocketAlertSink::new(sender),
        state.evaluation_interval,
        listener,
    )
    .await;

    watcher.abort();
    state.metrics.subscribers_active.dec();

    match end {
        SubscriptionEnd::Cancelled => info!("Alert subscriber disconnected"),
        SubscriptionEnd::SinkClosed => debug!("Alert subscriber dropped after failed send"),
    }
}

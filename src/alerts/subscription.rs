//! Per-subscriber evaluation loop

use crate::alerts::evaluator::AlertEvaluator;
use crate::engine::shutdown::ShutdownListener;
use crate::error::SinkError;
use crate::models::Alert;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Destination for the alert list pushed after every cycle
#[async_trait]
pub trait AlertSink: Send {
    async fn deliver(&mut self, alerts: &[Alert]) -> Result<(), SinkError>;
}

/// Channel-backed sink; the loop ends once the receiver is dropped
#[async_trait]
impl AlertSink for mpsc::Sender<Vec<Alert>> {
    async fn deliver(&mut self, alerts: &[Alert]) -> Result<(), SinkError> {
        self.send(alerts.to_vec())
            .await
            .map_err(|_| SinkError::Disconnected)
    }
}

/// Why a subscription loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionEnd {
    Cancelled,
    SinkClosed,
}

/// Evaluate and deliver every `interval` until cancelled or the sink fails
///
/// The first cycle runs immediately. A store read failure skips delivery for
/// that cycle only.
pub async fn run_subscription<S>(
    evaluator: Arc<AlertEvaluator>,
    mut sink: S,
    interval: Duration,
    mut shutdown: ShutdownListener,
) -> SubscriptionEnd
where
    S: AlertSink,
{
    info!(interval_ms = interval.as_millis() as u64, "Alert subscription started");

    loop {
        if shutdown.is_shutdown() {
            info!("Alert subscription cancelled");
            return SubscriptionEnd::Cancelled;
        }

        let cycle = tokio::select! {
            _ = shutdown.recv() => {
                info!("Alert subscription cancelled");
                return SubscriptionEnd::Cancelled;
            }
            cycle = evaluator.run_cycle() => cycle,
        };

        match cycle {
            Ok(alerts) => {
                // A subscriber that stops reading can stall the send indefinitely
                let delivered = tokio::select! {
                    _ = shutdown.recv() => {
                        info!("Alert subscription cancelled during delivery");
                        return SubscriptionEnd::Cancelled;
                    }
                    delivered = sink.deliver(&alerts) => delivered,
                };

                if let Err(e) = delivered {
                    warn!(error = %e, "Alert subscriber unreachable, ending subscription");
                    return SubscriptionEnd::SinkClosed;
                }
                debug!(count = alerts.len(), "Delivered alerts to subscriber");
            }
            Err(e) => {
                error!(error = %e, "Failed to load alerts, skipping this cycle");
            }
        }

        tokio::select! {
            _ = shutdown.recv() => {
                info!("Alert subscription cancelled");
                return SubscriptionEnd::Cancelled;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

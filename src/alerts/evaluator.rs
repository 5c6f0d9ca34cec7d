//! One evaluation cycle over every stored alert

use crate::alerts::trigger::{current_value, is_triggered};
use crate::db::AlertStore;
use crate::engine::snapshot::SnapshotHandle;
use crate::error::StoreError;
use crate::metrics::Metrics;
use crate::models::{Alert, AlertStatus};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Counts from a single cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub evaluated: usize,
    pub triggered: usize,
    pub failed_updates: usize,
}

/// Evaluates alerts against the shared snapshot and persists completions
pub struct AlertEvaluator {
    store: Arc<dyn AlertStore>,
    snapshot: SnapshotHandle,
    metrics: Option<Arc<Metrics>>,
}

impl AlertEvaluator {
    pub fn new(store: Arc<dyn AlertStore>, snapshot: SnapshotHandle) -> Self {
        Self {
            store,
            snapshot,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Run one cycle and return the full alert list to deliver
    ///
    /// A failed list aborts the cycle. A failed status write leaves that alert
    /// `pending` in the returned list so the next cycle retries it.
    pub async fn run_cycle(&self) -> Result<Vec<Alert>, StoreError> {
        self.run_cycle_with_report().await.map(|(alerts, _)| alerts)
    }

    pub async fn run_cycle_with_report(&self) -> Result<(Vec<Alert>, CycleReport), StoreError> {
        let mut alerts = match self.store.list_all().await {
            Ok(alerts) => alerts,
            Err(e) => {
                if let Some(ref metrics) = self.metrics {
                    metrics.alert_cycle_failures_total.inc();
                }
                return Err(e);
            }
        };

        let mut report = CycleReport::default();

        for alert in alerts.iter_mut().filter(|a| a.status.is_pending()) {
            report.evaluated += 1;

            let snapshot = self.snapshot.read().await;
            debug!(
                alert_id = alert.id,
                indicator = %alert.indicator,
                current = ?current_value(&alert.indicator, &snapshot),
                threshold = alert.value,
                "Evaluating alert"
            );

            if !is_triggered(alert, &snapshot) {
                continue;
            }

            match self.store.update_status(alert.id, AlertStatus::Completed).await {
                Ok(()) => {
                    alert.status = AlertStatus::Completed;
                    report.triggered += 1;
                    if let Some(ref metrics) = self.metrics {
                        metrics.alerts_triggered_total.inc();
                    }
                    info!(
                        alert_id = alert.id,
                        indicator = %alert.indicator,
                        direction = %alert.direction,
                        threshold = alert.value,
                        rsi = snapshot.rsi,
                        macd = snapshot.macd,
                        "Alert {} triggered",
                        alert.id
                    );
                }
                Err(e) => {
                    report.failed_updates += 1;
                    if let Some(ref metrics) = self.metrics {
                        metrics.alert_status_update_failures_total.inc();
                    }
                    warn!(
                        alert_id = alert.id,
                        error = %e,
                        "Failed to persist alert completion, will retry next cycle"
                    );
                }
            }
        }

        if let Some(ref metrics) = self.metrics {
            metrics.alert_cycles_total.inc();
        }

        Ok((alerts, report))
    }
}

//! Shared indicator snapshot: one publisher, many readers

use crate::models::IndicatorSnapshot;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cloneable handle to the process-wide [`IndicatorSnapshot`]
///
/// The pair is replaced as a whole under one lock, so a reader sees either the
/// snapshot before a publish or the one after it, never a mix.
#[derive(Debug, Clone, Default)]
pub struct SnapshotHandle {
    inner: Arc<RwLock<IndicatorSnapshot>>,
}

impl SnapshotHandle {
    /// Create a handle holding the zero snapshot
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn publish(&self, rsi: f64, macd: f64) -> IndicatorSnapshot {
        self.publish_at(rsi, macd, Utc::now()).await
    }

    pub async fn publish_at(
        &self,
        rsi: f64,
        macd: f64,
        computed_at: DateTime<Utc>,
    ) -> IndicatorSnapshot {
        let snapshot = IndicatorSnapshot::new(rsi, macd, computed_at);
        *self.inner.write().await = snapshot;
        snapshot
    }

    pub async fn read(&self) -> IndicatorSnapshot {
        *self.inner.read().await
    }
}

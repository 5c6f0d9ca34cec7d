//! Process-local alert store, used when no database is configured

use crate::db::AlertStore;
use crate::error::StoreError;
use crate::models::{Alert, AlertStatus, NewAlert};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: Vec<Alert>,
}

#[derive(Default)]
pub struct InMemoryAlertStore {
    table: RwLock<Table>,
}

impl InMemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AlertStore for InMemoryAlertStore {
    async fn create(&self, alert: NewAlert) -> Result<i64, StoreError> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let id = table.next_id;
        table.rows.push(alert.into_alert(id));
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<Alert>, StoreError> {
        Ok(self.table.read().await.rows.clone())
    }

    async fn update_status(&self, id: i64, status: AlertStatus) -> Result<(), StoreError> {
        let mut table = self.table.write().await;
        let row = table
            .rows
            .iter_mut()
            .find(|alert| alert.id == id)
            .ok_or(StoreError::NotFound(id))?;

        if !row.status.can_transition_to(status) {
            return Err(StoreError::InvalidTransition {
                id,
                from: row.status.to_string(),
                to: status.to_string(),
            });
        }

        row.status = status;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

//! PostgreSQL-backed alert store

use crate::db::AlertStore;
use crate::error::StoreError;
use crate::models::{Alert, AlertStatus, NewAlert};
use async_trait::async_trait;
use tokio_postgres::{Client, NoTls, Row};
use tracing::{error, info};

pub struct PostgresAlertStore {
    client: Client,
}

impl PostgresAlertStore {
    /// Connect and make sure the `alerts` table exists
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls).await?;

        // The connection object drives the socket; it lives in its own task
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "PostgreSQL connection error");
            }
        });

        let store = Self { client };
        store.init_schema().await?;
        info!("Alert store connected to PostgreSQL");

        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        self.client
            .execute(
                "CREATE TABLE IF NOT EXISTS alerts (
                    id BIGSERIAL PRIMARY KEY,
                    value DOUBLE PRECISION NOT NULL,
                    direction TEXT NOT NULL,
                    indicator TEXT NOT NULL,
                    status TEXT NOT NULL DEFAULT 'pending'
                )",
                &[],
            )
            .await?;
        Ok(())
    }
}

fn alert_from_row(row: &Row) -> Result<Alert, StoreError> {
    let status: String = row.try_get(4)?;
    Ok(Alert {
        id: row.try_get(0)?,
        value: row.try_get(1)?,
        direction: row.try_get::<_, String>(2)?.into(),
        indicator: row.try_get::<_, String>(3)?.into(),
        status: status.parse().map_err(StoreError::InvalidRow)?,
    })
}

#[async_trait]
impl AlertStore for PostgresAlertStore {
    async fn create(&self, alert: NewAlert) -> Result<i64, StoreError> {
        let row = self
            .client
            .query_one(
                "INSERT INTO alerts (value, direction, indicator) VALUES ($1, $2, $3) RETURNING id",
                &[&alert.value, &alert.direction.as_str(), &alert.indicator.as_str()],
            )
            .await?;
        Ok(row.try_get(0)?)
    }

    async fn list_all(&self) -> Result<Vec<Alert>, StoreError> {
        let rows = self
            .client
            .query(
                "SELECT id, value, direction, indicator, status FROM alerts ORDER BY id",
                &[],
            )
            .await?;
        rows.iter().map(alert_from_row).collect()
    }

    async fn update_status(&self, id: i64, status: AlertStatus) -> Result<(), StoreError> {
        // Only pending rows (or rows already at the target) may change, so completion never reverts
        let updated = self
            .client
            .execute(
                "UPDATE alerts SET status = $1 WHERE id = $2 AND (status = 'pending' OR status = $1)",
                &[&status.as_str(), &id],
            )
            .await?;

        if updated > 0 {
            return Ok(());
        }

        let current = self
            .client
            .query_opt("SELECT status FROM alerts WHERE id = $1", &[&id])
            .await?;

        match current {
            None => Err(StoreError::NotFound(id)),
            Some(row) => Err(StoreError::InvalidTransition {
                id,
                from: row.try_get(0)?,
                to: status.to_string(),
            }),
        }
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

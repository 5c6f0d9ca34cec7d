//! Alert persistence

pub mod memory;
pub mod postgres;

pub use memory::InMemoryAlertStore;
pub use postgres::PostgresAlertStore;

use crate::error::StoreError;
use crate::models::{Alert, AlertStatus, NewAlert};
use async_trait::async_trait;

/// Storage contract consumed by alert registration and evaluation
///
/// Implementations must apply each status update atomically per row and must
/// refuse to move a `completed` alert back to `pending`.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Insert a `pending` alert and return its id
    async fn create(&self, alert: NewAlert) -> Result<i64, StoreError>;

    /// Every stored alert, ordered by id
    async fn list_all(&self) -> Result<Vec<Alert>, StoreError>;

    async fn update_status(&self, id: i64, status: AlertStatus) -> Result<(), StoreError>;

    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;
}

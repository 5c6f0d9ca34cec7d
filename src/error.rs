//! Error types shared across the engine

use thiserror::Error;

/// Faults raised by the upstream candle feed
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("failed to connect to feed {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },

    #[error("feed read error: {0}")]
    Read(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("failed to decode kline message: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid close price {value:?}: {reason}")]
    InvalidPrice { value: String, reason: String },

    #[error("invalid close time {0}")]
    InvalidTimestamp(i64),

    #[error("invalid feed url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("feed closed by upstream")]
    Closed,

    #[error("gave up reconnecting after {attempts} attempts: {last}")]
    ReconnectExhausted { attempts: usize, last: String },

    #[error("ingestion task failed: {0}")]
    TaskFailed(String),
}

impl FeedError {
    /// Decode faults only affect the current message; everything else ends the stream.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FeedError::Decode(_) | FeedError::InvalidPrice { .. } | FeedError::InvalidTimestamp(_)
        )
    }
}

/// Faults raised by an alert store implementation
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("alert {0} not found")]
    NotFound(i64),

    #[error("alert {id} cannot move from {from} to {to}")]
    InvalidTransition { id: i64, from: String, to: String },

    #[error("invalid alert row: {0}")]
    InvalidRow(String),
}

/// Faults raised while pushing alerts to a subscriber
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("subscriber disconnected")]
    Disconnected,

    #[error("failed to serialize alerts: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Invalid environment configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Rejected alert registration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0} must be a finite number")]
    NotFinite(&'static str),
}

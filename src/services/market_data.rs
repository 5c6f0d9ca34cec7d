//! Market data feed interface, so ingestion can run against any message source.

use crate::error::FeedError;
use async_trait::async_trait;
use futures_util::stream::BoxStream;

/// Raw text frames from one live connection; the stream ends or errors when the connection drops
pub type FeedStream = BoxStream<'static, Result<String, FeedError>>;

#[async_trait]
pub trait FeedConnector: Send + Sync {
    /// Human-readable endpoint, used in logs
    fn endpoint(&self) -> &str;

    /// Open a new connection to the feed
    async fn connect(&self) -> Result<FeedStream, FeedError>;
}

//! WebSocket connector for the Binance kline stream

use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::services::market_data::{FeedConnector, FeedStream};
use async_trait::async_trait;
use futures_util::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info};
use url::Url;

pub struct BinanceKlineConnector {
    url: Url,
}

impl BinanceKlineConnector {
    pub fn new(feed: &FeedConfig) -> Result<Self, FeedError> {
        Self::with_url(&feed.stream_url())
    }

    pub fn with_url(url: &str) -> Result<Self, FeedError> {
        Ok(Self {
            url: Url::parse(url)?,
        })
    }
}

#[async_trait]
impl FeedConnector for BinanceKlineConnector {
    fn endpoint(&self) -> &str {
        self.url.as_str()
    }

    async fn connect(&self) -> Result<FeedStream, FeedError> {
        let (ws_stream, _response) =
            connect_async(self.url.as_str())
                .await
                .map_err(|source| FeedError::Connect {
                    url: self.url.to_string(),
                    source,
                })?;

        info!(url = %self.url, "Kline stream connected");

        let frames = ws_stream.filter_map(|message| async move {
            match message {
                Ok(Message::Text(text)) => Some(Ok(text)),
                Ok(Message::Close(frame)) => {
                    debug!(frame = ?frame, "Kline stream sent close frame");
                    Some(Err(FeedError::Closed))
                }
                // Ping/pong is answered by tungstenite itself
                Ok(_) => None,
                Err(e) => Some(Err(FeedError::Read(e))),
            }
        });

        Ok(frames.boxed())
    }
}

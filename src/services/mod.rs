//! Upstream market data: feed abstraction, Binance kline client, feed service

pub mod binance;
pub mod market_data;
pub mod websocket;

pub use market_data::{FeedConnector, FeedStream};

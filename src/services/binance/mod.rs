//! Binance futures kline stream

pub mod client;
pub mod messages;

pub use client::BinanceKlineConnector;
pub use messages::{decode_tick, Kline, KlineEvent};

//! Kline stream message types

use crate::error::FeedError;
use crate::models::PriceTick;
use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Kline event envelope, e.g. `btcusdt@kline_1m`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KlineEvent {
    #[serde(rename = "e", default)]
    pub event_type: String,
    #[serde(rename = "E")]
    pub event_time: u64,
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "k")]
    pub kline: Kline,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kline {
    #[serde(rename = "t")]
    pub start_time: i64,
    #[serde(rename = "T")]
    pub close_time: i64,
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "i")]
    pub interval: String,
    /// Close price, sent as a decimal string
    #[serde(rename = "c")]
    pub close: String,
    #[serde(rename = "x")]
    pub is_final: bool,
}

impl Kline {
    pub fn close_price(&self) -> Result<f64, FeedError> {
        let price: f64 = self.close.trim().parse().map_err(|e: std::num::ParseFloatError| {
            FeedError::InvalidPrice {
                value: self.close.clone(),
                reason: e.to_string(),
            }
        })?;

        if !price.is_finite() {
            return Err(FeedError::InvalidPrice {
                value: self.close.clone(),
                reason: "not a finite number".to_string(),
            });
        }

        Ok(price)
    }

    pub fn to_tick(&self) -> Result<PriceTick, FeedError> {
        let close_time = DateTime::from_timestamp_millis(self.close_time)
            .ok_or(FeedError::InvalidTimestamp(self.close_time))?;
        Ok(PriceTick::new(self.close_price()?, self.is_final, close_time))
    }
}

/// Decode one raw stream frame into a price tick
pub fn decode_tick(text: &str) -> Result<PriceTick, FeedError> {
    let event: KlineEvent = serde_json::from_str(text)?;
    event.kline.to_tick()
}

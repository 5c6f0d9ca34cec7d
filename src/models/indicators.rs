use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed closing price from the upstream kline stream
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceTick {
    pub close_price: f64,
    /// Whether this candle closes its sampling interval
    pub is_final: bool,
    pub close_time: DateTime<Utc>,
}

impl PriceTick {
    pub fn new(close_price: f64, is_final: bool, close_time: DateTime<Utc>) -> Self {
        Self {
            close_price,
            is_final,
            close_time,
        }
    }
}

/// Latest fully computed RSI/MACD pair
///
/// Both values always come from the same price window. `computed_at` stays
/// `None` until the first publication, while the values hold their zero default.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi: f64,
    pub macd: f64,
    pub computed_at: Option<DateTime<Utc>>,
}

impl IndicatorSnapshot {
    pub fn new(rsi: f64, macd: f64, computed_at: DateTime<Utc>) -> Self {
        Self {
            rsi,
            macd,
            computed_at: Some(computed_at),
        }
    }

    pub fn is_computed(&self) -> bool {
        self.computed_at.is_some()
    }
}

//! Append-only closing-price history for the tracked instrument

use crate::indicators::{calculate_macd, calculate_rsi, MACD_SLOW_PERIOD, RSI_PERIOD};
use crate::models::PriceTick;

/// Prices required before indicators are computed (the MACD slow period)
pub const MIN_PRICES: usize = MACD_SLOW_PERIOD;

/// Ordered closing prices, oldest first
///
/// History is never evicted or rewritten; the window only grows.
#[derive(Debug, Clone, Default)]
pub struct PriceWindow {
    prices: Vec<f64>,
}

impl PriceWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, tick: &PriceTick) {
        self.prices.push(tick.close_price);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn has_enough_history(&self) -> bool {
        self.prices.len() >= MIN_PRICES
    }

    /// Compute `(rsi, macd)` over the current window, `None` below [`MIN_PRICES`]
    pub fn indicators(&self) -> Option<(f64, f64)> {
        if !self.has_enough_history() {
            return None;
        }
        let macd = calculate_macd(&self.prices)?;
        let rsi = calculate_rsi(&self.prices, RSI_PERIOD);
        Some((rsi, macd))
    }
}

impl FromIterator<f64> for PriceWindow {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().collect(),
        }
    }
}

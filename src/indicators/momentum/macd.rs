//! MACD (Moving Average Convergence Divergence) line

use crate::indicators::trend::calculate_ema;

pub const MACD_FAST_PERIOD: usize = 12;
pub const MACD_SLOW_PERIOD: usize = 26;

/// Calculate the MACD line with the default periods (12, 26)
///
/// MACD = EMA(last 12 prices, 12) - EMA(last 26 prices, 26)
///
/// Both EMAs are recomputed from the trailing window on every call; no EMA
/// state is carried between ticks. Returns `None` below 26 prices.
pub fn calculate_macd(prices: &[f64]) -> Option<f64> {
    calculate_macd_with(prices, MACD_FAST_PERIOD, MACD_SLOW_PERIOD)
}

/// Calculate the MACD line for custom fast/slow periods
pub fn calculate_macd_with(prices: &[f64], fast_period: usize, slow_period: usize) -> Option<f64> {
    if fast_period == 0 || slow_period == 0 || prices.len() < fast_period.max(slow_period) {
        return None;
    }

    let fast = calculate_ema(&prices[prices.len() - fast_period..], fast_period)?;
    let slow = calculate_ema(&prices[prices.len() - slow_period..], slow_period)?;

    Some(fast - slow)
}

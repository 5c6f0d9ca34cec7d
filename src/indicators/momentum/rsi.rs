//! RSI (Relative Strength Index) indicator with Wilder smoothing

pub const RSI_PERIOD: usize = 14;

/// Calculate RSI over the whole price sequence
///
/// RSI = 100 - (100 / (1 + RS)), RS = Average Gain / Average Loss
///
/// The seed averages sum the first `period - 1` differences and divide by
/// `period`; every later difference is folded in with Wilder smoothing. A flat
/// difference takes the loss branch. Fewer than `period` prices yields `0.0`,
/// a zero average loss yields `100.0`.
pub fn calculate_rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period {
        return 0.0;
    }

    let periods = period as f64;
    let carried = (period - 1) as f64;

    let mut gains = 0.0;
    let mut losses = 0.0;
    for window in prices[..period].windows(2) {
        let difference = window[1] - window[0];
        if difference > 0.0 {
            gains += difference;
        } else {
            losses -= difference;
        }
    }

    let mut average_gain = gains / periods;
    let mut average_loss = losses / periods;

    for window in prices[period - 1..].windows(2) {
        let difference = window[1] - window[0];
        if difference > 0.0 {
            average_gain = ((average_gain * carried) + difference) / periods;
            average_loss = (average_loss * carried) / periods;
        } else {
            average_gain = (average_gain * carried) / periods;
            average_loss = ((average_loss * carried) - difference) / periods;
        }
    }

    if average_loss == 0.0 {
        return 100.0;
    }

    let rs = average_gain / average_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Calculate RSI with the default period (14)
pub fn calculate_rsi_default(prices: &[f64]) -> f64 {
    calculate_rsi(prices, RSI_PERIOD)
}

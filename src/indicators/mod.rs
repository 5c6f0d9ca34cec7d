//! Indicator calculators over closing-price sequences
//!
//! All calculators are pure: identical input yields bit-identical output.

pub mod momentum;
pub mod trend;

pub use momentum::{calculate_macd, calculate_rsi, MACD_FAST_PERIOD, MACD_SLOW_PERIOD, RSI_PERIOD};
pub use trend::{calculate_ema, ema_smoothing};

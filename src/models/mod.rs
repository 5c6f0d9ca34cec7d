//! Shared data models spanning the engine layers.

pub mod alert;
pub mod indicators;

pub use alert::{Alert, AlertDirection, AlertIndicator, AlertStatus, NewAlert};
pub use indicators::{IndicatorSnapshot, PriceTick};

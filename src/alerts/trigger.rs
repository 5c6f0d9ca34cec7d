//! The rule deciding whether an alert fires against a snapshot

use crate::models::{Alert, AlertDirection, AlertIndicator, IndicatorSnapshot};

/// Snapshot value an alert compares against, `None` for unrecognized indicators
pub fn current_value(indicator: &AlertIndicator, snapshot: &IndicatorSnapshot) -> Option<f64> {
    match indicator {
        AlertIndicator::Rsi => Some(snapshot.rsi),
        AlertIndicator::Macd => Some(snapshot.macd),
        AlertIndicator::Unrecognized(_) => None,
    }
}

/// Whether a pending alert's threshold is crossed
///
/// `up` fires strictly above the threshold and `down` strictly below it.
/// Completed alerts, unrecognized indicators or directions, and snapshots that
/// were never computed do not fire.
pub fn is_triggered(alert: &Alert, snapshot: &IndicatorSnapshot) -> bool {
    if !alert.status.is_pending() || !snapshot.is_computed() {
        return false;
    }

    let Some(current) = current_value(&alert.indicator, snapshot) else {
        return false;
    };

    match alert.direction {
        AlertDirection::Up => current > alert.value,
        AlertDirection::Down => current < alert.value,
        AlertDirection::Unrecognized(_) => false,
    }
}

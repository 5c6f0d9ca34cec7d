//! Threshold alert records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side of the threshold fires the alert
///
/// Stored as free text; anything other than `up`/`down` is kept verbatim and never fires.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlertDirection {
    Up,
    Down,
    Unrecognized(String),
}

impl AlertDirection {
    pub fn as_str(&self) -> &str {
        match self {
            AlertDirection::Up => "up",
            AlertDirection::Down => "down",
            AlertDirection::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for AlertDirection {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "up" => AlertDirection::Up,
            "down" => AlertDirection::Down,
            _ => AlertDirection::Unrecognized(raw),
        }
    }
}

impl From<&str> for AlertDirection {
    fn from(raw: &str) -> Self {
        AlertDirection::from(raw.to_string())
    }
}

impl From<AlertDirection> for String {
    fn from(direction: AlertDirection) -> Self {
        match direction {
            AlertDirection::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AlertDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indicator an alert compares against
///
/// Stored as free text; unknown names are kept verbatim and never fire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlertIndicator {
    Rsi,
    Macd,
    Unrecognized(String),
}

impl AlertIndicator {
    pub fn as_str(&self) -> &str {
        match self {
            AlertIndicator::Rsi => "RSI",
            AlertIndicator::Macd => "MACD",
            AlertIndicator::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for AlertIndicator {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "RSI" => AlertIndicator::Rsi,
            "MACD" => AlertIndicator::Macd,
            _ => AlertIndicator::Unrecognized(raw),
        }
    }
}

impl From<&str> for AlertIndicator {
    fn from(raw: &str) -> Self {
        AlertIndicator::from(raw.to_string())
    }
}

impl From<AlertIndicator> for String {
    fn from(indicator: AlertIndicator) -> Self {
        match indicator {
            AlertIndicator::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AlertIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert lifecycle: `Pending` moves to `Completed` once and never back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    #[default]
    Pending,
    Completed,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Pending => "pending",
            AlertStatus::Completed => "completed",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, AlertStatus::Pending)
    }

    /// Whether a stored status may be overwritten with `next`
    ///
    /// Re-applying the current status is allowed so that retried writes stay idempotent.
    pub fn can_transition_to(&self, next: AlertStatus) -> bool {
        match (self, next) {
            (AlertStatus::Pending, _) => true,
            (AlertStatus::Completed, AlertStatus::Completed) => true,
            (AlertStatus::Completed, AlertStatus::Pending) => false,
        }
    }
}

impl FromStr for AlertStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AlertStatus::Pending),
            "completed" => Ok(AlertStatus::Completed),
            other => Err(format!("unknown alert status {:?}", other)),
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub value: f64,
    pub direction: AlertDirection,
    pub indicator: AlertIndicator,
    pub status: AlertStatus,
}

/// Fields supplied when registering an alert; the store assigns id and status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAlert {
    pub value: f64,
    pub direction: AlertDirection,
    pub indicator: AlertIndicator,
}

impl NewAlert {
    pub fn new(
        value: f64,
        direction: impl Into<AlertDirection>,
        indicator: impl Into<AlertIndicator>,
    ) -> Self {
        Self {
            value,
            direction: direction.into(),
            indicator: indicator.into(),
        }
    }

    pub fn into_alert(self, id: i64) -> Alert {
        Alert {
            id,
            value: self.value,
            direction: self.direction,
            indicator: self.indicator,
            status: AlertStatus::Pending,
        }
    }
}

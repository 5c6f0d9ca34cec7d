//! Validation for incoming alert registrations

use crate::error::ValidationError;
use crate::models::NewAlert;
use serde::{Deserialize, Serialize};

/// Registration payload; every field is required
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAlertRequest {
    pub value: Option<f64>,
    pub direction: Option<String>,
    pub indicator: Option<String>,
}

impl CreateAlertRequest {
    /// Check presence of every field and build the alert to insert
    ///
    /// Unrecognized direction or indicator names are accepted and stored as
    /// given; they simply never fire.
    pub fn validate(self) -> Result<NewAlert, ValidationError> {
        let value = self.value.ok_or(ValidationError::MissingField("value"))?;
        if !value.is_finite() {
            return Err(ValidationError::NotFinite("value"));
        }

        let direction = required_text(self.direction, "direction")?;
        let indicator = required_text(self.indicator, "indicator")?;

        Ok(NewAlert::new(value, direction, indicator))
    }
}

fn required_text(field: Option<String>, name: &'static str) -> Result<String, ValidationError> {
    match field {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ValidationError::MissingField(name)),
    }
}

//! Unit tests for alert records and their JSON shape

use alertix::models::{Alert, AlertDirection, AlertIndicator, AlertStatus, NewAlert};
use serde_json::json;

#[test]
fn test_known_names_parse_exactly() {
    assert_eq!(AlertDirection::from("up"), AlertDirection::Up);
    assert_eq!(AlertDirection::from("down"), AlertDirection::Down);
    assert_eq!(AlertIndicator::from("RSI"), AlertIndicator::Rsi);
    assert_eq!(AlertIndicator::from("MACD"), AlertIndicator::Macd);
    assert_eq!(
        AlertIndicator::from("macd"),
        AlertIndicator::Unrecognized("macd".to_string())
    );
}

#[test]
fn test_alert_serializes_as_plain_text_fields() {
    let alert = NewAlert::new(70.0, "up", "RSI").into_alert(7);
    assert_eq!(
        serde_json::to_value(&alert).unwrap(),
        json!({
            "id": 7,
            "value": 70.0,
            "direction": "up",
            "indicator": "RSI",
            "status": "pending"
        })
    );
}

#[test]
fn test_unrecognized_text_round_trips_verbatim() {
    let raw = json!({
        "id": 3,
        "value": 1.0,
        "direction": "sideways",
        "indicator": "ADX",
        "status": "completed"
    });
    let alert: Alert = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(alert.direction.as_str(), "sideways");
    assert_eq!(alert.status, AlertStatus::Completed);
    assert_eq!(serde_json::to_value(&alert).unwrap(), raw);
}

#[test]
fn test_status_transitions_are_monotonic() {
    assert!(AlertStatus::Pending.can_transition_to(AlertStatus::Completed));
    assert!(AlertStatus::Completed.can_transition_to(AlertStatus::Completed));
    assert!(!AlertStatus::Completed.can_transition_to(AlertStatus::Pending));
    assert_eq!("completed".parse::<AlertStatus>(), Ok(AlertStatus::Completed));
    assert!("done".parse::<AlertStatus>().is_err());
}

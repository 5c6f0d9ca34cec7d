//! Unit tests for EMA indicator

use alertix::indicators::trend::{calculate_ema, ema_smoothing};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_ema_empty_input() {
    assert!(calculate_ema(&[], 12).is_none());
}

#[test]
fn test_ema_single_price_is_seed() {
    assert_eq!(calculate_ema(&[42.5], 12), Some(42.5));
}

#[test]
fn test_ema_smoothing_factor() {
    assert_close(ema_smoothing(3), 0.5);
    assert_close(ema_smoothing(12), 2.0 / 13.0);
}

#[test]
fn test_ema_uses_negative_carry_weight() {
    // k = 0.5: 1 -> 2*0.5 + 1*(-0.5) = 0.5 -> 3*0.5 + 0.5*(-0.5) = 1.25
    assert_close(calculate_ema(&[1.0, 2.0, 3.0], 3).unwrap(), 1.25);
}

#[test]
fn test_ema_reference_vectors() {
    let prices: Vec<f64> = (100..=125).map(f64::from).collect();
    assert_close(calculate_ema(&prices[14..], 12).unwrap(), -6.175442938271679);
    assert_close(calculate_ema(&prices, 26).unwrap(), -9.211299697526599);
}

#[test]
fn test_ema_is_deterministic() {
    let prices: Vec<f64> = (0..200).map(|i| 100.0 + (i as f64 * 0.37).sin()).collect();
    let first = calculate_ema(&prices, 26).unwrap();
    let second = calculate_ema(&prices, 26).unwrap();
    assert_eq!(first.to_bits(), second.to_bits());
}

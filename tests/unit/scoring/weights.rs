//! Unit tests for the indicator weight table

use sentiment_gauge::error::ConfigError;
use sentiment_gauge::models::IndicatorKind;
use sentiment_gauge::scoring::weights::WEIGHT_SUM_EPSILON;
use sentiment_gauge::scoring::IndicatorWeights;

#[test]
fn test_canonical_weights_sum_to_one() {
    let weights = IndicatorWeights::default();
    assert!((weights.sum() - 1.0).abs() < WEIGHT_SUM_EPSILON);
    assert!(weights.verify());
    assert!(weights.validate().is_ok());
}

#[test]
fn test_canonical_weights_per_indicator() {
    let weights = IndicatorWeights::default();
    assert_eq!(weights.get(IndicatorKind::Volatility), 0.20);
    assert_eq!(weights.get(IndicatorKind::Momentum), 0.15);
    assert_eq!(weights.get(IndicatorKind::SafeHaven), 0.12);
    assert_eq!(weights.get(IndicatorKind::Global), 0.01);
}

#[test]
fn test_unbalanced_weights_are_rejected() {
    let weights = IndicatorWeights {
        volatility: 0.5,
        ..IndicatorWeights::default()
    };
    match weights.validate() {
        Err(ConfigError::InvalidWeights { sum }) => assert!((sum - 1.3).abs() < 1e-9),
        other => panic!("expected InvalidWeights, got {:?}", other),
    }
}

#[test]
fn test_negative_weight_is_rejected() {
    let weights = IndicatorWeights {
        volatility: 0.30,
        global: -0.09,
        ..IndicatorWeights::default()
    };
    assert!((weights.sum() - 1.0).abs() < WEIGHT_SUM_EPSILON);
    assert!(!weights.verify());
}

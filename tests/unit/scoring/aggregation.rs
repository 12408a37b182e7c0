//! Unit tests for weighted aggregation

use std::collections::BTreeMap;

use sentiment_gauge::indicators::normalize_all;
use sentiment_gauge::models::{IndicatorKind, IndicatorReadings, SubScore};
use sentiment_gauge::scoring::{Aggregator, IndicatorWeights};

#[test]
fn test_all_missing_is_neutral() {
    let scores = BTreeMap::new();
    assert_eq!(Aggregator::aggregate(&scores, &IndicatorWeights::default()), 50);
}

#[test]
fn test_all_extremes() {
    let weights = IndicatorWeights::default();
    let max: BTreeMap<_, _> = IndicatorKind::ALL.iter().map(|&k| (k, SubScore::MAX)).collect();
    let min: BTreeMap<_, _> = IndicatorKind::ALL.iter().map(|&k| (k, SubScore::MIN)).collect();
    assert_eq!(Aggregator::aggregate(&max, &weights), 100);
    assert_eq!(Aggregator::aggregate(&min, &weights), 0);
}

#[test]
fn test_end_to_end_three_indicators() {
    let readings = IndicatorReadings::new()
        .with(IndicatorKind::Volatility, 15.0)
        .with(IndicatorKind::Momentum, 0.05)
        .with(IndicatorKind::PutCall, 0.85);

    let scores = normalize_all(&readings);

    assert_eq!(scores[&IndicatorKind::Volatility].value(), 86);
    assert_eq!(scores[&IndicatorKind::Momentum].value(), 75);
    assert_eq!(scores[&IndicatorKind::PutCall].value(), 70);
    assert_eq!(Aggregator::aggregate(&scores, &IndicatorWeights::default()), 63);
}

#[test]
fn test_missing_weights_are_not_renormalized() {
    let mut scores = BTreeMap::new();
    scores.insert(IndicatorKind::Volatility, SubScore::MAX);
    // 0.20 * 100 + 0.80 * 50
    assert_eq!(Aggregator::aggregate(&scores, &IndicatorWeights::default()), 60);
}

#[test]
fn test_contributions_mark_neutral_stand_ins() {
    let mut scores = BTreeMap::new();
    scores.insert(IndicatorKind::Momentum, SubScore::new(80).unwrap());

    let contributions = Aggregator::contributions(&scores, &IndicatorWeights::default());
    assert_eq!(contributions.len(), 13);

    let momentum = contributions
        .iter()
        .find(|c| c.kind == IndicatorKind::Momentum)
        .unwrap();
    assert!(momentum.available);
    assert!((momentum.points - 12.0).abs() < 1e-9);

    let volatility = contributions
        .iter()
        .find(|c| c.kind == IndicatorKind::Volatility)
        .unwrap();
    assert!(!volatility.available);
    assert_eq!(volatility.sub_score, SubScore::NEUTRAL);
}

#[test]
fn test_top_drivers_rank_by_weighted_pull() {
    let mut scores = BTreeMap::new();
    scores.insert(IndicatorKind::Volatility, SubScore::new(60).unwrap());
    scores.insert(IndicatorKind::Global, SubScore::new(100).unwrap());
    scores.insert(IndicatorKind::Momentum, SubScore::new(0).unwrap());

    let contributions = Aggregator::contributions(&scores, &IndicatorWeights::default());
    let drivers = Aggregator::top_drivers(&contributions, 2);
    let kinds: Vec<_> = drivers.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![IndicatorKind::Momentum, IndicatorKind::Volatility]);
}

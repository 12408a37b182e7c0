//! Unit tests for score primitives

use sentiment_gauge::models::{CompositeScore, Mood, ScoreOrigin, SubScore};

#[test]
fn test_sub_score_rounds_and_clamps() {
    assert_eq!(SubScore::from_f64(62.5).value(), 63);
    assert_eq!(SubScore::from_f64(62.49).value(), 62);
    assert_eq!(SubScore::from_f64(-3.0).value(), 0);
    assert_eq!(SubScore::from_f64(140.0).value(), 100);
    assert_eq!(SubScore::from_f64(f64::INFINITY), SubScore::NEUTRAL);
}

#[test]
fn test_sub_score_new_rejects_out_of_range() {
    assert_eq!(SubScore::new(100).map(|s| s.value()), Some(100));
    assert!(SubScore::new(101).is_none());
    assert!(SubScore::new(-1).is_none());
}

#[test]
fn test_mood_bands() {
    assert_eq!(Mood::from_score(0), Mood::ExtremeFear);
    assert_eq!(Mood::from_score(24), Mood::ExtremeFear);
    assert_eq!(Mood::from_score(25), Mood::Fear);
    assert_eq!(Mood::from_score(45), Mood::Neutral);
    assert_eq!(Mood::from_score(54), Mood::Neutral);
    assert_eq!(Mood::from_score(55), Mood::Greed);
    assert_eq!(Mood::from_score(75), Mood::ExtremeGreed);
    assert_eq!(Mood::from_score(100).label(), "Extreme Greed");
}

#[test]
fn test_composite_liveness() {
    assert!(CompositeScore::new(63, ScoreOrigin::Computed).is_live());
    assert!(!CompositeScore::new(63, ScoreOrigin::Previous).is_live());
    assert_eq!(CompositeScore::new(20, ScoreOrigin::Computed).mood, Mood::ExtremeFear);
}

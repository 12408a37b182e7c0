//! Indicator Normalizer: raw indicator value -> 0-100 sub-score
//!
//! Every rule is pure and stateless. Higher sub-score always means more greed.
//! Missing indicators never reach these functions; they are resolved to the
//! neutral default by the aggregator.

use std::collections::BTreeMap;

use super::registry::{
    rule_for, Band, Direction, NormalizationRule, BREADTH_BAND, ECONOMIC_BAND, GLOBAL_BAND,
    HISTORICAL_VOLATILITY_BAND, JUNK_SPREAD_BAND, MOMENTUM_BAND, PUT_CALL_BAND, RSI_BAND,
    SAFE_HAVEN_BAND, VOLATILITY_BAND, VOLUME_BAND,
};
use crate::models::{IndicatorKind, IndicatorReadings, SubScore};

/// Neutral stand-in for the momentum half of the technical blend
const TECHNICAL_MOMENTUM_TERM: f64 = 50.0;

/// Clamp to the band, rescale to [0, 100], invert if required
pub fn rescale(value: f64, band: Band, direction: Direction) -> SubScore {
    if !value.is_finite() || band.width() <= 0.0 {
        return SubScore::NEUTRAL;
    }
    let clamped = value.clamp(band.lo, band.hi);
    let fraction = match direction {
        Direction::Direct => (clamped - band.lo) / band.width(),
        Direction::Inverted => (band.hi - clamped) / band.width(),
    };
    SubScore::from_f64(fraction * 100.0)
}

/// VIX-like index level; calm markets score high
pub fn volatility_score(vix: f64) -> SubScore {
    rescale(vix, VOLATILITY_BAND, Direction::Inverted)
}

/// Fractional deviation of price from its 125-period moving average
pub fn momentum_score(deviation: f64) -> SubScore {
    rescale(deviation, MOMENTUM_BAND, Direction::Direct)
}

/// Equities return minus long-bond return over the same window
pub fn safe_haven_score(relative_return: f64) -> SubScore {
    rescale(relative_return, SAFE_HAVEN_BAND, Direction::Direct)
}

pub fn put_call_score(ratio: f64) -> SubScore {
    rescale(ratio, PUT_CALL_BAND, Direction::Inverted)
}

/// High-yield spread in percentage points
pub fn junk_spread_score(spread: f64) -> SubScore {
    rescale(spread, JUNK_SPREAD_BAND, Direction::Inverted)
}

/// Position within the trailing high/low range, 0.0 at the low and 1.0 at the high
pub fn breadth_score(position: f64) -> SubScore {
    rescale(position, BREADTH_BAND, Direction::Direct)
}

/// Breadth from the raw range; a zero-width range is neutral
pub fn breadth_from_range(current: f64, high: f64, low: f64) -> SubScore {
    if high.is_nan() || low.is_nan() || high <= low {
        return SubScore::NEUTRAL;
    }
    breadth_score((current - low) / (high - low))
}

/// Current volume over trailing average; heavy volume reads as fear
pub fn volume_score(ratio: f64) -> SubScore {
    rescale(ratio, VOLUME_BAND, Direction::Inverted)
}

/// Annualized standard deviation of daily returns
pub fn historical_volatility_score(annualized: f64) -> SubScore {
    rescale(annualized, HISTORICAL_VOLATILITY_BAND, Direction::Inverted)
}

/// Average pairwise correlation of equities against other assets
pub fn correlation_score(avg_correlation: f64) -> SubScore {
    SubScore::from_f64((1.0 - avg_correlation) * 100.0)
}

/// RSI(14) through the 30-70 band, averaged with a neutral momentum term.
/// The blend bounds this sub-score to [25, 75].
pub fn technical_score(rsi: f64) -> SubScore {
    let rsi_part = rescale(rsi, RSI_BAND, Direction::Direct);
    SubScore::from_f64((f64::from(rsi_part.value()) + TECHNICAL_MOMENTUM_TERM) / 2.0)
}

/// 10-year yield level; rising yields read as growth
pub fn economic_score(yield_pct: f64) -> SubScore {
    rescale(yield_pct, ECONOMIC_BAND, Direction::Direct)
}

/// Average period return across regional indices
pub fn global_score(avg_return: f64) -> SubScore {
    rescale(avg_return, GLOBAL_BAND, Direction::Direct)
}

/// Normalize one raw value by its indicator's rule.
///
/// A raw Sentiment value is taken as an already blended 0-100 score.
pub fn normalize(kind: IndicatorKind, raw: f64) -> SubScore {
    match rule_for(kind) {
        NormalizationRule::Banded { band, direction } => rescale(raw, band, direction),
        NormalizationRule::Decorrelation => correlation_score(raw),
        NormalizationRule::Precomputed => SubScore::from_f64(raw),
        NormalizationRule::RsiBlend { .. } => technical_score(raw),
    }
}

/// Normalize every available reading. Kinds without a reading are left out.
pub fn normalize_all(readings: &IndicatorReadings) -> BTreeMap<IndicatorKind, SubScore> {
    readings
        .iter()
        .filter_map(|r| r.reading.value().map(|raw| (r.kind, normalize(r.kind, raw))))
        .collect()
}

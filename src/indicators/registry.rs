//! Normalization rule table: one empirically chosen band per indicator

use crate::models::IndicatorKind;

/// Whether a higher raw value means more greed (`Direct`) or more fear (`Inverted`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Direct,
    Inverted,
}

/// Closed clamp band `[lo, hi]` with `lo < hi`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub lo: f64,
    pub hi: f64,
}

impl Band {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }
}

pub const VOLATILITY_BAND: Band = Band::new(10.0, 45.0);
pub const MOMENTUM_BAND: Band = Band::new(-0.10, 0.10);
pub const SAFE_HAVEN_BAND: Band = Band::new(-0.20, 0.20);
pub const PUT_CALL_BAND: Band = Band::new(0.70, 1.20);
pub const JUNK_SPREAD_BAND: Band = Band::new(2.0, 8.0);
/// Breadth readings are a position within the trailing range, 0 at the low and 1 at the high
pub const BREADTH_BAND: Band = Band::new(0.0, 1.0);
pub const VOLUME_BAND: Band = Band::new(0.5, 2.0);
pub const HISTORICAL_VOLATILITY_BAND: Band = Band::new(0.10, 0.40);
pub const RSI_BAND: Band = Band::new(30.0, 70.0);
pub const ECONOMIC_BAND: Band = Band::new(1.0, 5.0);
pub const GLOBAL_BAND: Band = Band::new(-0.10, 0.10);

/// How one indicator's raw value becomes a sub-score
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizationRule {
    /// Clamp to the band, rescale linearly to [0, 100], optionally invert
    Banded { band: Band, direction: Direction },
    /// `(1 - average correlation) * 100`, no band
    Decorrelation,
    /// Raw value is already a 0-100 score (the collector's Volatility and
    /// Put/Call blend); only rounded and clamped
    Precomputed,
    /// RSI through its band, blended 50/50 with a neutral momentum term
    RsiBlend { band: Band },
}

pub fn rule_for(kind: IndicatorKind) -> NormalizationRule {
    use Direction::*;
    use NormalizationRule::*;

    match kind {
        IndicatorKind::Volatility => Banded {
            band: VOLATILITY_BAND,
            direction: Inverted,
        },
        IndicatorKind::Momentum => Banded {
            band: MOMENTUM_BAND,
            direction: Direct,
        },
        IndicatorKind::SafeHaven => Banded {
            band: SAFE_HAVEN_BAND,
            direction: Direct,
        },
        IndicatorKind::PutCall => Banded {
            band: PUT_CALL_BAND,
            direction: Inverted,
        },
        IndicatorKind::JunkSpread => Banded {
            band: JUNK_SPREAD_BAND,
            direction: Inverted,
        },
        IndicatorKind::Breadth => Banded {
            band: BREADTH_BAND,
            direction: Direct,
        },
        IndicatorKind::Volume => Banded {
            band: VOLUME_BAND,
            direction: Inverted,
        },
        IndicatorKind::HistoricalVolatility => Banded {
            band: HISTORICAL_VOLATILITY_BAND,
            direction: Inverted,
        },
        IndicatorKind::Correlation => Decorrelation,
        IndicatorKind::Sentiment => Precomputed,
        IndicatorKind::Technical => RsiBlend { band: RSI_BAND },
        IndicatorKind::Economic => Banded {
            band: ECONOMIC_BAND,
            direction: Direct,
        },
        IndicatorKind::Global => Banded {
            band: GLOBAL_BAND,
            direction: Direct,
        },
    }
}

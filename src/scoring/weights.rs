//! Indicator weight table (13-indicator scheme)

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::IndicatorKind;

/// Tolerance on the weight sum
pub const WEIGHT_SUM_EPSILON: f64 = 1e-3;

/// Canonical weights
pub struct CanonicalWeights;

impl CanonicalWeights {
    pub const VOLATILITY: f64 = 0.20;
    pub const MOMENTUM: f64 = 0.15;
    pub const SAFE_HAVEN: f64 = 0.12;
    pub const PUT_CALL: f64 = 0.10;
    pub const JUNK_SPREAD: f64 = 0.08;
    pub const BREADTH: f64 = 0.08;
    pub const VOLUME: f64 = 0.05;
    pub const HISTORICAL_VOLATILITY: f64 = 0.08;
    pub const CORRELATION: f64 = 0.05;
    pub const SENTIMENT: f64 = 0.04;
    pub const TECHNICAL: f64 = 0.03;
    pub const ECONOMIC: f64 = 0.01;
    pub const GLOBAL: f64 = 0.01;
}

/// Weight per indicator; must sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorWeights {
    pub volatility: f64,
    pub momentum: f64,
    pub safe_haven: f64,
    pub put_call: f64,
    pub junk_spread: f64,
    pub breadth: f64,
    pub volume: f64,
    pub historical_volatility: f64,
    pub correlation: f64,
    pub sentiment: f64,
    pub technical: f64,
    pub economic: f64,
    pub global: f64,
}

impl Default for IndicatorWeights {
    fn default() -> Self {
        Self {
            volatility: CanonicalWeights::VOLATILITY,
            momentum: CanonicalWeights::MOMENTUM,
            safe_haven: CanonicalWeights::SAFE_HAVEN,
            put_call: CanonicalWeights::PUT_CALL,
            junk_spread: CanonicalWeights::JUNK_SPREAD,
            breadth: CanonicalWeights::BREADTH,
            volume: CanonicalWeights::VOLUME,
            historical_volatility: CanonicalWeights::HISTORICAL_VOLATILITY,
            correlation: CanonicalWeights::CORRELATION,
            sentiment: CanonicalWeights::SENTIMENT,
            technical: CanonicalWeights::TECHNICAL,
            economic: CanonicalWeights::ECONOMIC,
            global: CanonicalWeights::GLOBAL,
        }
    }
}

impl IndicatorWeights {
    pub fn get(&self, kind: IndicatorKind) -> f64 {
        match kind {
            IndicatorKind::Volatility => self.volatility,
            IndicatorKind::Momentum => self.momentum,
            IndicatorKind::SafeHaven => self.safe_haven,
            IndicatorKind::PutCall => self.put_call,
            IndicatorKind::JunkSpread => self.junk_spread,
            IndicatorKind::Breadth => self.breadth,
            IndicatorKind::Volume => self.volume,
            IndicatorKind::HistoricalVolatility => self.historical_volatility,
            IndicatorKind::Correlation => self.correlation,
            IndicatorKind::Sentiment => self.sentiment,
            IndicatorKind::Technical => self.technical,
            IndicatorKind::Economic => self.economic,
            IndicatorKind::Global => self.global,
        }
    }

    pub fn sum(&self) -> f64 {
        IndicatorKind::ALL.iter().map(|&k| self.get(k)).sum()
    }

    /// Verify weights sum to 1.0 and none is negative
    pub fn verify(&self) -> bool {
        (self.sum() - 1.0).abs() < WEIGHT_SUM_EPSILON
            && IndicatorKind::ALL.iter().all(|&k| self.get(k) >= 0.0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.verify() {
            Ok(())
        } else {
            Err(ConfigError::InvalidWeights { sum: self.sum() })
        }
    }
}

//! Affine compression of a score toward the neutral midpoint

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_STOCK_CALIBRATION;
use crate::error::ConfigError;
use crate::models::{SubScore, NEUTRAL_SCORE};

/// `round(clamp(50 + (score - 50) * factor, 0, 100))`, factor in (0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    factor: f64,
}

impl Calibration {
    pub fn new(factor: f64) -> Result<Self, ConfigError> {
        if factor.is_finite() && factor > 0.0 && factor <= 1.0 {
            Ok(Self { factor })
        } else {
            Err(ConfigError::InvalidCalibration(factor))
        }
    }

    /// Keeps a third of the deviation from neutral
    pub fn stock_default() -> Self {
        Self {
            factor: DEFAULT_STOCK_CALIBRATION,
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn apply(&self, score: u8) -> u8 {
        let midpoint = f64::from(NEUTRAL_SCORE);
        let clamped = f64::from(score.min(100));
        SubScore::from_f64(midpoint + (clamped - midpoint) * self.factor).value()
    }
}

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The thirteen market indicators feeding the composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Volatility,
    Momentum,
    SafeHaven,
    PutCall,
    JunkSpread,
    Breadth,
    Volume,
    HistoricalVolatility,
    Correlation,
    Sentiment,
    Technical,
    Economic,
    Global,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 13] = [
        IndicatorKind::Volatility,
        IndicatorKind::Momentum,
        IndicatorKind::SafeHaven,
        IndicatorKind::PutCall,
        IndicatorKind::JunkSpread,
        IndicatorKind::Breadth,
        IndicatorKind::Volume,
        IndicatorKind::HistoricalVolatility,
        IndicatorKind::Correlation,
        IndicatorKind::Sentiment,
        IndicatorKind::Technical,
        IndicatorKind::Economic,
        IndicatorKind::Global,
    ];

    /// Stable snake_case identifier, used in JSON and metric labels
    pub fn key(&self) -> &'static str {
        match self {
            IndicatorKind::Volatility => "volatility",
            IndicatorKind::Momentum => "momentum",
            IndicatorKind::SafeHaven => "safe_haven",
            IndicatorKind::PutCall => "put_call",
            IndicatorKind::JunkSpread => "junk_spread",
            IndicatorKind::Breadth => "breadth",
            IndicatorKind::Volume => "volume",
            IndicatorKind::HistoricalVolatility => "historical_volatility",
            IndicatorKind::Correlation => "correlation",
            IndicatorKind::Sentiment => "sentiment",
            IndicatorKind::Technical => "technical",
            IndicatorKind::Economic => "economic",
            IndicatorKind::Global => "global",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            IndicatorKind::Volatility => "Volatility (VIX)",
            IndicatorKind::Momentum => "Market Momentum",
            IndicatorKind::SafeHaven => "Safe Haven Demand",
            IndicatorKind::PutCall => "Put/Call Ratio",
            IndicatorKind::JunkSpread => "Junk Bond Spread",
            IndicatorKind::Breadth => "Price Breadth",
            IndicatorKind::Volume => "Market Volume",
            IndicatorKind::HistoricalVolatility => "Historical Volatility",
            IndicatorKind::Correlation => "Asset Correlation",
            IndicatorKind::Sentiment => "Sentiment",
            IndicatorKind::Technical => "Technical",
            IndicatorKind::Economic => "Economic",
            IndicatorKind::Global => "Global Markets",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for IndicatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IndicatorKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| format!("unknown indicator '{}'", s))
    }
}

/// Raw value for one indicator, or the fact that it could not be obtained
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Reading {
    Available(f64),
    Unavailable,
}

impl Reading {
    /// Non-finite values count as unparseable, hence unavailable
    pub fn from_value(value: f64) -> Self {
        if value.is_finite() {
            Reading::Available(value)
        } else {
            Reading::Unavailable
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Reading::Available(v) => Some(*v),
            Reading::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Reading::Available(_))
    }
}

impl From<Option<f64>> for Reading {
    fn from(value: Option<f64>) -> Self {
        value.map(Reading::from_value).unwrap_or(Reading::Unavailable)
    }
}

/// One raw measurement for one indicator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorReading {
    pub kind: IndicatorKind,
    pub reading: Reading,
}

/// Raw readings for a scoring pass. Kinds never set are unavailable.
///
/// Serializes as a map of indicator key to optional number, e.g.
/// `{"volatility": 15.0, "put_call": null}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<IndicatorKind, Option<f64>>", into = "BTreeMap<IndicatorKind, Option<f64>>")]
pub struct IndicatorReadings {
    readings: BTreeMap<IndicatorKind, Reading>,
}

impl IndicatorReadings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: IndicatorKind, value: f64) -> Self {
        self.set(kind, Reading::from_value(value));
        self
    }

    pub fn set(&mut self, kind: IndicatorKind, reading: Reading) {
        self.readings.insert(kind, reading);
    }

    pub fn get(&self, kind: IndicatorKind) -> Reading {
        self.readings
            .get(&kind)
            .copied()
            .unwrap_or(Reading::Unavailable)
    }

    /// Every kind, in canonical order, including unavailable ones
    pub fn iter(&self) -> impl Iterator<Item = IndicatorReading> + '_ {
        IndicatorKind::ALL.iter().map(move |&kind| IndicatorReading {
            kind,
            reading: self.get(kind),
        })
    }

    pub fn available_count(&self) -> usize {
        self.readings.values().filter(|r| r.is_available()).count()
    }
}

impl From<BTreeMap<IndicatorKind, Option<f64>>> for IndicatorReadings {
    fn from(map: BTreeMap<IndicatorKind, Option<f64>>) -> Self {
        Self {
            readings: map.into_iter().map(|(k, v)| (k, Reading::from(v))).collect(),
        }
    }
}

impl From<IndicatorReadings> for BTreeMap<IndicatorKind, Option<f64>> {
    fn from(readings: IndicatorReadings) -> Self {
        readings
            .readings
            .into_iter()
            .map(|(k, r)| (k, r.value()))
            .collect()
    }
}

impl FromIterator<IndicatorReading> for IndicatorReadings {
    fn from_iter<I: IntoIterator<Item = IndicatorReading>>(iter: I) -> Self {
        let mut readings = IndicatorReadings::new();
        for r in iter {
            readings.set(r.kind, r.reading);
        }
        readings
    }
}

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::indicators::IndicatorKind;

/// Score used whenever there is nothing better to report
pub const NEUTRAL_SCORE: u8 = 50;

/// Normalized 0-100 contribution of one indicator. Always within [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubScore(u8);

impl SubScore {
    pub const NEUTRAL: SubScore = SubScore(NEUTRAL_SCORE);
    pub const MIN: SubScore = SubScore(0);
    pub const MAX: SubScore = SubScore(100);

    /// Round to nearest and clamp; non-finite input yields neutral
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Self::NEUTRAL;
        }
        SubScore(value.round().clamp(0.0, 100.0) as u8)
    }

    /// Accepts an already-normalized integer score
    pub fn new(value: i64) -> Option<Self> {
        (0..=100).contains(&value).then_some(SubScore(value as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Fear & greed classification bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    ExtremeGreed,
}

impl Mood {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=24 => Mood::ExtremeFear,
            25..=44 => Mood::Fear,
            45..=54 => Mood::Neutral,
            55..=74 => Mood::Greed,
            _ => Mood::ExtremeGreed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::ExtremeFear => "Extreme Fear",
            Mood::Fear => "Fear",
            Mood::Neutral => "Neutral",
            Mood::Greed => "Greed",
            Mood::ExtremeGreed => "Extreme Greed",
        }
    }
}

/// Where the reported score came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreOrigin {
    /// Freshly fetched (or within the refetch interval) external composite
    Authoritative,
    /// Last cached external composite, served after a failed refetch
    CachedAuthoritative,
    /// Local Normalizer + Aggregator pipeline over raw indicators
    Computed,
    /// Published daily aggregate document
    DailySnapshot,
    /// Nothing new was committed; the persisted score is surfaced unchanged
    Previous,
}

impl ScoreOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreOrigin::Authoritative => "authoritative",
            ScoreOrigin::CachedAuthoritative => "cached_authoritative",
            ScoreOrigin::Computed => "computed",
            ScoreOrigin::DailySnapshot => "daily_snapshot",
            ScoreOrigin::Previous => "previous",
        }
    }

    pub fn is_fallback_to_previous(&self) -> bool {
        matches!(self, ScoreOrigin::Previous)
    }
}

/// Aggregation output for one scoring pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    /// The series' current score after this pass
    pub final_score: u8,
    /// Weighted aggregate before calibration, when one was computed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_score: Option<u8>,
    pub sub_scores: BTreeMap<IndicatorKind, SubScore>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub unavailable: Vec<IndicatorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration_factor: Option<f64>,
    pub origin: ScoreOrigin,
    pub mood: Mood,
    pub computed_at: DateTime<Utc>,
}

impl CompositeScore {
    pub fn new(final_score: u8, origin: ScoreOrigin) -> Self {
        Self {
            final_score,
            raw_score: None,
            sub_scores: BTreeMap::new(),
            unavailable: Vec::new(),
            calibration_factor: None,
            origin,
            mood: Mood::from_score(final_score),
            computed_at: Utc::now(),
        }
    }

    pub fn is_live(&self) -> bool {
        !self.origin.is_fallback_to_previous()
    }

    pub fn sub_score(&self, kind: IndicatorKind) -> Option<SubScore> {
        self.sub_scores.get(&kind).copied()
    }

    pub(crate) fn with_final_score(mut self, final_score: u8, origin: ScoreOrigin) -> Self {
        self.final_score = final_score;
        self.origin = origin;
        self.mood = Mood::from_score(final_score);
        self
    }
}

/// Soft warnings attached to an otherwise successful pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreWarning {
    /// A candidate outside [0, 100] or non-integral was discarded
    InvalidScore { attempted: f64 },
}

/// Result of a full pass through the fallback cascade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub series: String,
    /// Tier that produced the candidate score
    pub source: ScoreOrigin,
    pub composite: CompositeScore,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<ScoreWarning>,
}

impl ScoreReport {
    pub fn score(&self) -> u8 {
        self.composite.final_score
    }
}

//! Published daily aggregate document, the deepest fallback tier.
//!
//! ```json
//! {
//!   "asOf": "2025-05-11",
//!   "metrics": { "vix": 18.2, "currentSP": 5600.0, ... },
//!   "scores": { "vixScore": 77, "momentumScore": 64, ..., "finalScore": 61 }
//! }
//! ```
//!
//! Older documents predate the newer indicators; any missing score field is
//! treated as an unavailable indicator.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::indicators::IndicatorKind;
use super::score::SubScore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySnapshot {
    #[serde(alias = "timestamp")]
    pub as_of: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<HashMap<String, f64>>,
    pub scores: SnapshotScores,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotScores {
    #[serde(default)]
    pub vix_score: Option<i64>,
    #[serde(default)]
    pub momentum_score: Option<i64>,
    #[serde(default)]
    pub safe_haven_score: Option<i64>,
    #[serde(default)]
    pub put_call_score: Option<i64>,
    #[serde(default)]
    pub junk_score: Option<i64>,
    #[serde(default)]
    pub breadth_score: Option<i64>,
    #[serde(default)]
    pub volume_score: Option<i64>,
    #[serde(default)]
    pub volatility_score: Option<i64>,
    #[serde(default)]
    pub correlation_score: Option<i64>,
    #[serde(default)]
    pub sentiment_score: Option<i64>,
    #[serde(default)]
    pub technical_score: Option<i64>,
    #[serde(default)]
    pub economic_score: Option<i64>,
    #[serde(default)]
    pub global_score: Option<i64>,
    #[serde(default)]
    pub final_score: Option<i64>,
}

impl SnapshotScores {
    /// Published score for one indicator, as written
    pub fn get(&self, kind: IndicatorKind) -> Option<i64> {
        match kind {
            IndicatorKind::Volatility => self.vix_score,
            IndicatorKind::Momentum => self.momentum_score,
            IndicatorKind::SafeHaven => self.safe_haven_score,
            IndicatorKind::PutCall => self.put_call_score,
            IndicatorKind::JunkSpread => self.junk_score,
            IndicatorKind::Breadth => self.breadth_score,
            IndicatorKind::Volume => self.volume_score,
            // the document's "volatility" is realized volatility; VIX is "vix"
            IndicatorKind::HistoricalVolatility => self.volatility_score,
            IndicatorKind::Correlation => self.correlation_score,
            IndicatorKind::Sentiment => self.sentiment_score,
            IndicatorKind::Technical => self.technical_score,
            IndicatorKind::Economic => self.economic_score,
            IndicatorKind::Global => self.global_score,
        }
    }

    /// Valid sub-scores only; absent or out-of-range fields are left out
    pub fn sub_scores(&self) -> BTreeMap<IndicatorKind, SubScore> {
        IndicatorKind::ALL
            .iter()
            .filter_map(|&kind| {
                self.get(kind)
                    .and_then(SubScore::new)
                    .map(|score| (kind, score))
            })
            .collect()
    }
}

//! Consistency checks between published and recomputed scores

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{debug, warn};

use crate::indicators::momentum::relative_deviation;
use crate::indicators::{
    breadth_from_range, junk_spread_score, momentum_score, put_call_score, volatility_score,
};
use crate::models::{DailySnapshot, IndicatorKind, SubScore};

/// Published and recomputed scores further apart than this are suspicious
pub const DIVERGENCE_TOLERANCE: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Divergence {
    pub published: u8,
    pub recomputed: u8,
    pub difference: u8,
    pub within_tolerance: bool,
}

impl Divergence {
    pub fn between(published: u8, recomputed: u8) -> Self {
        let difference = published.abs_diff(recomputed);
        Self {
            published,
            recomputed,
            difference,
            within_tolerance: difference <= DIVERGENCE_TOLERANCE,
        }
    }
}

/// Recompute the directly derivable sub-scores from a snapshot's raw metrics.
///
/// Needs `vix`, `currentSP`, `ma125`, `putCall`, `junkSpread`, `spHigh`,
/// `spLow`; returns `None` if any is missing or the range is empty.
pub fn recompute_from_metrics(
    metrics: &HashMap<String, f64>,
) -> Option<BTreeMap<IndicatorKind, SubScore>> {
    let get = |key: &str| metrics.get(key).copied().filter(|v| v.is_finite());

    let vix = get("vix")?;
    let current = get("currentSP")?;
    let ma125 = get("ma125")?;
    let put_call = get("putCall")?;
    let junk = get("junkSpread")?;
    let high = get("spHigh")?;
    let low = get("spLow")?;
    if high <= low {
        return None;
    }

    let mut scores = BTreeMap::new();
    scores.insert(IndicatorKind::Volatility, volatility_score(vix));
    scores.insert(
        IndicatorKind::Momentum,
        momentum_score(relative_deviation(current, ma125)?),
    );
    scores.insert(IndicatorKind::PutCall, put_call_score(put_call));
    scores.insert(IndicatorKind::JunkSpread, junk_spread_score(junk));
    scores.insert(IndicatorKind::Breadth, breadth_from_range(current, high, low));
    Some(scores)
}

/// Per-indicator absolute differences between published and recomputed sub-scores
pub fn metric_differences(snapshot: &DailySnapshot) -> Option<BTreeMap<IndicatorKind, u8>> {
    let recomputed = recompute_from_metrics(snapshot.metrics.as_ref()?)?;
    let published = snapshot.scores.sub_scores();
    Some(
        recomputed
            .iter()
            .filter_map(|(kind, score)| {
                published
                    .get(kind)
                    .map(|p| (*kind, p.value().abs_diff(score.value())))
            })
            .collect(),
    )
}

/// Log how a snapshot's published numbers compare with a canonical recomputation
pub fn inspect_snapshot(snapshot: &DailySnapshot, recomputed_final: u8) -> Option<Divergence> {
    match metric_differences(snapshot) {
        Some(diffs) => {
            for (kind, diff) in &diffs {
                debug!(indicator = %kind, difference = *diff, "snapshot metric vs published score");
            }
        }
        None => debug!(as_of = %snapshot.as_of, "snapshot lacks metrics, skipping recomputation check"),
    }

    let published = snapshot
        .scores
        .final_score
        .and_then(SubScore::new)
        .map(|s| s.value())?;
    let divergence = Divergence::between(published, recomputed_final);
    if !divergence.within_tolerance {
        warn!(
            as_of = %snapshot.as_of,
            published = divergence.published,
            recomputed = divergence.recomputed,
            difference = divergence.difference,
            "published final score diverges from recomputation"
        );
    }
    Some(divergence)
}

//! Weighted aggregation of sub-scores into the composite score

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{IndicatorKind, SubScore};
use crate::scoring::weights::IndicatorWeights;

/// One indicator's share of the final score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Contribution {
    pub kind: IndicatorKind,
    pub sub_score: SubScore,
    pub weight: f64,
    /// `weight * sub_score`
    pub points: f64,
    /// False when the neutral default stood in for a missing indicator
    pub available: bool,
}

pub struct Aggregator;

impl Aggregator {
    /// Per-indicator contributions in canonical order. Missing indicators
    /// contribute the neutral default at their full weight; the remaining
    /// weights are not renormalized.
    pub fn contributions(
        sub_scores: &BTreeMap<IndicatorKind, SubScore>,
        weights: &IndicatorWeights,
    ) -> Vec<Contribution> {
        IndicatorKind::ALL
            .iter()
            .map(|&kind| {
                let available = sub_scores.get(&kind).copied();
                let sub_score = available.unwrap_or(SubScore::NEUTRAL);
                let weight = weights.get(kind);
                Contribution {
                    kind,
                    sub_score,
                    weight,
                    points: weight * f64::from(sub_score.value()),
                    available: available.is_some(),
                }
            })
            .collect()
    }

    /// `round(sum(weight_i * sub_score_i))`, clamped to [0, 100]
    pub fn aggregate(
        sub_scores: &BTreeMap<IndicatorKind, SubScore>,
        weights: &IndicatorWeights,
    ) -> u8 {
        let total: f64 = Self::contributions(sub_scores, weights)
            .iter()
            .map(|c| c.points)
            .sum();
        SubScore::from_f64(total).value()
    }

    /// Largest absolute deviations from neutral, for explaining a score
    pub fn top_drivers(contributions: &[Contribution], count: usize) -> Vec<Contribution> {
        let mut drivers: Vec<Contribution> =
            contributions.iter().filter(|c| c.available).copied().collect();
        drivers.sort_by(|a, b| {
            let pull = |c: &Contribution| c.weight * (f64::from(c.sub_score.value()) - 50.0).abs();
            pull(b).total_cmp(&pull(a))
        });
        drivers.truncate(count);
        drivers
    }
}

//! Composite scoring: weights, aggregation, calibration and the commit step

pub mod aggregation;
pub mod calibration;
pub mod diagnostics;
pub mod engine;
pub mod weights;

pub use aggregation::{Aggregator, Contribution};
pub use calibration::Calibration;
pub use diagnostics::{inspect_snapshot, Divergence, DIVERGENCE_TOLERANCE};
pub use engine::{CommitResult, ScoringEngine};
pub use weights::{CanonicalWeights, IndicatorWeights};

//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod score;
pub mod series;
pub mod snapshot;

pub use indicators::{IndicatorKind, IndicatorReading, IndicatorReadings, Reading};
pub use score::{
    CompositeScore, Mood, ScoreOrigin, ScoreReport, ScoreWarning, SubScore, NEUTRAL_SCORE,
};
pub use series::{MarketSeries, ScoreEntry, SeriesDelta, DEFAULT_HISTORY_CAPACITY};
pub use snapshot::{DailySnapshot, SnapshotScores};

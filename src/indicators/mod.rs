//! Indicator Normalizer and the raw-metric derivations that feed it.
//!
//! `normalize` maps one raw reading to a sub-score. The `momentum`,
//! `volatility` and `structure` modules turn price/volume series into those
//! raw readings; they return `None` when the input is too short or degenerate.

pub mod momentum;
pub mod normalize;
pub mod registry;
pub mod structure;
pub mod volatility;

pub use normalize::*;
pub use registry::*;

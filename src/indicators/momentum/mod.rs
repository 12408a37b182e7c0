//! Momentum derivations: moving-average deviation, RSI

pub mod moving_average;
pub mod rsi;

pub use moving_average::*;
pub use rsi::*;

//! Volatility derivations

pub mod historical;

pub use historical::*;

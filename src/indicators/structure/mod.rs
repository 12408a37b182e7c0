//! Market structure derivations: range position, correlation, returns

pub mod correlation;
pub mod range;

pub use correlation::*;
pub use range::*;

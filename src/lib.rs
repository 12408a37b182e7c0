//! Market sentiment scoring engine.
//!
//! Raw indicator values are normalized into 0-100 sub-scores, aggregated with a
//! fixed weight table into a composite "fear & greed" score, and committed to a
//! bounded per-series history that downstream consumers read between passes.

pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod scoring;
pub mod sources;
pub mod store;

//! Core application primitives (pipeline, wiring, HTTP surface)

pub mod bootstrap;
pub mod http;
pub mod pipeline;

pub use bootstrap::*;
pub use http::*;
pub use pipeline::*;

//! rwgate demos - shared pieces
//!
//! Logging setup and the reader/writer race driven by the `rwgate-demo`
//! binary.

pub mod logging;
pub mod racing;

pub use racing::{DemoConfig, DemoReport};

//! Layercut Common Utilities
//!
//! Shared infrastructure for all Layercut crates:
//! - Error types and result aliases
//! - Frame clock and rate pacing for playback and export
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;

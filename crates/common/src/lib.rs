//! eventcut Common Utilities
//!
//! Shared infrastructure for all eventcut crates:
//! - Error types and result aliases
//! - Timecode parsing and frame conversion
//! - Tracing/logging initialization
//! - Configuration loading

pub mod config;
pub mod error;
pub mod logging;
pub mod timecode;

pub use config::*;
pub use error::*;
pub use timecode::*;

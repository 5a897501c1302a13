//! eventcut Project Model
//!
//! Defines the core data contracts for eventcut:
//! - **Events:** Named, timestamped spans read from event metadata
//! - **Strips:** Contiguous labeled ranges on the host's timeline
//! - **Host:** Capability traits the segmenter and renderer drive
//! - **Project:** The JSON project document and its on-disk layout
//!
//! All timeline positions are integer frames with half-open `[start, end)`
//! range semantics.

pub mod event;
pub mod host;
pub mod project;
pub mod strip;
pub mod timeline;

pub use event::*;
pub use host::*;
pub use project::*;
pub use strip::*;

//! eventcut Render Engine
//!
//! Renders every eligible strip of a timeline to its own file.
//!
//! # Pipeline Architecture
//!
//! ```text
//! timeline ──► eligible strips (movie, unmuted)
//!                     │
//!                     ├── RenderJob: [start, end) + output path
//!                     │
//!              RenderContext::render_range (one call per job)
//!                     │
//!              DocumentHost ──► RenderBackend (ffmpeg | dry run)
//!                     │
//!                     ▼
//!       <project_dir>/render/<date>_<name>.mp4
//! ```
//!
//! Render settings are snapshotted before the batch and restored after it,
//! whether the batch finished or failed.

pub mod backend;
pub mod batch;
pub mod ffmpeg;
pub mod host;
pub mod naming;

pub use backend::*;
pub use batch::*;
pub use ffmpeg::{command_exists, probe_duration_secs, FfmpegBackend, RenderProgress};
pub use host::DocumentHost;
pub use naming::*;

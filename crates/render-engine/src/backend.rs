//! Render backends.
//!
//! The project document has no renderer of its own. A [`RenderBackend`]
//! turns one render request, resolved against the document's strips, into
//! an output file.

use std::path::PathBuf;

use serde::Serialize;

use eventcut_common::error::EventcutResult;
use eventcut_common::timecode::{Frame, FrameRate};
use eventcut_project_model::strip::FrameRange;

/// Piece of source media feeding part of a render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSlice {
    /// Name of the strip the slice comes from.
    pub strip_name: String,

    /// Resolved path of the source media, if the strip has one.
    pub source: Option<PathBuf>,

    /// Timeline frames this slice covers.
    pub range: FrameRange,

    /// Source-media frame at `range.start`.
    pub source_start: Frame,
}

/// Everything a backend needs to produce one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderRequest {
    /// Timeline frames to render, `[start, end)`.
    pub range: FrameRange,

    /// Output file.
    pub output: PathBuf,

    /// Project frame rate.
    pub fps: FrameRate,

    /// Sequencer output is the render input.
    pub use_sequencer: bool,

    /// Compositor runs on rendered frames.
    pub use_compositing: bool,

    /// Unmuted movie media under the range, in timeline order.
    pub slices: Vec<SourceSlice>,
}

impl RenderRequest {
    /// Length of the render in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.range.len())
    }
}

/// Trait for render backends (ffmpeg, dry run).
pub trait RenderBackend {
    /// Produce the output file for `request`, blocking until done.
    fn render(&mut self, request: &RenderRequest) -> EventcutResult<()>;

    /// Check if this backend is available on the system.
    fn is_available(&self) -> bool;

    /// Backend name.
    fn name(&self) -> &str;
}

/// Records requests instead of rendering them.
#[derive(Debug, Default)]
pub struct DryRunBackend {
    requests: Vec<RenderRequest>,
}

impl DryRunBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> &[RenderRequest] {
        &self.requests
    }
}

impl RenderBackend for DryRunBackend {
    fn render(&mut self, request: &RenderRequest) -> EventcutResult<()> {
        tracing::info!(
            output = %request.output.display(),
            start = request.range.start,
            end = request.range.end,
            duration_secs = request.duration_secs(),
            "Dry run: skipping render"
        );
        self.requests.push(request.clone());
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn render(&mut self, request: &RenderRequest) -> EventcutResult<()> {
        (**self).render(request)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

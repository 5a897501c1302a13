//! Capabilities of the editing host.
//!
//! The segmenter and the batch renderer never touch a concrete timeline.
//! They drive these traits, so the same algorithms run against the bundled
//! project document, an embedding editor, or a test double.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use eventcut_common::{EventcutResult, Frame};

use crate::strip::{FrameRange, Strip, StripId};

/// Which editor the host's active area shows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EditorArea {
    #[default]
    SequenceEditor,
    Viewport,
    Properties,
    Other(String),
}

/// Outcome reported by a host command that ran to completion.
///
/// Failures are reported through the error path instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Finished,
}

impl std::fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finished => f.write_str("FINISHED"),
        }
    }
}

/// Global render settings of the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// First frame rendered.
    pub frame_start: Frame,

    /// One past the last frame rendered.
    pub frame_end: Frame,

    /// Output file of the next render.
    pub filepath: PathBuf,

    /// Feed the sequencer output into the render.
    pub use_sequencer: bool,

    /// Run the compositor on rendered frames.
    pub use_compositing: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            frame_start: 0,
            frame_end: 250,
            filepath: PathBuf::from("render/output.mp4"),
            use_sequencer: true,
            use_compositing: true,
        }
    }
}

impl RenderSettings {
    pub fn range(&self) -> FrameRange {
        FrameRange::new(self.frame_start, self.frame_end)
    }
}

/// Timeline editing operations provided by the host.
pub trait TimelineContext {
    /// Snapshot of every strip in the host's native enumeration order.
    fn strips(&self) -> Vec<Strip>;

    /// Cut every strip that spans `frame` into independent left and right
    /// pieces. Strips that merely start or end at `frame` are left alone.
    fn split(&mut self, frame: Frame) -> EventcutResult<()>;

    /// Move the playback cursor to `frame` and select exactly the strips
    /// under it, returning their ids.
    fn select_at(&mut self, frame: Frame) -> EventcutResult<Vec<StripId>>;

    /// Clear the selection.
    fn deselect_all(&mut self);

    /// Rename each of `ids` to `name`.
    fn rename(&mut self, ids: &[StripId], name: &str) -> EventcutResult<()>;

    /// Set the mute flag of one strip.
    fn set_mute(&mut self, id: StripId, mute: bool) -> EventcutResult<()>;

    /// Editor currently shown in the active area.
    fn editor_area(&self) -> EditorArea;

    /// Switch the active area to `area`.
    fn set_editor_area(&mut self, area: EditorArea);
}

/// Rendering operations provided by the host.
pub trait RenderContext {
    /// Current global render settings.
    fn render_settings(&self) -> RenderSettings;

    /// Replace the global render settings.
    fn set_render_settings(&mut self, settings: RenderSettings);

    /// Render the full configured frame range to the configured output
    /// file, blocking until the file is written.
    fn render_animation(&mut self) -> EventcutResult<()>;

    /// Point the render settings at `range` and `output`, then render.
    fn render_range(&mut self, range: FrameRange, output: PathBuf) -> EventcutResult<()> {
        let mut settings = self.render_settings();
        settings.frame_start = range.start;
        settings.frame_end = range.end;
        settings.filepath = output;
        self.set_render_settings(settings);
        self.render_animation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_status_display() {
        assert_eq!(CommandStatus::Finished.to_string(), "FINISHED");
    }

    #[test]
    fn test_editor_area_serialization() {
        let json = serde_json::to_string(&EditorArea::SequenceEditor).unwrap();
        assert_eq!(json, "\"sequence_editor\"");
        let other: EditorArea = serde_json::from_str(r#"{"other":"text_editor"}"#).unwrap();
        assert_eq!(other, EditorArea::Other("text_editor".to_string()));
    }
}

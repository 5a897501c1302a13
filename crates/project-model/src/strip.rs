//! Timeline strips.
//!
//! A strip is a contiguous, named range on one channel of the timeline.
//! Strips are only ever created by splitting existing ones; the segmenter
//! renames them and toggles their mute flag.

use serde::{Deserialize, Serialize};

use eventcut_common::Frame;

/// Stable identifier of a strip within one project document.
pub type StripId = u64;

/// Content category of a strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StripKind {
    Movie,
    Sound,
    Image,
    Color,
    Text,
    Other,
}

/// Half-open frame range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRange {
    pub start: Frame,
    pub end: Frame,
}

impl FrameRange {
    pub fn new(start: Frame, end: Frame) -> Self {
        Self { start, end }
    }

    /// Number of frames covered; zero for empty or inverted ranges.
    pub fn len(&self) -> Frame {
        (self.end - self.start).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `frame` lies in `[start, end)`.
    pub fn contains(&self, frame: Frame) -> bool {
        self.start <= frame && frame < self.end
    }

    /// Whether a cut at `frame` would produce two non-empty pieces.
    pub fn splits_at(&self, frame: Frame) -> bool {
        self.start < frame && frame < self.end
    }

    pub fn overlaps(&self, other: &FrameRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl std::fmt::Display for FrameRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// A single strip on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strip {
    /// Identifier, unique within the document.
    pub id: StripId,

    /// Display name. Not required to be unique.
    pub name: String,

    /// Content category.
    pub kind: StripKind,

    /// Channel (track row) the strip sits on.
    #[serde(default = "default_channel")]
    pub channel: u32,

    /// First frame of the strip as it plays on the timeline.
    pub frame_final_start: Frame,

    /// One past the last frame of the strip.
    pub frame_final_end: Frame,

    /// Muted strips neither play nor render.
    #[serde(default)]
    pub mute: bool,

    /// Selection state.
    #[serde(default)]
    pub select: bool,

    /// Source media path, relative to the project directory.
    #[serde(default)]
    pub source: Option<String>,

    /// Frame of the source media shown at `frame_final_start`.
    #[serde(default)]
    pub source_offset: Frame,
}

fn default_channel() -> u32 {
    1
}

impl Strip {
    /// A fresh strip covering `range` on `channel`.
    pub fn new(
        id: StripId,
        name: impl Into<String>,
        kind: StripKind,
        channel: u32,
        range: FrameRange,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            channel,
            frame_final_start: range.start,
            frame_final_end: range.end,
            mute: false,
            select: false,
            source: None,
            source_offset: 0,
        }
    }

    /// Attach source media to the strip.
    pub fn with_source(mut self, source: impl Into<String>, offset: Frame) -> Self {
        self.source = Some(source.into());
        self.source_offset = offset;
        self
    }

    pub fn range(&self) -> FrameRange {
        FrameRange::new(self.frame_final_start, self.frame_final_end)
    }

    /// Whether this strip takes part in batch rendering.
    pub fn is_render_eligible(&self) -> bool {
        self.kind == StripKind::Movie && !self.mute
    }

    /// Source-media frame shown at timeline frame `frame`.
    pub fn source_frame_at(&self, frame: Frame) -> Frame {
        self.source_offset + (frame - self.frame_final_start)
    }

    /// Cut this strip at `frame`, shrinking it to the left piece and
    /// returning the right piece under `new_id`.
    ///
    /// Returns `None` and leaves the strip untouched when `frame` is not
    /// strictly inside it.
    pub fn split_off(&mut self, frame: Frame, new_id: StripId) -> Option<Strip> {
        if !self.range().splits_at(frame) {
            return None;
        }

        let mut right = self.clone();
        right.id = new_id;
        right.frame_final_start = frame;
        right.source_offset = self.source_frame_at(frame);

        self.frame_final_end = frame;
        Some(right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(range: FrameRange) -> Strip {
        Strip::new(1, "20240315_0930.mp4", StripKind::Movie, 1, range).with_source("walk.mp4", 100)
    }

    #[test]
    fn test_range_semantics_are_half_open() {
        let range = FrameRange::new(10, 20);
        assert!(range.contains(10));
        assert!(range.contains(19));
        assert!(!range.contains(20));
        assert_eq!(range.len(), 10);
        assert!(FrameRange::new(20, 10).is_empty());
    }

    #[test]
    fn test_split_off_produces_adjacent_pieces() {
        let mut left = movie(FrameRange::new(0, 1000));
        let right = left.split_off(400, 7).unwrap();

        assert_eq!(left.range(), FrameRange::new(0, 400));
        assert_eq!(right.range(), FrameRange::new(400, 1000));
        assert_eq!(right.id, 7);
        assert_eq!(right.name, left.name);
        assert_eq!(left.source_offset, 100);
        assert_eq!(right.source_offset, 500);
    }

    #[test]
    fn test_split_on_boundary_is_noop() {
        let mut strip = movie(FrameRange::new(0, 1000));
        assert!(strip.split_off(0, 2).is_none());
        assert!(strip.split_off(1000, 2).is_none());
        assert!(strip.split_off(5000, 2).is_none());
        assert_eq!(strip.range(), FrameRange::new(0, 1000));
    }

    #[test]
    fn test_render_eligibility() {
        let mut strip = movie(FrameRange::new(0, 10));
        assert!(strip.is_render_eligible());
        strip.mute = true;
        assert!(!strip.is_render_eligible());

        let sound = Strip::new(2, "A", StripKind::Sound, 2, FrameRange::new(0, 10));
        assert!(!sound.is_render_eligible());
    }

    #[test]
    fn test_legacy_strip_json_defaults() {
        let raw = r#"{
            "id": 3,
            "name": "Intro",
            "kind": "movie",
            "frame_final_start": 0,
            "frame_final_end": 120
        }"#;
        let strip: Strip = serde_json::from_str(raw).unwrap();
        assert_eq!(strip.channel, 1);
        assert!(!strip.mute);
        assert!(strip.source.is_none());
    }

    proptest::proptest! {
        #[test]
        fn prop_split_preserves_coverage_and_source(
            start in -5_000i64..5_000,
            len in 2i64..10_000,
            offset in 0i64..1_000,
            cut in 1i64..10_000,
        ) {
            proptest::prop_assume!(cut < len);
            let mut left = Strip::new(1, "clip", StripKind::Movie, 1, FrameRange::new(start, start + len))
                .with_source("walk.mp4", offset);
            let frame = start + cut;
            let before = left.source_frame_at(frame);

            let right = left.split_off(frame, 2).unwrap();
            proptest::prop_assert_eq!(left.range().len() + right.range().len(), len);
            proptest::prop_assert_eq!(left.frame_final_end, right.frame_final_start);
            proptest::prop_assert_eq!(right.source_frame_at(frame), before);
        }
    }
}

//! Event segmentation.
//!
//! For each event not marked as skipped, the timeline is cut at the event's
//! start and end frames and the strips between the cuts take the event's
//! name. Afterwards every strip that still carries a default name is muted
//! and every other strip is unmuted, which leaves exactly the event strips
//! eligible for rendering.

use std::path::Path;

use eventcut_common::config::AppConfig;
use eventcut_common::error::EventcutResult;
use eventcut_common::timecode::FrameRate;
use eventcut_project_model::event::{load_events, Event};
use eventcut_project_model::host::{CommandStatus, EditorArea, TimelineContext};

use crate::guard::EditorAreaGuard;

/// Label of the segmentation command in the host's strip menu.
pub const SEGMENT_COMMAND_LABEL: &str = "Strips from events";

/// Segmentation parameters.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Rate used to convert event timespans to frames.
    pub frame_rate: FrameRate,

    /// Events whose name starts with this are skipped.
    pub skip_prefix: String,

    /// Strips whose name starts with this are treated as unnamed.
    pub default_name_prefix: String,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            frame_rate: FrameRate::DEFAULT,
            skip_prefix: "SKIP".to_string(),
            default_name_prefix: "20".to_string(),
        }
    }
}

impl SegmenterConfig {
    pub fn from_app_config(config: &AppConfig) -> EventcutResult<Self> {
        Ok(Self {
            frame_rate: config.frame_rate()?,
            skip_prefix: config.skip_prefix.clone(),
            default_name_prefix: config.default_name_prefix.clone(),
        })
    }
}

/// What a segmentation run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentReport {
    /// Events read from the metadata.
    pub events: usize,
    /// Events skipped by name.
    pub skipped: usize,
    /// Strip renames performed, summed over events.
    pub renamed: usize,
    /// Strips muted by the final pass.
    pub muted: usize,
    /// Strips left audible by the final pass.
    pub unmuted: usize,
}

/// Cuts a timeline into named strips.
#[derive(Debug, Clone, Default)]
pub struct EventSegmenter {
    config: SegmenterConfig,
}

impl EventSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Whether `name` is a name the host assigned rather than an event name.
    pub fn is_default_name(&self, name: &str) -> bool {
        name.starts_with(&self.config.default_name_prefix)
    }

    /// Apply `events` to the timeline.
    ///
    /// Runs with the sequence editor active and restores the previous editor
    /// on return. A malformed timespan aborts the run; cuts and renames made
    /// for earlier events stay in place.
    pub fn segment<T>(&self, host: &mut T, events: &[Event]) -> EventcutResult<SegmentReport>
    where
        T: TimelineContext + ?Sized,
    {
        let mut host = EditorAreaGuard::switch(host, EditorArea::SequenceEditor);
        let mut report = SegmentReport {
            events: events.len(),
            ..SegmentReport::default()
        };

        for event in events {
            if event.is_skipped(&self.config.skip_prefix) {
                tracing::info!(name = %event.name, "Skipping event");
                report.skipped += 1;
                continue;
            }
            report.renamed += self.materialize(&mut *host, event)?;
        }

        self.mute_unnamed(&mut *host, &mut report)?;

        tracing::info!(
            events = report.events,
            skipped = report.skipped,
            renamed = report.renamed,
            muted = report.muted,
            unmuted = report.unmuted,
            "Segmentation finished"
        );
        Ok(report)
    }

    /// Cut and label the strips for one event, returning how many strips
    /// were renamed.
    fn materialize<T>(&self, host: &mut T, event: &Event) -> EventcutResult<usize>
    where
        T: TimelineContext + ?Sized,
    {
        let start_frame = event.start_frame(self.config.frame_rate)?;
        host.split(start_frame)?;
        tracing::debug!(frame = start_frame, "Split at start");

        let end_frame = event.end_frame(self.config.frame_rate)?;
        host.split(end_frame)?;
        tracing::debug!(frame = end_frame, "Split at end");

        if end_frame <= start_frame {
            tracing::warn!(
                name = %event.name,
                start_frame,
                end_frame,
                "Event ends before it starts"
            );
        }

        // The last frame of the event lies only in the strips between the cuts.
        host.deselect_all();
        let selected = host.select_at(end_frame - 1)?;
        host.rename(&selected, &event.name)?;
        tracing::debug!(name = %event.name, strips = selected.len(), "Labeled event strips");

        Ok(selected.len())
    }

    fn mute_unnamed<T>(&self, host: &mut T, report: &mut SegmentReport) -> EventcutResult<()>
    where
        T: TimelineContext + ?Sized,
    {
        for strip in host.strips() {
            let mute = self.is_default_name(&strip.name);
            host.set_mute(strip.id, mute)?;
            if mute {
                report.muted += 1;
            } else {
                report.unmuted += 1;
            }
        }
        Ok(())
    }
}

/// The segmentation command: load `metadata` and segment the timeline.
pub fn run_segment_command<T>(
    host: &mut T,
    metadata: &Path,
    config: &SegmenterConfig,
) -> EventcutResult<(CommandStatus, SegmentReport)>
where
    T: TimelineContext + ?Sized,
{
    tracing::info!(metadata = %metadata.display(), "{SEGMENT_COMMAND_LABEL}");
    let events = load_events(metadata)?;
    let report = EventSegmenter::new(config.clone()).segment(host, &events)?;
    Ok((CommandStatus::Finished, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventcut_common::EventcutError;
    use eventcut_project_model::{FrameRange, ProjectDocument, StripKind};

    fn config_60() -> SegmenterConfig {
        SegmenterConfig {
            frame_rate: FrameRate::new(60.0).unwrap(),
            ..SegmenterConfig::default()
        }
    }

    fn single_clip() -> ProjectDocument {
        let mut doc = ProjectDocument::new("Walk", FrameRate::new(60.0).unwrap());
        doc.add_strip("20240315_0930", StripKind::Movie, 1, FrameRange::new(0, 10_000));
        doc
    }

    #[test]
    fn test_is_default_name() {
        let segmenter = EventSegmenter::default();
        assert!(segmenter.is_default_name("20240315_0930.mp4"));
        assert!(!segmenter.is_default_name("Bridge"));
        assert!(!segmenter.is_default_name("1999 flashback"));
    }

    #[test]
    fn test_event_in_middle_produces_three_pieces() {
        let mut doc = single_clip();
        let events = [Event::new("Bridge", "00:00:10", "00:00:20")];

        let report = EventSegmenter::new(config_60())
            .segment(&mut doc, &events)
            .unwrap();

        let summary: Vec<_> = doc
            .strips
            .iter()
            .map(|s| (s.name.as_str(), s.range(), s.mute))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("20240315_0930", FrameRange::new(0, 600), true),
                ("Bridge", FrameRange::new(600, 1200), false),
                ("20240315_0930", FrameRange::new(1200, 10_000), true),
            ]
        );
        assert_eq!(report.renamed, 1);
        assert_eq!(report.muted, 2);
        assert_eq!(report.unmuted, 1);
    }

    #[test]
    fn test_empty_event_list_mutes_everything() {
        let mut doc = single_clip();
        let report = EventSegmenter::new(config_60())
            .segment(&mut doc, &[])
            .unwrap();

        assert_eq!(doc.strips.len(), 1);
        assert!(doc.strips[0].mute);
        assert_eq!(report, SegmentReport { muted: 1, ..SegmentReport::default() });
    }

    #[test]
    fn test_bad_timespan_aborts_and_keeps_earlier_cuts() {
        let mut doc = single_clip();
        doc.editor_area = EditorArea::Properties;
        let events = [
            Event::new("Bridge", "00:00:10", "00:00:20"),
            Event::new("Harbor", "00:01:00", "later"),
        ];

        let err = EventSegmenter::new(config_60())
            .segment(&mut doc, &events)
            .unwrap_err();
        assert!(matches!(err, EventcutError::Timespan { .. }));

        // The first event was applied, and the second event's start cut
        // happened before its end failed to parse.
        assert!(doc.strips.iter().any(|s| s.name == "Bridge"));
        assert_eq!(doc.strips.len(), 4);
        // No mute pass ran.
        assert!(doc.strips.iter().all(|s| !s.mute));
        assert_eq!(doc.editor_area, EditorArea::Properties);
    }

    #[test]
    fn test_inverted_event_renames_strip_before_end() {
        let mut doc = single_clip();
        let events = [Event::new("Backwards", "00:00:20", "00:00:10")];

        EventSegmenter::new(config_60())
            .segment(&mut doc, &events)
            .unwrap();

        let named: Vec<_> = doc
            .strips
            .iter()
            .filter(|s| s.name == "Backwards")
            .map(|s| s.range())
            .collect();
        assert_eq!(named, vec![FrameRange::new(0, 600)]);
    }

    #[test]
    fn test_run_segment_command_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let metadata = dir.path().join("events.json");
        std::fs::write(
            &metadata,
            r#"[{"name": "A", "adjusted_start": "00:00:00", "adjusted_end": "00:00:05"}]"#,
        )
        .unwrap();

        let mut doc = single_clip();
        let (status, report) = run_segment_command(&mut doc, &metadata, &config_60()).unwrap();

        assert_eq!(status, CommandStatus::Finished);
        assert_eq!(report.events, 1);
        assert_eq!(doc.strips[0].name, "A");
        assert_eq!(doc.strips[0].range(), FrameRange::new(0, 300));
    }

    #[test]
    fn test_run_segment_command_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let metadata = dir.path().join("events.json");
        std::fs::write(&metadata, "[{").unwrap();

        let mut doc = single_clip();
        let err = run_segment_command(&mut doc, &metadata, &config_60()).unwrap_err();
        assert!(matches!(err, EventcutError::Json(_)));
        assert_eq!(doc.strips.len(), 1);
    }
}

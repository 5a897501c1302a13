//! Event metadata.
//!
//! Events arrive as a single JSON array stored beside the project document.
//! Each entry names a span of the recording by wall-clock offsets. Only
//! `name`, `adjusted_start` and `adjusted_end` are read; any other field is
//! ignored.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use eventcut_common::config::MetadataResolution;
use eventcut_common::error::{EventcutError, EventcutResult};
use eventcut_common::timecode::{Frame, FrameRate, Timespan};

use crate::strip::FrameRange;

/// A single named span from the event metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Label given to the strips cut for this event.
    pub name: String,

    /// Start offset, `HH:MM:SS`.
    pub adjusted_start: String,

    /// End offset, `HH:MM:SS`.
    pub adjusted_end: String,
}

impl Event {
    pub fn new(
        name: impl Into<String>,
        adjusted_start: impl Into<String>,
        adjusted_end: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            adjusted_start: adjusted_start.into(),
            adjusted_end: adjusted_end.into(),
        }
    }

    /// Whether the event is marked as not to be materialized.
    pub fn is_skipped(&self, skip_prefix: &str) -> bool {
        self.name.starts_with(skip_prefix)
    }

    pub fn start_frame(&self, rate: FrameRate) -> EventcutResult<Frame> {
        Ok(Timespan::parse(&self.adjusted_start)?.to_frame(rate))
    }

    pub fn end_frame(&self, rate: FrameRate) -> EventcutResult<Frame> {
        Ok(Timespan::parse(&self.adjusted_end)?.to_frame(rate))
    }

    /// Frame span of the event. May be empty or inverted if the metadata is.
    pub fn frame_range(&self, rate: FrameRate) -> EventcutResult<FrameRange> {
        Ok(FrameRange::new(
            self.start_frame(rate)?,
            self.end_frame(rate)?,
        ))
    }
}

/// Parse events from the JSON array content of a metadata file.
pub fn parse_events(json: &str) -> Result<Vec<Event>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Read and parse an event metadata file.
pub fn load_events(path: &Path) -> EventcutResult<Vec<Event>> {
    if !path.exists() {
        return Err(EventcutError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let events = parse_events(&content)?;
    tracing::debug!(path = %path.display(), events = events.len(), "Loaded event metadata");
    Ok(events)
}

/// Find the event metadata file in `dir`.
///
/// Candidates are the files with `extension`, in lexicographic order.
/// None is an error; more than one is handled per `resolution`.
pub fn locate_metadata(
    dir: &Path,
    extension: &str,
    resolution: MetadataResolution,
) -> EventcutResult<PathBuf> {
    // Metacharacters in the directory part must match literally.
    let escaped_dir = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = format!("{escaped_dir}{}*.{extension}", std::path::MAIN_SEPARATOR);

    let mut candidates: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| EventcutError::config(format!("invalid metadata pattern: {e}")))?
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .collect();
    candidates.sort();

    match (candidates.len(), resolution) {
        (0, _) => Err(EventcutError::MetadataNotFound {
            dir: dir.to_path_buf(),
        }),
        (1, _) => Ok(candidates.remove(0)),
        (count, MetadataResolution::Strict) => Err(EventcutError::AmbiguousMetadata {
            dir: dir.to_path_buf(),
            count,
        }),
        (count, MetadataResolution::FirstMatch) => {
            let chosen = candidates.remove(0);
            tracing::warn!(
                dir = %dir.display(),
                count,
                chosen = %chosen.display(),
                "Expected one metadata file; using the first match"
            );
            Ok(chosen)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_events_ignores_extra_fields() {
        let json = r#"[
            {"name": "Bridge", "adjusted_start": "00:00:10", "adjusted_end": "00:00:20",
             "start": "2024-03-15T09:30:10", "note": "windy"},
            {"name": "SKIP lunch", "adjusted_start": "00:01:00", "adjusted_end": "00:02:00"}
        ]"#;
        let events = parse_events(json).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name, "Bridge");
        assert!(events[1].is_skipped("SKIP"));
        assert!(!events[0].is_skipped("SKIP"));
    }

    #[test]
    fn test_parse_events_requires_fields() {
        let json = r#"[{"name": "Bridge", "adjusted_start": "00:00:10"}]"#;
        assert!(parse_events(json).is_err());
    }

    #[test]
    fn test_frame_range_at_rate() {
        let event = Event::new("A", "00:00:00", "00:00:05");
        let rate = FrameRate::new(60.0).unwrap();
        assert_eq!(event.frame_range(rate).unwrap(), FrameRange::new(0, 300));
    }

    #[test]
    fn test_frame_range_reports_bad_timespan() {
        let event = Event::new("A", "soon", "00:00:05");
        let err = event.frame_range(FrameRate::DEFAULT).unwrap_err();
        assert!(matches!(err, EventcutError::Timespan { .. }));
    }

    #[test]
    fn test_locate_metadata_single_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("events.json"), "[]").unwrap();
        std::fs::write(dir.path().join("walk.eventcut"), "{}").unwrap();

        let found = locate_metadata(dir.path(), "json", MetadataResolution::Strict).unwrap();
        assert_eq!(found, dir.path().join("events.json"));
    }

    #[test]
    fn test_locate_metadata_none() {
        let dir = tempfile::tempdir().unwrap();
        let err = locate_metadata(dir.path(), "json", MetadataResolution::Strict).unwrap_err();
        assert!(matches!(err, EventcutError::MetadataNotFound { .. }));
    }

    #[test]
    fn test_locate_metadata_ambiguous_strict_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), "[]").unwrap();
        std::fs::write(dir.path().join("a.json"), "[]").unwrap();

        let err = locate_metadata(dir.path(), "json", MetadataResolution::Strict).unwrap_err();
        assert!(matches!(
            err,
            EventcutError::AmbiguousMetadata { count: 2, .. }
        ));
    }

    #[test]
    fn test_locate_metadata_first_match_is_lexicographic() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), "[]").unwrap();
        std::fs::write(dir.path().join("a.json"), "[]").unwrap();

        let found = locate_metadata(dir.path(), "json", MetadataResolution::FirstMatch).unwrap();
        assert_eq!(found, dir.path().join("a.json"));
    }

    #[test]
    fn test_load_events_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_events(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, EventcutError::FileNotFound { .. }));
    }
}

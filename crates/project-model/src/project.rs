//! Project document and on-disk layout.
//!
//! A project is a single JSON document (`*.eventcut`) holding the timeline,
//! the render settings and a little UI state. The directory that contains it
//! is significant: its basename is the project's date identifier, the event
//! metadata sits next to it, and renders land in a subdirectory of it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use eventcut_common::error::EventcutError;
use eventcut_common::timecode::{Frame, FrameRate};

use crate::host::{EditorArea, RenderSettings};
use crate::strip::{FrameRange, Strip, StripId, StripKind};

/// File extension of project documents.
pub const PROJECT_EXTENSION: &str = "eventcut";

/// Top-level project document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// Schema version.
    pub version: String,

    /// Human-readable project name.
    pub name: String,

    /// Creation timestamp (RFC 3339).
    pub created_at: String,

    /// Last modified timestamp (RFC 3339).
    pub modified_at: String,

    /// Frame rate the project plays at.
    pub fps: FrameRate,

    /// Editor shown in the active area.
    #[serde(default)]
    pub editor_area: EditorArea,

    /// Playback cursor.
    #[serde(default)]
    pub frame_current: Frame,

    /// Global render settings.
    #[serde(default)]
    pub render: RenderSettings,

    /// Every strip, in enumeration order.
    #[serde(default)]
    pub strips: Vec<Strip>,

    /// Next strip id to hand out.
    #[serde(default)]
    pub next_id: StripId,
}

/// Source media to lay onto a new project's timeline.
#[derive(Debug, Clone)]
pub struct SourceMedia {
    /// Path relative to the project directory.
    pub path: String,

    /// Length of the media in frames at the project rate.
    pub frames: Frame,

    /// Also add a sound strip for the media's audio.
    pub with_audio: bool,
}

impl ProjectDocument {
    /// Create an empty project.
    pub fn new(name: impl Into<String>, fps: FrameRate) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            version: "1.0".to_string(),
            name: name.into(),
            created_at: now.clone(),
            modified_at: now,
            fps,
            editor_area: EditorArea::SequenceEditor,
            frame_current: 0,
            render: RenderSettings::default(),
            strips: vec![],
            next_id: 1,
        }
    }

    /// Append a strip and return its id.
    pub fn add_strip(
        &mut self,
        name: impl Into<String>,
        kind: StripKind,
        channel: u32,
        range: FrameRange,
    ) -> StripId {
        let id = self.allocate_id();
        self.strips.push(Strip::new(id, name, kind, channel, range));
        id
    }

    /// Lay `media` onto the timeline from frame 0.
    ///
    /// The strips are named after the media file, the way an editor names
    /// freshly imported clips.
    pub fn add_source(&mut self, media: &SourceMedia) -> Vec<StripId> {
        let name = Path::new(&media.path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| media.path.clone());
        let range = FrameRange::new(0, media.frames);

        let mut ids = vec![];
        let id = self.allocate_id();
        self.strips
            .push(Strip::new(id, name.clone(), StripKind::Movie, 2, range).with_source(&media.path, 0));
        ids.push(id);

        if media.with_audio {
            let id = self.allocate_id();
            self.strips
                .push(Strip::new(id, name, StripKind::Sound, 1, range).with_source(&media.path, 0));
            ids.push(id);
        }

        self.render.frame_start = 0;
        self.render.frame_end = media.frames;
        ids
    }

    pub fn strip(&self, id: StripId) -> Option<&Strip> {
        self.strips.iter().find(|s| s.id == id)
    }

    pub fn strip_mut(&mut self, id: StripId) -> Option<&mut Strip> {
        self.strips.iter_mut().find(|s| s.id == id)
    }

    pub(crate) fn allocate_id(&mut self) -> StripId {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    /// Repair `next_id` for documents written by hand or by older versions.
    fn normalize_ids(&mut self) {
        let max = self.strips.iter().map(|s| s.id).max().unwrap_or(0);
        if self.next_id <= max {
            self.next_id = max + 1;
        }
    }

    /// Record a modification.
    pub fn touch(&mut self) {
        self.modified_at = chrono::Utc::now().to_rfc3339();
    }
}

/// Paths derived from where the project document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    project_file: PathBuf,
    project_dir: PathBuf,
}

impl ProjectLayout {
    pub fn new(project_file: impl AsRef<Path>) -> Self {
        let project_file = project_file.as_ref().to_path_buf();
        let parent = project_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        // A relative "." has no basename to take the date identifier from.
        let project_dir = std::fs::canonicalize(&parent).unwrap_or(parent);
        Self {
            project_file,
            project_dir,
        }
    }

    pub fn project_file(&self) -> &Path {
        &self.project_file
    }

    /// Directory holding the project document.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Date identifier of the project: the basename of its directory.
    ///
    /// Nothing checks that it actually looks like a date.
    pub fn date_id(&self) -> String {
        self.project_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Directory renders are written to.
    pub fn render_dir(&self, subdir: &str) -> PathBuf {
        self.project_dir.join(subdir)
    }

    /// Resolve a path stored relative to the project directory.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.project_dir.join(relative)
    }
}

/// The complete in-memory representation of a loaded project.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    /// Filesystem path to the project document.
    pub path: PathBuf,

    /// The document itself.
    pub document: ProjectDocument,
}

impl LoadedProject {
    /// Load a project document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let path = path.as_ref().to_path_buf();

        let json = std::fs::read_to_string(&path).map_err(|e| ProjectError::IoError {
            path: path.clone(),
            source: e,
        })?;

        let mut document: ProjectDocument =
            serde_json::from_str(&json).map_err(|e| ProjectError::ParseError {
                path: path.clone(),
                source: e,
            })?;
        document.normalize_ids();

        Ok(Self { path, document })
    }

    /// Save the document back to its path.
    pub fn save(&mut self) -> Result<(), ProjectError> {
        self.document.touch();
        self.write()
    }

    fn write(&self) -> Result<(), ProjectError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ProjectError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json =
            serde_json::to_string_pretty(&self.document).map_err(|e| ProjectError::ParseError {
                path: self.path.clone(),
                source: e,
            })?;
        std::fs::write(&self.path, json).map_err(|e| ProjectError::IoError {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Create a new project document on disk, optionally laying source
    /// media onto its timeline.
    pub fn create(
        path: impl AsRef<Path>,
        name: impl Into<String>,
        fps: FrameRate,
        source: Option<&SourceMedia>,
    ) -> Result<Self, ProjectError> {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            return Err(ProjectError::ValidationError {
                message: format!("{} already exists", path.display()),
            });
        }

        let mut document = ProjectDocument::new(name, fps);
        if let Some(media) = source {
            if media.frames <= 0 {
                return Err(ProjectError::ValidationError {
                    message: format!("source {} has no frames", media.path),
                });
            }
            document.add_source(media);
        }

        let loaded = Self { path, document };
        loaded.write()?;
        Ok(loaded)
    }

    pub fn layout(&self) -> ProjectLayout {
        ProjectLayout::new(&self.path)
    }

    /// Check that every referenced source file exists.
    pub fn validate_sources(&self) -> Vec<String> {
        let layout = self.layout();
        let mut errors = vec![];
        let mut seen = std::collections::BTreeSet::new();

        for strip in &self.document.strips {
            if let Some(source) = &strip.source {
                if seen.insert(source.clone()) && !layout.resolve(source).exists() {
                    errors.push(format!("Source missing: {source}"));
                }
            }
        }

        errors
    }
}

/// Errors that can occur when working with projects.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid project: {message}")]
    ValidationError { message: String },
}

impl From<ProjectError> for EventcutError {
    fn from(err: ProjectError) -> Self {
        EventcutError::project(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk_media() -> SourceMedia {
        SourceMedia {
            path: "20240315_093000.mp4".to_string(),
            frames: 10_000,
            with_audio: true,
        }
    }

    #[test]
    fn test_add_source_lays_movie_and_sound() {
        let mut doc = ProjectDocument::new("Walk", FrameRate::DEFAULT);
        let ids = doc.add_source(&walk_media());

        assert_eq!(ids, vec![1, 2]);
        assert_eq!(doc.strips[0].kind, StripKind::Movie);
        assert_eq!(doc.strips[1].kind, StripKind::Sound);
        assert_eq!(doc.strips[0].name, "20240315_093000.mp4");
        assert_eq!(doc.strips[0].range(), FrameRange::new(0, 10_000));
        assert_eq!(doc.render.frame_end, 10_000);
        assert_eq!(doc.next_id, 3);
    }

    #[test]
    fn test_create_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2024-03-15").join("walk.eventcut");

        let created =
            LoadedProject::create(&path, "Walk", FrameRate::DEFAULT, Some(&walk_media())).unwrap();
        assert_eq!(created.document.strips.len(), 2);

        let loaded = LoadedProject::load(&path).unwrap();
        assert_eq!(loaded.document.name, "Walk");
        assert_eq!(loaded.document.strips, created.document.strips);
        assert!(loaded.document.fps.approx_eq(FrameRate::DEFAULT));
    }

    #[test]
    fn test_create_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walk.eventcut");
        LoadedProject::create(&path, "Walk", FrameRate::DEFAULT, None).unwrap();

        let err = LoadedProject::create(&path, "Walk", FrameRate::DEFAULT, None).unwrap_err();
        assert!(matches!(err, ProjectError::ValidationError { .. }));
    }

    #[test]
    fn test_load_repairs_next_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walk.eventcut");
        let mut doc = ProjectDocument::new("Walk", FrameRate::DEFAULT);
        doc.strips.push(Strip::new(
            41,
            "clip",
            StripKind::Movie,
            1,
            FrameRange::new(0, 10),
        ));
        doc.next_id = 0;
        std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

        let loaded = LoadedProject::load(&path).unwrap();
        assert_eq!(loaded.document.next_id, 42);
    }

    #[test]
    fn test_load_reports_parse_error_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.eventcut");
        std::fs::write(&path, "{").unwrap();

        let err = LoadedProject::load(&path).unwrap_err();
        assert!(matches!(err, ProjectError::ParseError { .. }));
        assert!(err.to_string().contains("broken.eventcut"));

        let err: EventcutError = err.into();
        assert!(matches!(err, EventcutError::Project { .. }));
    }

    #[test]
    fn test_layout_date_id_is_directory_basename() {
        let dir = tempfile::tempdir().unwrap();
        let project_dir = dir.path().join("2024-03-15");
        std::fs::create_dir_all(&project_dir).unwrap();

        let layout = ProjectLayout::new(project_dir.join("walk.eventcut"));
        assert_eq!(layout.date_id(), "2024-03-15");
        assert!(layout.render_dir("render").ends_with("2024-03-15/render"));
    }

    #[test]
    fn test_validate_sources_reports_missing_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walk.eventcut");
        let loaded =
            LoadedProject::create(&path, "Walk", FrameRate::DEFAULT, Some(&walk_media())).unwrap();

        let errors = loaded.validate_sources();
        assert_eq!(errors, vec!["Source missing: 20240315_093000.mp4".to_string()]);
    }
}

//! The project document as a full editing host.

use eventcut_common::error::{EventcutError, EventcutResult};
use eventcut_common::timecode::Frame;
use eventcut_project_model::host::{EditorArea, RenderContext, RenderSettings, TimelineContext};
use eventcut_project_model::project::{ProjectDocument, ProjectLayout};
use eventcut_project_model::strip::{FrameRange, Strip, StripId, StripKind};

use crate::backend::{RenderBackend, RenderRequest, SourceSlice};

/// Pairs a project document with a render backend so both capability
/// traits are available on one value.
pub struct DocumentHost<'a, B: RenderBackend> {
    document: &'a mut ProjectDocument,
    layout: ProjectLayout,
    backend: B,
}

impl<'a, B: RenderBackend> DocumentHost<'a, B> {
    pub fn new(document: &'a mut ProjectDocument, layout: ProjectLayout, backend: B) -> Self {
        Self {
            document,
            layout,
            backend,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Resolve the current render settings against the timeline.
    pub fn request(&self) -> RenderRequest {
        let settings = &self.document.render;
        let range = settings.range();
        RenderRequest {
            range,
            output: self.layout.resolve(&settings.filepath),
            fps: self.document.fps,
            use_sequencer: settings.use_sequencer,
            use_compositing: settings.use_compositing,
            slices: self.slices(range),
        }
    }

    fn slices(&self, range: FrameRange) -> Vec<SourceSlice> {
        let mut slices: Vec<SourceSlice> = self
            .document
            .strips
            .iter()
            .filter(|s| s.kind == StripKind::Movie && !s.mute && s.range().overlaps(&range))
            .map(|s| {
                let start = s.frame_final_start.max(range.start);
                let end = s.frame_final_end.min(range.end);
                SourceSlice {
                    strip_name: s.name.clone(),
                    source: s.source.as_deref().map(|p| self.layout.resolve(p)),
                    range: FrameRange::new(start, end),
                    source_start: s.source_frame_at(start),
                }
            })
            .collect();
        slices.sort_by_key(|s| s.range.start);
        slices
    }
}

impl<B: RenderBackend> TimelineContext for DocumentHost<'_, B> {
    fn strips(&self) -> Vec<Strip> {
        self.document.strips()
    }

    fn split(&mut self, frame: Frame) -> EventcutResult<()> {
        self.document.split(frame)
    }

    fn select_at(&mut self, frame: Frame) -> EventcutResult<Vec<StripId>> {
        self.document.select_at(frame)
    }

    fn deselect_all(&mut self) {
        self.document.deselect_all()
    }

    fn rename(&mut self, ids: &[StripId], name: &str) -> EventcutResult<()> {
        self.document.rename(ids, name)
    }

    fn set_mute(&mut self, id: StripId, mute: bool) -> EventcutResult<()> {
        self.document.set_mute(id, mute)
    }

    fn editor_area(&self) -> EditorArea {
        self.document.editor_area()
    }

    fn set_editor_area(&mut self, area: EditorArea) {
        self.document.set_editor_area(area)
    }
}

impl<B: RenderBackend> RenderContext for DocumentHost<'_, B> {
    fn render_settings(&self) -> RenderSettings {
        self.document.render.clone()
    }

    fn set_render_settings(&mut self, settings: RenderSettings) {
        self.document.render = settings;
    }

    fn render_animation(&mut self) -> EventcutResult<()> {
        let request = self.request();
        if request.range.is_empty() {
            return Err(EventcutError::render(format!(
                "empty frame range {}",
                request.range
            )));
        }
        tracing::debug!(
            backend = self.backend.name(),
            output = %request.output.display(),
            slices = request.slices.len(),
            "Dispatching render"
        );
        self.backend.render(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DryRunBackend;
    use eventcut_common::FrameRate;
    use std::path::PathBuf;

    fn doc() -> ProjectDocument {
        let mut doc = ProjectDocument::new("Walk", FrameRate::new(60.0).unwrap());
        let movie = doc.add_strip("Old Town", StripKind::Movie, 2, FrameRange::new(0, 1000));
        doc.strip_mut(movie).unwrap().source = Some("walk.mp4".to_string());
        doc.strip_mut(movie).unwrap().source_offset = 50;
        doc.add_strip("Old Town", StripKind::Sound, 1, FrameRange::new(0, 1000));
        doc
    }

    #[test]
    fn test_render_range_dispatches_resolved_request() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path().join("walk.eventcut"));
        let mut doc = doc();
        let mut host = DocumentHost::new(&mut doc, layout.clone(), DryRunBackend::new());

        host.render_range(FrameRange::new(100, 400), PathBuf::from("render/a.mp4"))
            .unwrap();

        let requests = host.backend().requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.range, FrameRange::new(100, 400));
        assert_eq!(request.output, layout.resolve("render/a.mp4"));
        assert_eq!(request.slices.len(), 1);
        assert_eq!(request.slices[0].source_start, 150);
        assert_eq!(request.slices[0].source, Some(layout.resolve("walk.mp4")));
    }

    #[test]
    fn test_absolute_output_path_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path().join("walk.eventcut"));
        let mut doc = doc();
        let mut host = DocumentHost::new(&mut doc, layout, DryRunBackend::new());
        let output = dir.path().join("elsewhere").join("b.mp4");

        host.render_range(FrameRange::new(0, 10), output.clone())
            .unwrap();
        assert_eq!(host.backend().requests()[0].output, output);
    }

    #[test]
    fn test_empty_range_is_a_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path().join("walk.eventcut"));
        let mut doc = doc();
        let mut host = DocumentHost::new(&mut doc, layout, DryRunBackend::new());

        let err = host
            .render_range(FrameRange::new(10, 10), PathBuf::from("render/c.mp4"))
            .unwrap_err();
        assert!(matches!(err, EventcutError::Render { .. }));
    }
}

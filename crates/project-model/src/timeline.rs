//! Timeline editing on the project document.

use eventcut_common::error::{EventcutError, EventcutResult};
use eventcut_common::timecode::Frame;

use crate::host::{EditorArea, TimelineContext};
use crate::project::ProjectDocument;
use crate::strip::{Strip, StripId};

impl ProjectDocument {
    fn strip_or_err(&mut self, id: StripId) -> EventcutResult<&mut Strip> {
        self.strip_mut(id)
            .ok_or_else(|| EventcutError::timeline(format!("no strip with id {id}")))
    }
}

impl TimelineContext for ProjectDocument {
    fn strips(&self) -> Vec<Strip> {
        self.strips.clone()
    }

    fn split(&mut self, frame: Frame) -> EventcutResult<()> {
        self.frame_current = frame;

        let mut cuts = 0usize;
        let mut i = 0;
        while i < self.strips.len() {
            if self.strips[i].range().splits_at(frame) {
                let new_id = self.allocate_id();
                if let Some(right) = self.strips[i].split_off(frame, new_id) {
                    // Right piece follows its left piece in enumeration order.
                    self.strips.insert(i + 1, right);
                    cuts += 1;
                    i += 1;
                }
            }
            i += 1;
        }

        tracing::trace!(frame, cuts, "Split timeline");
        Ok(())
    }

    fn select_at(&mut self, frame: Frame) -> EventcutResult<Vec<StripId>> {
        self.frame_current = frame;
        let mut selected = vec![];
        for strip in &mut self.strips {
            strip.select = strip.range().contains(frame);
            if strip.select {
                selected.push(strip.id);
            }
        }
        Ok(selected)
    }

    fn deselect_all(&mut self) {
        for strip in &mut self.strips {
            strip.select = false;
        }
    }

    fn rename(&mut self, ids: &[StripId], name: &str) -> EventcutResult<()> {
        for &id in ids {
            self.strip_or_err(id)?.name = name.to_string();
        }
        Ok(())
    }

    fn set_mute(&mut self, id: StripId, mute: bool) -> EventcutResult<()> {
        self.strip_or_err(id)?.mute = mute;
        Ok(())
    }

    fn editor_area(&self) -> EditorArea {
        self.editor_area.clone()
    }

    fn set_editor_area(&mut self, area: EditorArea) {
        self.editor_area = area;
    }
}

//! Scoped editor-area switch.

use std::ops::{Deref, DerefMut};

use eventcut_project_model::host::{EditorArea, TimelineContext};

/// Switches the host to `target` for as long as the guard lives and puts
/// the previous editor back when dropped, whether the work succeeded or not.
pub struct EditorAreaGuard<'a, T: TimelineContext + ?Sized> {
    host: &'a mut T,
    previous: EditorArea,
}

impl<'a, T: TimelineContext + ?Sized> EditorAreaGuard<'a, T> {
    pub fn switch(host: &'a mut T, target: EditorArea) -> Self {
        let previous = host.editor_area();
        if previous != target {
            tracing::debug!(from = ?previous, to = ?target, "Switching editor area");
            host.set_editor_area(target);
        }
        Self { host, previous }
    }

    /// Area that will be restored.
    pub fn previous(&self) -> &EditorArea {
        &self.previous
    }
}

impl<T: TimelineContext + ?Sized> Deref for EditorAreaGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &*self.host
    }
}

impl<T: TimelineContext + ?Sized> DerefMut for EditorAreaGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut *self.host
    }
}

impl<T: TimelineContext + ?Sized> Drop for EditorAreaGuard<'_, T> {
    fn drop(&mut self) {
        if self.host.editor_area() != self.previous {
            self.host.set_editor_area(self.previous.clone());
        }
    }
}

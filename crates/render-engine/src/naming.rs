//! Output file naming.

use std::path::PathBuf;

use eventcut_common::config::{FilenameCase, RenderPolicy};
use eventcut_project_model::project::ProjectLayout;

/// File-name form of a strip name: whitespace and path separators become
/// `_`, and the case is handled per `case`.
///
/// The result is always a single path component, so it cannot leave the
/// render directory.
pub fn sanitize_segment_name(name: &str, case: FilenameCase) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if c.is_whitespace() || c == '\\' || std::path::is_separator(c) {
                '_'
            } else {
                c
            }
        })
        .collect();
    match case {
        FilenameCase::Preserve => replaced,
        FilenameCase::Lowercase => replaced.to_lowercase(),
    }
}

/// `<project_dir>/<subdir>/<date_id>_<sanitized name>.<ext>`
pub fn output_path(layout: &ProjectLayout, policy: &RenderPolicy, strip_name: &str) -> PathBuf {
    let file_name = format!(
        "{}_{}.{}",
        layout.date_id(),
        sanitize_segment_name(strip_name, policy.filename_case),
        policy.extension
    );
    layout.render_dir(&policy.output_subdir).join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_preserves_case_by_default() {
        assert_eq!(
            sanitize_segment_name("Harbor Sunset", FilenameCase::Preserve),
            "Harbor_Sunset"
        );
    }

    #[test]
    fn test_sanitize_lowercase() {
        assert_eq!(
            sanitize_segment_name("Harbor Sunset", FilenameCase::Lowercase),
            "harbor_sunset"
        );
    }

    #[test]
    fn test_sanitize_replaces_every_whitespace_char() {
        assert_eq!(
            sanitize_segment_name("Old\tTown  Square", FilenameCase::Preserve),
            "Old_Town__Square"
        );
    }

    #[test]
    fn test_sanitize_replaces_path_separators() {
        assert_eq!(
            sanitize_segment_name("Old/Town\\Square", FilenameCase::Preserve),
            "Old_Town_Square"
        );
    }

    #[test]
    fn test_output_path_stays_in_render_dir() {
        let dir = tempfile::tempdir().unwrap();
        let project_dir = dir.path().join("2024-03-15");
        std::fs::create_dir_all(&project_dir).unwrap();
        let layout = ProjectLayout::new(project_dir.join("walk.eventcut"));
        let policy = RenderPolicy::default();
        let render_dir = layout.render_dir(&policy.output_subdir);

        for name in ["Old/Town", "a/../../b", "x/../../../../etc/evil", "..\\up"] {
            let path = output_path(&layout, &policy, name);
            assert_eq!(path.parent(), Some(render_dir.as_path()), "{name}");
        }
        let path = output_path(&layout, &policy, "a/../../b");
        assert!(path.ends_with("render/2024-03-15_a_.._.._b.mp4"));
    }

    #[test]
    fn test_output_path_layout() {
        let dir = tempfile::tempdir().unwrap();
        let project_dir = dir.path().join("2024-03-15");
        std::fs::create_dir_all(&project_dir).unwrap();
        let layout = ProjectLayout::new(project_dir.join("walk.eventcut"));

        let path = output_path(&layout, &RenderPolicy::default(), "River Walk");
        assert!(path.ends_with("2024-03-15/render/2024-03-15_River_Walk.mp4"));
    }
}

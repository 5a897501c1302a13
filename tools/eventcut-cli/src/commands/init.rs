//! Initialize a new project around a source recording.

use std::path::PathBuf;

use eventcut_common::config::AppConfig;
use eventcut_common::timecode::{Frame, FrameRate};
use eventcut_project_model::{LoadedProject, ProjectLayout, SourceMedia, PROJECT_EXTENSION};
use eventcut_render_engine::probe_duration_secs;

pub fn run(
    config: &AppConfig,
    path: PathBuf,
    source: String,
    frames: Option<Frame>,
    fps: Option<f64>,
    audio: bool,
    name: Option<String>,
) -> anyhow::Result<()> {
    let path = if path.extension().is_none() {
        path.with_extension(PROJECT_EXTENSION)
    } else {
        path
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let layout = ProjectLayout::new(&path);
    let fps = FrameRate::new(fps.unwrap_or(config.frame_rate))?;

    let frames = match frames {
        Some(frames) => frames,
        None => {
            let secs = probe_duration_secs(&layout.resolve(&source))?;
            (secs * fps.as_f64()) as Frame
        }
    };
    let name = name.unwrap_or_else(|| layout.date_id());

    println!("Creating project '{}' at {}", name, path.display());

    let media = SourceMedia {
        path: source,
        frames,
        with_audio: audio,
    };
    let project = LoadedProject::create(&path, &name, fps, Some(&media))
        .map_err(|e| anyhow::anyhow!("Failed to create project: {e}"))?;

    println!("Project created successfully:");
    println!("  Directory: {}", layout.project_dir().display());
    println!("  Date: {}", layout.date_id());
    println!("  FPS: {fps}");
    println!("  Source: {} ({} frames)", media.path, frames);
    println!("  Strips: {}", project.document.strips.len());
    println!();
    println!("Directory structure:");
    println!("  {}/", layout.date_id());
    println!("  ├── <events>.{}   (event metadata)", config.metadata.extension);
    println!("  ├── {}", media.path);
    println!(
        "  ├── {}",
        path.file_name().unwrap_or_default().to_string_lossy()
    );
    println!("  └── {}/        (rendered clips)", config.render.output_subdir);

    Ok(())
}

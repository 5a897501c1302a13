//! Strips from events: cut the timeline at each event and name the pieces.

use std::path::PathBuf;

use eventcut_common::config::{AppConfig, MetadataResolution};
use eventcut_common::timecode::FrameRate;
use eventcut_project_model::event::locate_metadata;
use eventcut_segmenter::{run_segment_command, SegmenterConfig};

pub fn run(
    config: &AppConfig,
    path: PathBuf,
    metadata: Option<PathBuf>,
    frame_rate: Option<f64>,
    first_match: bool,
) -> anyhow::Result<()> {
    let mut project = super::load_project(&path)?;
    let layout = project.layout();

    let mut segmenter_config = SegmenterConfig::from_app_config(config)?;
    if let Some(fps) = frame_rate {
        segmenter_config.frame_rate = FrameRate::new(fps)?;
    }
    if !segmenter_config.frame_rate.approx_eq(project.document.fps) {
        tracing::warn!(
            events_fps = %segmenter_config.frame_rate,
            project_fps = %project.document.fps,
            "Event frame rate differs from the project rate; cuts will drift"
        );
    }

    let metadata = match metadata {
        Some(path) => path,
        None => {
            let resolution = if first_match {
                MetadataResolution::FirstMatch
            } else {
                config.metadata.resolution
            };
            locate_metadata(layout.project_dir(), &config.metadata.extension, resolution)?
        }
    };

    println!("Segmenting {}", path.display());
    println!("  Metadata: {}", metadata.display());
    println!("  Frame rate: {}", segmenter_config.frame_rate);

    let (status, report) =
        run_segment_command(&mut project.document, &metadata, &segmenter_config)?;
    project
        .save()
        .map_err(|e| anyhow::anyhow!("Failed to save project: {e}"))?;

    println!(
        "  Events: {} ({} skipped)",
        report.events, report.skipped
    );
    println!("  Strips renamed: {}", report.renamed);
    println!(
        "  Strips muted/unmuted: {}/{}",
        report.muted, report.unmuted
    );
    println!("{status}");

    Ok(())
}

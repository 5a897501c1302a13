//! Validate a project and its event metadata.

use std::path::PathBuf;

use eventcut_common::config::AppConfig;
use eventcut_project_model::event::{load_events, locate_metadata};
use eventcut_project_model::FrameRange;

pub fn run(config: &AppConfig, path: PathBuf, metadata: Option<PathBuf>) -> anyhow::Result<()> {
    println!("Validating project at: {}", path.display());

    let project = super::load_project(&path)?;
    let layout = project.layout();
    let rate = config.frame_rate()?;

    println!("  Name: {}", project.document.name);
    println!("  Version: {}", project.document.version);
    println!("  FPS: {}", project.document.fps);
    println!("  Strips: {}", project.document.strips.len());

    let mut issues = project.validate_sources();
    if !rate.approx_eq(project.document.fps) {
        issues.push(format!(
            "Event frame rate {rate} differs from project rate {}",
            project.document.fps
        ));
    }

    let metadata = match metadata {
        Some(path) => path,
        None => locate_metadata(
            layout.project_dir(),
            &config.metadata.extension,
            config.metadata.resolution,
        )?,
    };
    let events = load_events(&metadata)?;
    println!("  Metadata: {} ({} events)", metadata.display(), events.len());
    println!();

    let mut spans: Vec<(&str, FrameRange)> = vec![];
    for event in &events {
        if event.is_skipped(&config.skip_prefix) {
            println!("  [SKIP] {}", event.name);
            continue;
        }
        let range = match event.frame_range(rate) {
            Ok(range) => range,
            Err(e) => {
                issues.push(format!("Event '{}': {e}", event.name));
                continue;
            }
        };
        println!(
            "  {} {}-{} {}",
            event.name, event.adjusted_start, event.adjusted_end, range
        );
        if range.is_empty() {
            issues.push(format!(
                "Event '{}' ends at or before it starts ({range})",
                event.name
            ));
        }
        for (other, other_range) in &spans {
            if range.overlaps(other_range) {
                issues.push(format!("Event '{}' overlaps '{other}'", event.name));
            }
        }
        spans.push((event.name.as_str(), range));
    }

    if issues.is_empty() {
        println!("\nProject is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        println!(
            "\n{} issue(s) found. Segmentation will still run; later events win.",
            issues.len()
        );
    }

    Ok(())
}

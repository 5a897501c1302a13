//! Render clips: one file per unmuted movie strip.

use std::io::Write;
use std::path::PathBuf;

use eventcut_common::config::{AppConfig, FilenameCase};
use eventcut_render_engine::{
    run_render_command, BatchRenderer, DocumentHost, DryRunBackend, FfmpegBackend, RenderBackend,
    RenderProgress,
};

pub fn run(
    config: &AppConfig,
    path: PathBuf,
    dry_run: bool,
    lowercase: bool,
    keep_compositing: bool,
) -> anyhow::Result<()> {
    let mut project = super::load_project(&path)?;
    let layout = project.layout();

    let mut policy = config.render.clone();
    if lowercase {
        policy.filename_case = FilenameCase::Lowercase;
    }
    if keep_compositing {
        policy.sequencer_only = false;
    }
    let renderer = BatchRenderer::new(layout.clone(), policy);

    let backend: Box<dyn RenderBackend> = if dry_run {
        Box::new(DryRunBackend::new())
    } else {
        let ffmpeg = FfmpegBackend::new().with_progress(Box::new(print_progress));
        if !ffmpeg.is_available() {
            anyhow::bail!("ffmpeg not found in PATH (use --dry-run to plan without rendering)");
        }
        Box::new(ffmpeg)
    };

    println!("Rendering {}", path.display());
    println!("  Backend: {}", backend.name());
    println!(
        "  Output directory: {}",
        layout.render_dir(&renderer.policy().output_subdir).display()
    );

    let mut host = DocumentHost::new(&mut project.document, layout, backend);
    let (status, report) = run_render_command(&mut host, &renderer)?;

    println!();
    for job in &report.jobs {
        println!("  {} {} -> {}", job.name, job.range, job.output.display());
    }
    println!("  {} clip(s)", report.jobs.len());
    println!("{status}");

    Ok(())
}

fn print_progress(p: RenderProgress) {
    print!(
        "\r  Progress: {:.1}% ({:.1}s encoded, ETA: {:.0}s)  ",
        p.progress * 100.0,
        p.out_time_secs,
        p.eta_secs,
    );
    let _ = std::io::stdout().flush();
    if p.complete {
        println!();
    }
}

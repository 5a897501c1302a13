//! ffmpeg render backend.
//!
//! Renders by seeking into the source media of the one movie strip under
//! the requested range and re-encoding that span. Timelines where several
//! strips (or gaps) feed one render are not handled.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Instant;

use serde::Deserialize;

use eventcut_common::error::{EventcutError, EventcutResult};
use eventcut_common::timecode::Frame;

use crate::backend::{RenderBackend, RenderRequest};

/// Progress callback for a running render.
pub type ProgressCallback = Box<dyn Fn(RenderProgress) + Send>;

/// Progress of the current render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderProgress {
    /// Fraction done, [0.0, 1.0].
    pub progress: f64,

    /// Output time encoded so far.
    pub out_time_secs: f64,

    /// Estimated time remaining in seconds.
    pub eta_secs: f64,

    /// ffmpeg reported the end of the stream.
    pub complete: bool,
}

/// Renders through the `ffmpeg` binary on `PATH`.
#[derive(Default)]
pub struct FfmpegBackend {
    progress: Option<ProgressCallback>,
}

impl FfmpegBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report progress of each render to `callback`.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Command-line arguments for `request`.
    pub fn build_args(request: &RenderRequest) -> EventcutResult<Vec<String>> {
        let (source, source_start) = single_source(request)?;
        let seek_secs = request.fps.frames_to_secs(source_start);

        let mut args: Vec<String> = vec!["-y".into(), "-ss".into(), format_secs(seek_secs)];
        args.extend(["-t".into(), format_secs(request.duration_secs())]);
        args.extend(["-i".into(), source.to_string_lossy().into_owned()]);
        args.extend(
            [
                "-map", "0:v:0", "-map", "0:a:0?", "-c:v", "libx264", "-preset", "medium",
                "-pix_fmt", "yuv420p", "-c:a", "aac", "-b:a", "192k", "-movflags", "+faststart",
                "-progress", "pipe:1", "-nostats",
            ]
            .map(String::from),
        );
        args.push(request.output.to_string_lossy().into_owned());
        Ok(args)
    }

    fn run(&self, args: &[String], expected_secs: f64) -> EventcutResult<()> {
        tracing::debug!(args = ?args, "Running ffmpeg");
        let mut child = Command::new("ffmpeg")
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| EventcutError::render(format!("Failed to start ffmpeg: {e}")))?;
        let started = Instant::now();

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EventcutError::render("Failed to capture ffmpeg stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| EventcutError::render("Failed to capture ffmpeg stderr"))?;

        // ffmpeg blocks once the stderr pipe fills up.
        let stderr_task = std::thread::spawn(move || -> String {
            let mut output = String::new();
            match BufReader::new(stderr).read_to_string(&mut output) {
                Ok(_) => output,
                Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
            }
        });

        let mut state = ProgressState::default();
        for line in BufReader::new(stdout).lines() {
            let line = line
                .map_err(|e| EventcutError::render(format!("Failed reading ffmpeg progress: {e}")))?;
            let Some((key, value)) = line.trim().split_once('=') else {
                continue;
            };
            state.update(key, value);
            if key == "progress" {
                if let Some(cb) = &self.progress {
                    cb(state.report(expected_secs, started.elapsed().as_secs_f64()));
                }
            }
        }

        let status = child
            .wait()
            .map_err(|e| EventcutError::render(format!("Failed to wait on ffmpeg: {e}")))?;
        let stderr_output = stderr_task
            .join()
            .unwrap_or_else(|_| "<failed to join stderr reader>".to_string());

        if !status.success() {
            return Err(EventcutError::render(format!(
                "ffmpeg render failed (status {status}): {}",
                stderr_output.trim()
            )));
        }
        Ok(())
    }
}

impl RenderBackend for FfmpegBackend {
    fn render(&mut self, request: &RenderRequest) -> EventcutResult<()> {
        let args = Self::build_args(request)?;
        if let Some(parent) = request.output.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let started = Instant::now();
        self.run(&args, request.duration_secs())?;
        tracing::info!(
            output = %request.output.display(),
            elapsed_secs = started.elapsed().as_secs_f64(),
            "Render complete"
        );
        Ok(())
    }

    fn is_available(&self) -> bool {
        command_exists("ffmpeg")
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

/// The one source slice that covers the whole request.
fn single_source(request: &RenderRequest) -> EventcutResult<(&Path, Frame)> {
    let [slice] = request.slices.as_slice() else {
        return Err(EventcutError::unsupported(format!(
            "ffmpeg renders one movie strip at a time, {} under {}",
            request.slices.len(),
            request.range
        )));
    };
    if slice.range != request.range {
        return Err(EventcutError::unsupported(format!(
            "strip '{}' covers {} of {}",
            slice.strip_name, slice.range, request.range
        )));
    }
    let source = slice.source.as_deref().ok_or_else(|| {
        EventcutError::unsupported(format!("strip '{}' has no source media", slice.strip_name))
    })?;
    Ok((source, slice.source_start))
}

fn format_secs(secs: f64) -> String {
    format!("{secs:.6}")
}

/// Whether `binary` resolves on `PATH`.
pub fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: ProbeFormat,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Container duration of `path` in seconds, as reported by ffprobe.
pub fn probe_duration_secs(path: &Path) -> EventcutResult<f64> {
    let output = Command::new("ffprobe")
        .args(["-v", "error", "-show_entries", "format=duration", "-of", "json"])
        .arg(path)
        .output()
        .map_err(|e| EventcutError::render(format!("Failed to run ffprobe: {e}")))?;
    if !output.status.success() {
        return Err(EventcutError::render(format!(
            "ffprobe failed on {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    parse_probe_duration(&output.stdout).map_err(|e| {
        EventcutError::render(format!(
            "Unreadable ffprobe output for {}: {e}",
            path.display()
        ))
    })
}

fn parse_probe_duration(raw: &[u8]) -> EventcutResult<f64> {
    let probe: ProbeOutput = serde_json::from_slice(raw)?;
    let raw_duration = probe
        .format
        .duration
        .ok_or_else(|| EventcutError::render("no duration reported"))?;
    let duration = raw_duration
        .parse::<f64>()
        .map_err(|e| EventcutError::render(format!("bad duration {raw_duration:?}: {e}")))?;
    if !duration.is_finite() || duration < 0.0 {
        return Err(EventcutError::render(format!("bad duration {duration}")));
    }
    Ok(duration)
}

#[derive(Debug, Default)]
struct ProgressState {
    out_time_secs: f64,
    complete: bool,
}

impl ProgressState {
    fn update(&mut self, key: &str, value: &str) {
        match key {
            // out_time_ms is microseconds too, despite the name.
            "out_time_us" | "out_time_ms" => {
                if let Ok(us) = value.parse::<f64>() {
                    self.out_time_secs = us / 1_000_000.0;
                }
            }
            "progress" => self.complete = value == "end",
            _ => {}
        }
    }

    fn report(&self, expected_secs: f64, elapsed_secs: f64) -> RenderProgress {
        let fraction = if expected_secs <= 0.0 {
            0.0
        } else {
            (self.out_time_secs / expected_secs).clamp(0.0, 1.0)
        };
        let eta_secs = if fraction > 0.0 {
            (elapsed_secs / fraction - elapsed_secs).max(0.0)
        } else {
            0.0
        };
        RenderProgress {
            progress: if self.complete { 1.0 } else { fraction },
            out_time_secs: self.out_time_secs,
            eta_secs,
            complete: self.complete,
        }
    }
}

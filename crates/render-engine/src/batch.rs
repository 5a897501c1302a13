//! Batch rendering of eligible strips.

use std::ops::{Deref, DerefMut};
use std::path::PathBuf;

use serde::Serialize;

use eventcut_common::config::RenderPolicy;
use eventcut_common::error::EventcutResult;
use eventcut_project_model::host::{CommandStatus, RenderContext, RenderSettings, TimelineContext};
use eventcut_project_model::project::ProjectLayout;
use eventcut_project_model::strip::{FrameRange, StripId};

use crate::naming::output_path;

/// Label of the render command in the host's strip menu.
pub const RENDER_COMMAND_LABEL: &str = "Render clips";

/// One planned render: a strip's span written to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderJob {
    /// Strip the job was planned from.
    pub strip_id: StripId,

    /// Strip name at planning time.
    pub name: String,

    /// Frames to render, `[start, end)`.
    pub range: FrameRange,

    /// Output file.
    pub output: PathBuf,
}

/// Jobs a batch completed, in render order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub jobs: Vec<RenderJob>,
}

/// Snapshots the host's render settings and restores them on drop.
pub struct RenderSettingsGuard<'a, H: RenderContext + ?Sized> {
    host: &'a mut H,
    snapshot: RenderSettings,
}

impl<'a, H: RenderContext + ?Sized> RenderSettingsGuard<'a, H> {
    pub fn acquire(host: &'a mut H) -> Self {
        let snapshot = host.render_settings();
        Self { host, snapshot }
    }
}

impl<H: RenderContext + ?Sized> Deref for RenderSettingsGuard<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        &*self.host
    }
}

impl<H: RenderContext + ?Sized> DerefMut for RenderSettingsGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        &mut *self.host
    }
}

impl<H: RenderContext + ?Sized> Drop for RenderSettingsGuard<'_, H> {
    fn drop(&mut self) {
        self.host.set_render_settings(self.snapshot.clone());
        tracing::debug!("Restored render settings");
    }
}

/// Renders each eligible strip of a timeline to its own file.
#[derive(Debug, Clone)]
pub struct BatchRenderer {
    layout: ProjectLayout,
    policy: RenderPolicy,
}

impl BatchRenderer {
    pub fn new(layout: ProjectLayout, policy: RenderPolicy) -> Self {
        Self { layout, policy }
    }

    pub fn policy(&self) -> &RenderPolicy {
        &self.policy
    }

    /// One job per unmuted movie strip, in the host's enumeration order.
    ///
    /// Planning has no side effects, so it can back a dry run.
    pub fn plan<T>(&self, host: &T) -> Vec<RenderJob>
    where
        T: TimelineContext + ?Sized,
    {
        host.strips()
            .into_iter()
            .filter(|strip| strip.is_render_eligible())
            .map(|strip| RenderJob {
                strip_id: strip.id,
                output: output_path(&self.layout, &self.policy, &strip.name),
                range: strip.range(),
                name: strip.name,
            })
            .collect()
    }

    /// Render every planned job, one blocking render call per job.
    ///
    /// The first failure aborts the batch; files already written stay on
    /// disk. Render settings are restored either way.
    pub fn render_all<H>(&self, host: &mut H) -> EventcutResult<BatchReport>
    where
        H: TimelineContext + RenderContext + ?Sized,
    {
        host.deselect_all();
        let jobs = self.plan(&*host);
        tracing::info!(jobs = jobs.len(), "Planned batch render");

        let mut host = RenderSettingsGuard::acquire(host);
        let mut report = BatchReport::default();

        for job in jobs {
            if self.policy.sequencer_only {
                let mut settings = host.render_settings();
                settings.use_sequencer = true;
                settings.use_compositing = false;
                host.set_render_settings(settings);
            }

            tracing::info!(
                strip = %job.name,
                start = job.range.start,
                end = job.range.end,
                "Rendering animation [{}]...",
                job.output.display()
            );
            host.render_range(job.range, job.output.clone())?;
            report.jobs.push(job);
        }

        Ok(report)
    }
}

/// The render command: render every eligible strip.
pub fn run_render_command<H>(
    host: &mut H,
    renderer: &BatchRenderer,
) -> EventcutResult<(CommandStatus, BatchReport)>
where
    H: TimelineContext + RenderContext + ?Sized,
{
    tracing::info!("{RENDER_COMMAND_LABEL}");
    let report = renderer.render_all(host)?;
    Ok((CommandStatus::Finished, report))
}

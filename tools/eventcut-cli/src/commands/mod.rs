pub mod check;
pub mod info;
pub mod init;
pub mod render;
pub mod segment;
pub mod validate;

use std::path::Path;

use eventcut_project_model::LoadedProject;

fn load_project(path: &Path) -> anyhow::Result<LoadedProject> {
    LoadedProject::load(path).map_err(|e| anyhow::anyhow!("Failed to load project: {e}"))
}

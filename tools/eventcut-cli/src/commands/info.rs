//! Show project information.

use std::path::PathBuf;

use eventcut_project_model::StripKind;

pub fn run(path: PathBuf, json: bool) -> anyhow::Result<()> {
    let project = super::load_project(&path)?;
    let doc = &project.document;

    if json {
        println!("{}", serde_json::to_string_pretty(doc)?);
        return Ok(());
    }

    let layout = project.layout();
    println!("Project: {}", doc.name);
    println!("  Date: {}", layout.date_id());
    println!("  Created: {}", doc.created_at);
    println!("  Modified: {}", doc.modified_at);
    println!("  FPS: {}", doc.fps);
    println!("  Editor: {:?}", doc.editor_area);
    println!();

    println!("Render settings:");
    println!("  Range: {}", doc.render.range());
    println!("  Output: {}", doc.render.filepath.display());
    println!(
        "  Sequencer: {}, compositing: {}",
        doc.render.use_sequencer, doc.render.use_compositing
    );
    println!();

    println!("Strips:");
    for s in &doc.strips {
        println!(
            "  #{:<4} {:<6} ch{} {:<18} {}{}",
            s.id,
            format!("{:?}", s.kind).to_lowercase(),
            s.channel,
            s.range().to_string(),
            s.name,
            if s.mute { " (muted)" } else { "" }
        );
    }
    let clips = doc.strips.iter().filter(|s| s.is_render_eligible()).count();
    let movies = doc
        .strips
        .iter()
        .filter(|s| s.kind == StripKind::Movie)
        .count();
    println!();
    println!("  {clips} of {movies} movie strip(s) would render");

    Ok(())
}

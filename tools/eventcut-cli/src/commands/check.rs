//! Check for the external tools rendering needs.

use std::path::PathBuf;

use eventcut_common::config::config_file_path;
use eventcut_render_engine::command_exists;

pub fn run(config: Option<PathBuf>) -> anyhow::Result<()> {
    println!("eventcut System Check");
    println!("{}", "=".repeat(50));

    let mut all_ok = true;
    for (binary, purpose) in [("ffmpeg", "rendering"), ("ffprobe", "init without --frames")] {
        if command_exists(binary) {
            println!("[OK] {binary} ({purpose})");
        } else {
            all_ok = false;
            println!("[MISSING] {binary} ({purpose})");
        }
    }

    let config = config.unwrap_or_else(config_file_path);
    if config.exists() {
        println!("[OK] Config: {}", config.display());
    } else {
        println!("[INFO] Config: {} (not found, using defaults)", config.display());
    }

    println!();
    if all_ok {
        println!("All tools are available. eventcut is ready.");
    } else {
        println!("Some tools are missing; segmenting works, rendering may not.");
    }

    Ok(())
}

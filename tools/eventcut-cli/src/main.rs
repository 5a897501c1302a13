//! eventcut CLI: cut a walk recording into named segments and render them.
//!
//! Usage:
//!   eventcut segment <PROJECT>    Strips from events
//!   eventcut render <PROJECT>     Render clips
//!   eventcut init <PROJECT>       Create a project around a source recording
//!   eventcut info <PROJECT>       Show project information
//!   eventcut validate <PROJECT>   Check a project and its event metadata
//!   eventcut check                Check for ffmpeg and ffprobe

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use eventcut_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "eventcut",
    about = "Segment walk recordings by event metadata and render each segment",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: $XDG_CONFIG_HOME/eventcut/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split the timeline at each event and name the pieces
    Segment {
        /// Path to the project document
        project: PathBuf,

        /// Event metadata file (default: the one beside the project)
        #[arg(short, long)]
        metadata: Option<PathBuf>,

        /// Frame rate for event timespans (default: from config)
        #[arg(long)]
        frame_rate: Option<f64>,

        /// Use the first metadata file when several are found
        #[arg(long)]
        first_match: bool,
    },

    /// Render every unmuted movie strip to its own file
    Render {
        /// Path to the project document
        project: PathBuf,

        /// Log the renders without running them
        #[arg(long)]
        dry_run: bool,

        /// Lowercase segment names in output file names
        #[arg(long)]
        lowercase: bool,

        /// Keep the project's sequencer and compositing flags
        #[arg(long)]
        keep_compositing: bool,
    },

    /// Create a new project around a source recording
    Init {
        /// Path of the project document to create
        project: PathBuf,

        /// Source media, relative to the project directory
        #[arg(short, long)]
        source: String,

        /// Source length in frames (default: probed with ffprobe)
        #[arg(long)]
        frames: Option<i64>,

        /// Project frame rate (default: from config)
        #[arg(long)]
        fps: Option<f64>,

        /// Also add a sound strip for the source audio
        #[arg(long)]
        audio: bool,

        /// Project name (default: the project directory name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Show project information
    Info {
        /// Path to the project document
        project: PathBuf,

        /// Print the whole document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a project and its event metadata
    Validate {
        /// Path to the project document
        project: PathBuf,

        /// Event metadata file (default: the one beside the project)
        #[arg(short, long)]
        metadata: Option<PathBuf>,
    },

    /// Check for the external tools rendering needs
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    eventcut_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Segment {
            project,
            metadata,
            frame_rate,
            first_match,
        } => commands::segment::run(&config, project, metadata, frame_rate, first_match),
        Commands::Render {
            project,
            dry_run,
            lowercase,
            keep_compositing,
        } => commands::render::run(&config, project, dry_run, lowercase, keep_compositing),
        Commands::Init {
            project,
            source,
            frames,
            fps,
            audio,
            name,
        } => commands::init::run(&config, project, source, frames, fps, audio, name),
        Commands::Info { project, json } => commands::info::run(project, json),
        Commands::Validate { project, metadata } => {
            commands::validate::run(&config, project, metadata)
        }
        Commands::Check => commands::check::run(cli.config),
    }
}

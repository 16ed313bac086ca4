//! Layercut CLI: command-line interface for timeline projects.
//!
//! Usage:
//!   layercut init <NAME>                 Create a new project
//!   layercut info <PATH>                 Show project information
//!   layercut validate <PATH>             Check structural invariants
//!   layercut add <PATH> <TYPE>           Place a new element
//!   layercut split <PATH> --at <SECS>    Split elements at a time
//!   layercut delete-track <PATH> <ID>    Delete a track and renumber
//!   layercut frame <PATH> --at <SECS>    Print the composed frame as JSON
//!   layercut export <PATH>               Capture a real-time export

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use layercut_common::config::AppConfig;
use layercut_project_model::ElementType;

mod commands;

#[derive(Parser)]
#[command(
    name = "layercut",
    about = "Timeline editing and compositing for layered video projects",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Element types accepted by `add`.
#[derive(Clone, Copy, ValueEnum)]
enum ElementKind {
    Video,
    Audio,
    Text,
    Shape,
    Image,
    Ai,
    Adjustment,
}

impl From<ElementKind> for ElementType {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Video => ElementType::Video,
            ElementKind::Audio => ElementType::Audio,
            ElementKind::Text => ElementType::Text,
            ElementKind::Shape => ElementType::Shape,
            ElementKind::Image => ElementType::Image,
            ElementKind::Ai => ElementType::AiGenerated,
            ElementKind::Adjustment => ElementType::Adjustment,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new empty project
    Init {
        /// Project name
        name: String,

        /// Output directory [default: configured projects directory]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show project information
    Info {
        /// Path to the project directory
        path: PathBuf,
    },

    /// Check track numbering, element references, and overlaps
    Validate {
        /// Path to the project directory
        path: PathBuf,

        /// Repair issues and save the result
        #[arg(long)]
        repair: bool,
    },

    /// Place a new element (first free track unless --track is given)
    Add {
        /// Path to the project directory
        path: PathBuf,

        /// Element type
        #[arg(value_enum)]
        kind: ElementKind,

        /// Target track id
        #[arg(long)]
        track: Option<u32>,

        /// Start time in seconds (defaults to the playhead)
        #[arg(long)]
        at: Option<f64>,

        /// Duration in seconds (defaults per type)
        #[arg(long)]
        duration: Option<f64>,

        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Text content for text elements
        #[arg(long)]
        text: Option<String>,

        /// Asset id for media elements
        #[arg(long)]
        asset: Option<String>,
    },

    /// Split elements at a time
    Split {
        /// Path to the project directory
        path: PathBuf,

        /// Split time in seconds
        #[arg(long)]
        at: f64,

        /// Only split this element
        #[arg(long)]
        element: Option<String>,
    },

    /// Delete a track with its elements and renumber the rest
    DeleteTrack {
        /// Path to the project directory
        path: PathBuf,

        /// Track id
        track: u32,
    },

    /// Print the composed frame at a time as JSON
    Frame {
        /// Path to the project directory
        path: PathBuf,

        /// Project time in seconds
        #[arg(long)]
        at: f64,
    },

    /// Play the project and capture frame descriptions
    Export {
        /// Path to the project directory
        path: PathBuf,

        /// Output file (JSON lines)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Captured frames per second
        #[arg(long)]
        fps: Option<u32>,

        /// Display refresh rate driving playback
        #[arg(long)]
        refresh_hz: Option<u32>,

        /// Step a simulated clock instead of waiting on the wall clock
        #[arg(long)]
        simulate_clock: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    layercut_common::logging::init_logging(&logging);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "layercut starting");

    match cli.command {
        Commands::Init { name, output } => {
            commands::init::run(name, output.unwrap_or_else(|| config.projects_dir.clone()))
        }
        Commands::Info { path } => commands::info::run(path),
        Commands::Validate { path, repair } => commands::validate::run(path, repair),
        Commands::Add {
            path,
            kind,
            track,
            at,
            duration,
            name,
            text,
            asset,
        } => commands::edit::add(
            path,
            &config,
            commands::edit::AddArgs {
                element_type: kind.into(),
                track,
                at,
                duration,
                name,
                text,
                asset,
            },
        ),
        Commands::Split { path, at, element } => {
            commands::edit::split(path, &config, at, element)
        }
        Commands::DeleteTrack { path, track } => {
            commands::edit::delete_track(path, &config, track)
        }
        Commands::Frame { path, at } => commands::frame::run(path, at),
        Commands::Export {
            path,
            output,
            fps,
            refresh_hz,
            simulate_clock,
        } => {
            commands::export::run(path, output, &config, fps, refresh_hz, simulate_clock).await
        }
    }
}

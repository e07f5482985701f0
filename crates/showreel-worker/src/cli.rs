//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use showreel_media::transitions::TransitionCategory;
use showreel_models::{Platform, WatermarkPosition};

#[derive(Debug, Parser)]
#[command(name = "showreel-worker", version, about = "Compile and post-process vehicle marketing videos")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile a request file (JSON) into one video
    Compile(CompileArgs),
    /// Inspect and select transitions
    #[command(subcommand)]
    Transitions(TransitionsCommand),
    /// Re-encode a video for a social platform
    Platform {
        input: PathBuf,
        #[arg(long, value_parser = parse_platform)]
        platform: Platform,
    },
    /// Print duration, resolution and container of a video
    Probe { input: PathBuf },
    /// Overlay a watermark image in a corner
    Watermark {
        input: PathBuf,
        #[arg(long)]
        image: PathBuf,
        #[arg(long, default_value = "bottom-right", value_parser = parse_position)]
        position: WatermarkPosition,
        #[arg(long, default_value_t = 1.0)]
        opacity: f32,
    },
    /// Extract a single frame as a JPEG
    Thumbnail {
        input: PathBuf,
        #[arg(long, default_value_t = showreel_media::DEFAULT_THUMBNAIL_OFFSET_SECS)]
        offset: f64,
    },
    /// Delete files, continuing past failures
    Cleanup { paths: Vec<PathBuf> },
    /// Check that FFmpeg can be invoked
    Check,
    /// Print the JSON schema of a compilation request
    Schema,
}

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Path to a JSON compilation request
    pub request: PathBuf,

    /// Explicit transition ids, overriding the request
    #[arg(long, value_delimiter = ',', conflicts_with_all = ["preset", "style"])]
    pub transitions: Option<Vec<String>>,

    /// Named transition preset (smooth, dynamic, elegant, energetic, modern, classic)
    #[arg(long, conflicts_with = "style")]
    pub preset: Option<String>,

    /// Vehicle style used to pick transitions
    #[arg(long)]
    pub style: Option<String>,

    /// Scene mood tags, used together with --style
    #[arg(long, value_delimiter = ',', requires = "style")]
    pub moods: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum TransitionsCommand {
    /// List catalog entries
    List {
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
        /// Only transitions suitable for this vehicle style
        #[arg(long)]
        style: Option<String>,
    },
    /// Recommend a sequence for a style and optional moods
    Recommend {
        #[arg(long)]
        style: String,
        #[arg(long, value_delimiter = ',')]
        moods: Vec<String>,
    },
    /// Check a sequence against clip durations
    Validate {
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        durations: Vec<f64>,
    },
    /// Show the named presets
    Presets,
    /// Print the transition filter graph for a clip count
    Graph {
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
        #[arg(long)]
        clips: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Cut,
    Fade,
    Slide,
    Zoom,
    Wipe,
    Dissolve,
}

impl From<CategoryArg> for TransitionCategory {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Cut => TransitionCategory::Cut,
            CategoryArg::Fade => TransitionCategory::Fade,
            CategoryArg::Slide => TransitionCategory::Slide,
            CategoryArg::Zoom => TransitionCategory::Zoom,
            CategoryArg::Wipe => TransitionCategory::Wipe,
            CategoryArg::Dissolve => TransitionCategory::Dissolve,
        }
    }
}

fn parse_platform(s: &str) -> Result<Platform, String> {
    s.parse().map_err(|e: showreel_models::PlatformParseError| e.to_string())
}

fn parse_position(s: &str) -> Result<WatermarkPosition, String> {
    s.parse()
        .map_err(|e: showreel_models::WatermarkPositionParseError| e.to_string())
}

//! Media toolchain configuration.

use std::path::PathBuf;

/// Default FFmpeg `-v` level.
pub const DEFAULT_FFMPEG_LOG_LEVEL: &str = "warning";

/// Locations of external binaries and the shared scratch directory.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// FFmpeg binary (name on PATH or absolute path)
    pub ffmpeg_path: PathBuf,
    /// FFprobe binary (name on PATH or absolute path)
    pub ffprobe_path: PathBuf,
    /// Directory for thumbnails and other temporary artifacts
    pub scratch_dir: PathBuf,
    /// FFmpeg log level passed with `-v`
    pub log_level: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            scratch_dir: std::env::temp_dir().join("showreel"),
            log_level: DEFAULT_FFMPEG_LOG_LEVEL.to_string(),
        }
    }
}

impl MediaConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ffmpeg_path: std::env::var("SHOWREEL_FFMPEG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.ffmpeg_path),
            ffprobe_path: std::env::var("SHOWREEL_FFPROBE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.ffprobe_path),
            scratch_dir: std::env::var("SHOWREEL_SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.scratch_dir),
            log_level: std::env::var("SHOWREEL_LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }

    pub fn with_ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg_path = path.into();
        self
    }

    pub fn with_ffprobe_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffprobe_path = path.into();
        self
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }
}

//! Watermark overlay for dealer-branded exports.
//!
//! The watermark image is scaled to a fixed width and anchored to one of the
//! four frame corners with a 10px margin. The audio stream is copied.

use std::path::{Path, PathBuf};
use tracing::info;

use showreel_models::{QualityTier, WatermarkPosition};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::suffixed_path;
use crate::transitions::TERMINAL_LABEL;

/// Width the watermark image is scaled to (height keeps its aspect).
pub const DEFAULT_WATERMARK_WIDTH: u32 = 150;

/// Configuration for watermark overlay.
///
/// ```ignore
/// let config = WatermarkConfig::default()
///     .with_width(200)
///     .with_opacity(0.8);
/// ```
#[derive(Debug, Clone)]
pub struct WatermarkConfig {
    /// Overlay width in pixels
    pub width: u32,
    /// Opacity (0.0 to 1.0)
    pub opacity: f32,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WATERMARK_WIDTH,
            opacity: 1.0,
        }
    }
}

impl WatermarkConfig {
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width.max(1);
        self
    }

    /// Set watermark opacity (0.0 = invisible, 1.0 = fully opaque).
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }
}

/// Overlay offset for a corner. Independent of the input resolution.
pub fn overlay_position(position: WatermarkPosition) -> &'static str {
    match position {
        WatermarkPosition::TopLeft => "10:10",
        WatermarkPosition::TopRight => "W-w-10:10",
        WatermarkPosition::BottomLeft => "10:H-h-10",
        WatermarkPosition::BottomRight => "W-w-10:H-h-10",
    }
}

/// Build FFmpeg filter complex for overlay.
fn build_overlay_filter(config: &WatermarkConfig, position: WatermarkPosition) -> String {
    let xy = overlay_position(position);
    if config.opacity < 1.0 {
        format!(
            "[1:v]scale={}:-1,format=rgba,colorchannelmixer=aa={:.2}[wm];[0:v][wm]overlay={}:format=auto[{}]",
            config.width, config.opacity, xy, TERMINAL_LABEL
        )
    } else {
        format!(
            "[1:v]scale={}:-1[wm];[0:v][wm]overlay={}[{}]",
            config.width, xy, TERMINAL_LABEL
        )
    }
}

/// Build the overlay command.
pub fn build_watermark_command(
    video_path: &Path,
    watermark_path: &Path,
    output: &Path,
    position: WatermarkPosition,
    config: &WatermarkConfig,
) -> FfmpegCommand {
    FfmpegCommand::new(output)
        .input(video_path)
        .input(watermark_path)
        .filter_complex(build_overlay_filter(config, position))
        .map(format!("[{}]", TERMINAL_LABEL))
        .map("0:a?")
        .output_args(QualityTier::Medium.preset().to_ffmpeg_args())
        .audio_codec("copy")
        .faststart()
}

/// Overlay a watermark and return the path of the new file.
///
/// The output sits next to the input as `<stem>_watermarked.<ext>`.
pub async fn add_watermark(
    runner: &FfmpegRunner,
    video_path: &Path,
    watermark_path: &Path,
    position: WatermarkPosition,
    config: &WatermarkConfig,
) -> MediaResult<PathBuf> {
    for path in [video_path, watermark_path] {
        if !path.exists() {
            return Err(MediaError::watermark_failed(MediaError::FileNotFound(
                path.to_path_buf(),
            )));
        }
    }

    let output = suffixed_path(video_path, "watermarked");

    info!(
        video = %video_path.display(),
        watermark = %watermark_path.display(),
        position = %position,
        opacity = config.opacity,
        "Applying watermark overlay"
    );

    let cmd = build_watermark_command(video_path, watermark_path, &output, position, config);
    if let Err(e) = runner.run("watermark", &cmd).await {
        let _ = tokio::fs::remove_file(&output).await;
        return Err(MediaError::watermark_failed(e));
    }

    info!(output = %output.display(), "Watermark applied successfully");
    Ok(output)
}

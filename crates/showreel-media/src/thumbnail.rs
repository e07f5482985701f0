//! Thumbnail generation.

use std::path::{Path, PathBuf};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::{ensure_parent_dir, scratch_path};

/// Default position of the extracted frame.
pub const DEFAULT_THUMBNAIL_OFFSET_SECS: f64 = 5.0;
/// Thumbnail width; height follows the frame aspect.
pub const THUMBNAIL_SCALE_WIDTH: u32 = 480;

/// Build the single-frame extraction command.
pub fn build_thumbnail_command(video_path: &Path, output_path: &Path, offset_secs: f64) -> FfmpegCommand {
    FfmpegCommand::new(output_path)
        .seek(offset_secs.max(0.0))
        .input(video_path)
        .single_frame()
        .video_filter(format!("scale={}:-2", THUMBNAIL_SCALE_WIDTH))
        .output_arg("-q:v")
        .output_arg("2")
}

/// Extract one frame at `offset_secs` into a fresh JPEG in the scratch directory.
pub async fn generate_thumbnail(
    runner: &FfmpegRunner,
    video_path: impl AsRef<Path>,
    scratch_dir: impl AsRef<Path>,
    offset_secs: f64,
) -> MediaResult<PathBuf> {
    let video_path = video_path.as_ref();
    let output_path = scratch_path(scratch_dir.as_ref(), "thumb", "jpg");
    ensure_parent_dir(&output_path).await?;

    let cmd = build_thumbnail_command(video_path, &output_path, offset_secs);
    runner
        .run("thumbnail", &cmd)
        .await
        .map_err(MediaError::thumbnail_failed)?;

    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MediaConfig;
    use tempfile::TempDir;

    #[test]
    fn test_thumbnail_command() {
        let args = build_thumbnail_command(
            Path::new("reel.mp4"),
            Path::new("thumb.jpg"),
            DEFAULT_THUMBNAIL_OFFSET_SECS,
        )
        .build_args();

        let seek = args.iter().position(|a| a == "-ss").unwrap();
        let input = args.iter().position(|a| a == "-i").unwrap();
        assert!(seek < input);
        assert_eq!(args[seek + 1], "5.000");
        assert!(args.windows(2).any(|w| w[0] == "-frames:v" && w[1] == "1"));
        assert!(args.contains(&"scale=480:-2".to_string()));
    }

    #[tokio::test]
    async fn test_failure_is_wrapped() {
        let dir = TempDir::new().unwrap();
        let runner = FfmpegRunner::from_config(&MediaConfig::default().with_ffmpeg_path("false"));
        let err = generate_thumbnail(&runner, "reel.mp4", dir.path(), 2.0)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to generate thumbnail");
    }
}

//! Platform-specific re-encoding.

use std::path::{Path, PathBuf};
use tracing::info;

use showreel_models::encoding::{
    DEFAULT_AUDIO_BITRATE, DEFAULT_AUDIO_CODEC, DEFAULT_PIXEL_FORMAT, DEFAULT_VIDEO_CODEC,
};
use showreel_models::{Platform, Resolution};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::suffixed_path;

/// Re-encode a video for a platform and cap it at the platform's maximum length.
///
/// The output sits next to the input as `<stem>_<platform>.<ext>`.
pub async fn optimize_for_platform(
    runner: &FfmpegRunner,
    input: &Path,
    platform: Platform,
) -> MediaResult<PathBuf> {
    if !input.exists() {
        return Err(MediaError::platform_failed(
            platform,
            MediaError::FileNotFound(input.to_path_buf()),
        ));
    }

    let output = suffixed_path(input, platform.as_str());
    let cmd = build_platform_command(input, &output, platform);

    info!(
        input = %input.display(),
        platform = %platform,
        "Optimizing video for platform"
    );

    if let Err(e) = runner.run("platform", &cmd).await {
        let _ = tokio::fs::remove_file(&output).await;
        return Err(MediaError::platform_failed(platform, e));
    }

    info!(output = %output.display(), platform = %platform, "Platform version ready");
    Ok(output)
}

/// Build the re-encode command for a platform.
pub fn build_platform_command(input: &Path, output: &Path, platform: Platform) -> FfmpegCommand {
    let settings = platform.settings();

    FfmpegCommand::new(output)
        .input(input)
        .video_filter(fit_filter(settings.resolution))
        .video_codec(DEFAULT_VIDEO_CODEC)
        .output_arg("-b:v")
        .output_arg(settings.video_bitrate)
        .output_arg("-maxrate")
        .output_arg(settings.video_bitrate)
        .output_arg("-bufsize")
        .output_arg(buffer_size(settings.video_bitrate))
        .pixel_format(DEFAULT_PIXEL_FORMAT)
        .audio_codec(DEFAULT_AUDIO_CODEC)
        .audio_bitrate(DEFAULT_AUDIO_BITRATE)
        .max_duration(f64::from(settings.max_duration_secs))
        .faststart()
}

/// Letterbox into the target frame without distorting.
fn fit_filter(resolution: Resolution) -> String {
    format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:color=black,setsar=1",
        w = resolution.width,
        h = resolution.height
    )
}

/// Rate-control buffer of two seconds at the target bitrate ("4000k" -> "8000k").
fn buffer_size(bitrate: &str) -> String {
    let digits: String = bitrate.chars().take_while(|c| c.is_ascii_digit()).collect();
    let unit = &bitrate[digits.len()..];
    match digits.parse::<u64>() {
        Ok(value) => format!("{}{}", value * 2, unit),
        Err(_) => bitrate.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing::fake_ffmpeg;
    use crate::config::MediaConfig;
    use tempfile::TempDir;

    fn arg_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.windows(2)
            .find(|w| w[0] == flag)
            .map(|w| w[1].as_str())
    }

    #[test]
    fn test_tiktok_command() {
        let input = Path::new("/videos/reel.mp4");
        let output = suffixed_path(input, Platform::Tiktok.as_str());
        assert_eq!(output, PathBuf::from("/videos/reel_tiktok.mp4"));

        let args = build_platform_command(input, &output, Platform::Tiktok).build_args();
        assert_eq!(arg_after(&args, "-t"), Some("60.000"));
        assert_eq!(arg_after(&args, "-b:v"), Some("4000k"));
        assert_eq!(arg_after(&args, "-bufsize"), Some("8000k"));
        assert!(arg_after(&args, "-vf").unwrap().starts_with("scale=1080:1920"));
        assert_eq!(args.last().map(String::as_str), Some("/videos/reel_tiktok.mp4"));
    }

    #[test]
    fn test_youtube_duration_cap() {
        let args = build_platform_command(
            Path::new("a.mp4"),
            Path::new("a_youtube.mp4"),
            Platform::Youtube,
        )
        .build_args();
        assert_eq!(arg_after(&args, "-t"), Some("600.000"));
        assert!(arg_after(&args, "-vf").unwrap().starts_with("scale=1920:1080"));
    }

    #[test]
    fn test_buffer_size() {
        assert_eq!(buffer_size("3500k"), "7000k");
        assert_eq!(buffer_size("8M"), "16M");
        assert_eq!(buffer_size("fast"), "fast");
    }

    #[tokio::test]
    async fn test_missing_input() {
        let runner = FfmpegRunner::default();
        let err = optimize_for_platform(&runner, Path::new("/nonexistent/reel.mp4"), Platform::Instagram)
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::PlatformOptimizationFailed { platform: Platform::Instagram, .. }));
    }

    #[tokio::test]
    async fn test_transcoder_failure() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("reel.mp4");
        tokio::fs::write(&input, b"not really a video").await.unwrap();

        let runner = FfmpegRunner::from_config(&MediaConfig::default().with_ffmpeg_path("false"));
        let err = optimize_for_platform(&runner, &input, Platform::Tiktok)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to optimize video for tiktok");
    }

    #[tokio::test]
    async fn test_failed_encode_leaves_no_partial_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("reel.mp4");
        tokio::fs::write(&input, b"not really a video").await.unwrap();
        let ffmpeg = fake_ffmpeg(
            dir.path(),
            "for last; do :; done\necho partial > \"$last\"\nexit 1",
        );

        let runner = FfmpegRunner::from_config(&MediaConfig::default().with_ffmpeg_path(ffmpeg));
        let err = optimize_for_platform(&runner, &input, Platform::Facebook)
            .await
            .unwrap_err();

        assert!(matches!(err, MediaError::PlatformOptimizationFailed { .. }));
        assert!(!dir.path().join("reel_facebook.mp4").exists());
        assert!(input.exists());
    }
}

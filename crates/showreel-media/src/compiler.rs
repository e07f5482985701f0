//! Compilation of scene clips and an audio track into one video.
//!
//! # Pipeline
//!
//! 1. Validate the request and sort clips by scene number (stable).
//! 2. Normalize every clip to the target resolution (`[i:v]` -> `[v<i>]`).
//! 3. Chain the normalized streams through the requested transitions.
//! 4. Run FFmpeg once, mapping `[outv]` and the audio input (always last).
//! 5. Move the staged output into place.
//!
//! Output is written to a scratch file first, so a failed run never leaves a
//! partial file at the requested destination.

use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use validator::Validate;

use showreel_models::encoding::{
    DEFAULT_AUDIO_BITRATE, DEFAULT_AUDIO_CODEC, DEFAULT_FRAME_RATE, DEFAULT_PIXEL_FORMAT,
};
use showreel_models::{Clip, ClipKind, CompilationRequest, Resolution};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::config::MediaConfig;
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::{ensure_parent_dir, move_file, scratch_path};
use crate::transitions::graph::{chain_transitions, concat_segment, SEGMENT_SEPARATOR};
use crate::transitions::{resolve_transitions, TransitionCatalog, TERMINAL_LABEL};

/// Compiles [`CompilationRequest`]s with FFmpeg.
#[derive(Debug, Clone)]
pub struct VideoCompiler {
    runner: FfmpegRunner,
    catalog: TransitionCatalog,
    scratch_dir: PathBuf,
}

impl VideoCompiler {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            runner: FfmpegRunner::from_config(config),
            catalog: TransitionCatalog::builtin(),
            scratch_dir: config.scratch_dir.clone(),
        }
    }

    /// Use a different transition catalog.
    pub fn with_catalog(mut self, catalog: TransitionCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn runner(&self) -> &FfmpegRunner {
        &self.runner
    }

    pub fn catalog(&self) -> &TransitionCatalog {
        &self.catalog
    }

    /// Compile the request and return its output path.
    ///
    /// Every call re-runs the full transcode and overwrites the destination.
    pub async fn compile(&self, request: &CompilationRequest) -> MediaResult<PathBuf> {
        request
            .validate()
            .map_err(|e| MediaError::InvalidRequest(e.to_string()))?;

        if !request.aspect_ratio.matches(request.resolution) {
            // Not corrected: both values are passed through as requested.
            warn!(
                aspect_ratio = %request.aspect_ratio,
                resolution = %request.resolution,
                "Aspect ratio does not match resolution; output may be distorted"
            );
        }

        let extension = request
            .output_path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_else(|| "mp4".to_string());
        let staging = scratch_path(&self.scratch_dir, "compile", &extension);
        ensure_parent_dir(&staging).await?;

        let cmd = self.build_command(request, &staging);

        info!(
            clips = request.clips.len(),
            quality = %request.quality_tier,
            resolution = %request.resolution,
            output = %request.output_path.display(),
            "Compiling video"
        );

        if let Err(e) = self.runner.run("compile", &cmd).await {
            error!(
                error = %e,
                stderr = e.stderr().unwrap_or(""),
                "Video compilation failed"
            );
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(MediaError::compilation_failed(e));
        }

        move_file(&staging, &request.output_path)
            .await
            .map_err(MediaError::compilation_failed)?;

        info!(output = %request.output_path.display(), "Video compiled");
        Ok(request.output_path.clone())
    }

    /// Build the FFmpeg invocation for a request, writing to `output`.
    pub fn build_command(&self, request: &CompilationRequest, output: &Path) -> FfmpegCommand {
        let clips = request.sorted_clips();
        let preset = request.quality_tier.preset();

        let mut cmd = FfmpegCommand::new(output);
        for clip in &clips {
            if clip.kind() == ClipKind::Image {
                cmd = cmd
                    .input_arg("-loop")
                    .input_arg("1")
                    .input_arg("-t")
                    .input_arg(format!("{:.3}", clip.duration_seconds));
            }
            cmd = cmd.input(&clip.source_path);
        }
        let audio_index = clips.len();
        cmd = cmd.input(&request.audio.source_path);

        let graph = build_compile_graph(
            &self.catalog,
            &clips,
            &request.transition_ids(),
            request.resolution,
        );

        cmd.filter_complex(graph)
            .map(format!("[{}]", TERMINAL_LABEL))
            .map(format!("{}:a", audio_index))
            .output_args(preset.to_ffmpeg_args())
            .pixel_format(DEFAULT_PIXEL_FORMAT)
            .audio_codec(DEFAULT_AUDIO_CODEC)
            .audio_bitrate(DEFAULT_AUDIO_BITRATE)
            .output_arg("-aspect")
            .output_arg(request.aspect_ratio.to_string())
            .output_arg("-shortest")
            .output_arg("-avoid_negative_ts")
            .output_arg("make_zero")
            .faststart()
    }
}

/// Scale, pad and retime one input so transitions can blend it.
pub fn normalize_filter(resolution: Resolution) -> String {
    let Resolution { width, height } = resolution;
    format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,\
         pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:color=black,\
         setsar=1,fps={fps},format={pix},setpts=PTS-STARTPTS",
        w = width,
        h = height,
        fps = DEFAULT_FRAME_RATE,
        pix = DEFAULT_PIXEL_FORMAT
    )
}

/// Full compilation graph over clips already in scene order.
///
/// A single clip is normalized straight into the terminal label.
pub fn build_compile_graph<S: AsRef<str>>(
    catalog: &TransitionCatalog,
    clips: &[&Clip],
    transition_ids: &[S],
    resolution: Resolution,
) -> String {
    let normalize = normalize_filter(resolution);

    match clips.len() {
        0 => String::new(),
        1 => format!("[0:v]{}[{}]", normalize, TERMINAL_LABEL),
        n => {
            let labels: Vec<String> = (0..n).map(|i| format!("v{}", i)).collect();
            let mut segments: Vec<String> = labels
                .iter()
                .enumerate()
                .map(|(i, label)| format!("[{}:v]{}[{}]", i, normalize, label))
                .collect();

            let transitions = resolve_transitions(catalog, transition_ids);
            if transitions.is_empty() {
                segments.push(concat_segment(&labels, TERMINAL_LABEL));
            } else {
                let durations: Vec<f64> = clips.iter().map(|c| c.duration_seconds).collect();
                segments.extend(chain_transitions(&labels, &transitions, &durations));
            }

            segments.join(SEGMENT_SEPARATOR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showreel_models::{AspectRatio, AudioTrack, QualityTier};
    use tempfile::TempDir;

    fn clip(id: &str, scene: u32, duration: f64) -> Clip {
        Clip::new(id, format!("/media/{}.mp4", id), duration, scene)
    }

    fn request(clips: Vec<Clip>) -> CompilationRequest {
        CompilationRequest::new(
            clips,
            AudioTrack::new("music", "/media/music.mp3", 30.0),
            "/out/reel.mp4",
        )
    }

    fn compiler() -> VideoCompiler {
        VideoCompiler::new(&MediaConfig::default())
    }

    fn input_paths(args: &[String]) -> Vec<String> {
        args.windows(2)
            .filter(|w| w[0] == "-i")
            .map(|w| w[1].clone())
            .collect()
    }

    fn arg_after<'a>(args: &'a [String], flag: &str) -> Vec<&'a str> {
        args.windows(2)
            .filter(|w| w[0] == flag)
            .map(|w| w[1].as_str())
            .collect()
    }

    #[test]
    fn test_clips_processed_in_scene_order() {
        let req = request(vec![clip("b", 2, 4.0), clip("a", 1, 4.0), clip("c", 3, 4.0)]);
        let args = compiler().build_command(&req, Path::new("/tmp/out.mp4")).build_args();

        assert_eq!(
            input_paths(&args),
            vec!["/media/a.mp4", "/media/b.mp4", "/media/c.mp4", "/media/music.mp3"]
        );
    }

    #[test]
    fn test_stream_mapping_and_flags() {
        let req = request(vec![clip("a", 1, 4.0), clip("b", 2, 4.0)])
            .with_quality(QualityTier::High);
        let args = compiler().build_command(&req, Path::new("/tmp/out.mp4")).build_args();

        assert_eq!(arg_after(&args, "-map"), vec!["[outv]", "2:a"]);
        assert_eq!(arg_after(&args, "-crf"), vec!["18"]);
        assert_eq!(arg_after(&args, "-preset"), vec!["slow"]);
        assert_eq!(arg_after(&args, "-c:a"), vec!["aac"]);
        assert_eq!(arg_after(&args, "-movflags"), vec!["+faststart"]);
        assert!(args.contains(&"-shortest".to_string()));
        assert!(args.contains(&"-y".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/out.mp4"));
    }

    #[test]
    fn test_mismatched_aspect_is_passed_through() {
        let req = request(vec![clip("a", 1, 4.0)])
            .with_aspect_ratio(AspectRatio::LANDSCAPE)
            .with_resolution(Resolution::PORTRAIT_HD);
        let args = compiler().build_command(&req, Path::new("/tmp/out.mp4")).build_args();

        assert_eq!(arg_after(&args, "-aspect"), vec!["16:9"]);
        let graph = arg_after(&args, "-filter_complex")[0];
        assert!(graph.contains("scale=1080:1920"));
    }

    #[test]
    fn test_image_clips_are_looped() {
        let mut photo = clip("photo", 1, 3.0);
        photo.source_path = PathBuf::from("/media/front.jpg");
        let req = request(vec![photo, clip("drive", 2, 4.0)]);
        let args = compiler().build_command(&req, Path::new("/tmp/out.mp4")).build_args();

        let loop_pos = args.iter().position(|a| a == "-loop").unwrap();
        let photo_pos = args.iter().position(|a| a == "/media/front.jpg").unwrap();
        assert!(loop_pos < photo_pos);
        assert_eq!(arg_after(&args, "-t"), vec!["3.000"]);
        assert_eq!(args.iter().filter(|a| *a == "-loop").count(), 1);
    }

    #[test]
    fn test_single_clip_skips_transitions() {
        let c = clip("a", 1, 4.0);
        let graph = build_compile_graph(
            &TransitionCatalog::builtin(),
            &[&c],
            &["fade"],
            Resolution::FULL_HD,
        );
        assert!(graph.starts_with("[0:v]scale=1920:1080"));
        assert!(graph.ends_with("[outv]"));
        assert!(!graph.contains("xfade"));
        assert!(!graph.contains(SEGMENT_SEPARATOR));
    }

    #[test]
    fn test_chain_uses_normalized_labels() {
        let clips = [clip("a", 1, 4.0), clip("b", 2, 6.0), clip("c", 3, 5.0)];
        let refs: Vec<&Clip> = clips.iter().collect();
        let graph = build_compile_graph(
            &TransitionCatalog::builtin(),
            &refs,
            &["fade", "slide-left"],
            Resolution::FULL_HD,
        );
        let segments: Vec<&str> = graph.split(SEGMENT_SEPARATOR).collect();

        assert_eq!(segments.len(), 5);
        assert!(segments[0].starts_with("[0:v]") && segments[0].ends_with("[v0]"));
        assert!(segments[2].ends_with("[v2]"));
        // first fade starts 1s before the 4s clip ends
        assert_eq!(
            segments[3],
            "[v0][v1]xfade=transition=fade:duration=1.000:offset=3.000[x0]"
        );
        // running length 4 + 6 - 1 = 9, slide lasts 0.6s
        assert_eq!(
            segments[4],
            "[x0][v2]xfade=transition=slideleft:duration=0.600:offset=8.400[outv]"
        );
    }

    #[test]
    fn test_unknown_transitions_fall_back_to_concat() {
        let clips = [clip("a", 1, 4.0), clip("b", 2, 4.0)];
        let refs: Vec<&Clip> = clips.iter().collect();
        let graph = build_compile_graph(
            &TransitionCatalog::builtin(),
            &refs,
            &["warp-drive"],
            Resolution::HD,
        );
        assert!(graph.ends_with("[v0][v1]concat=n=2:v=1:a=0[outv]"));
    }

    #[tokio::test]
    async fn test_empty_request_rejected() {
        let err = compiler().compile(&request(vec![])).await.unwrap_err();
        assert!(matches!(err, MediaError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_transcoder_failure_is_wrapped() {
        let dir = TempDir::new().unwrap();
        let config = MediaConfig::default()
            .with_ffmpeg_path("false")
            .with_scratch_dir(dir.path().join("scratch"));
        let output = dir.path().join("reel.mp4");

        let mut req = request(vec![clip("a", 1, 4.0), clip("b", 2, 4.0)]);
        req.output_path = output.clone();

        let err = VideoCompiler::new(&config).compile(&req).await.unwrap_err();

        assert!(matches!(err, MediaError::CompilationFailed { .. }));
        assert_eq!(err.to_string(), "Video compilation failed");
        assert!(!output.exists());
    }
}

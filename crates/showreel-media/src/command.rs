//! FFmpeg command builder and runner.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{ChildStderr, ChildStdout, Command};
use tracing::{debug, warn};

use crate::config::{MediaConfig, DEFAULT_FFMPEG_LOG_LEVEL};
use crate::error::{MediaError, MediaResult};
use crate::metrics::record_process_run;

/// Stderr lines FFmpeg prints for interactive sessions. They never indicate failure.
const BENIGN_STDERR_PATTERNS: &[&str] = &[
    "press [q] to stop",
    "[q] command received",
    "press [?] for help",
    "enter command:",
];

/// One `-i` input together with the options that precede it.
#[derive(Debug, Clone)]
struct FfmpegInput {
    args: Vec<String>,
    path: PathBuf,
}

/// Builder for FFmpeg commands with any number of inputs.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Inputs in `-i` order
    inputs: Vec<FfmpegInput>,
    /// Input arguments waiting for the next `input()` call
    pending_input_args: Vec<String>,
    /// Output file path
    output: PathBuf,
    /// Output arguments (after all inputs)
    output_args: Vec<String>,
    /// Whether to overwrite output
    overwrite: bool,
    /// Log level; the runner's level is used when unset
    log_level: Option<String>,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command writing to `output`.
    pub fn new(output: impl AsRef<Path>) -> Self {
        Self {
            inputs: Vec::new(),
            pending_input_args: Vec::new(),
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: None,
        }
    }

    /// Add an input argument applied to the next input.
    pub fn input_arg(mut self, arg: impl Into<String>) -> Self {
        self.pending_input_args.push(arg.into());
        self
    }

    /// Add an input file.
    pub fn input(mut self, path: impl AsRef<Path>) -> Self {
        let args = std::mem::take(&mut self.pending_input_args);
        self.inputs.push(FfmpegInput {
            args,
            path: path.as_ref().to_path_buf(),
        });
        self
    }

    /// Add output arguments (after all inputs).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Add multiple output arguments.
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set seek position for the next input.
    pub fn seek(self, seconds: f64) -> Self {
        self.input_arg("-ss").input_arg(format!("{:.3}", seconds))
    }

    /// Limit output duration.
    pub fn max_duration(self, seconds: f64) -> Self {
        self.output_arg("-t").output_arg(format!("{:.3}", seconds))
    }

    /// Set video filter.
    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    /// Set filter complex.
    pub fn filter_complex(self, filter: impl Into<String>) -> Self {
        self.output_arg("-filter_complex").output_arg(filter)
    }

    /// Map a stream or filter-graph label into the output.
    pub fn map(self, stream: impl Into<String>) -> Self {
        self.output_arg("-map").output_arg(stream)
    }

    /// Set video codec.
    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:v").output_arg(codec)
    }

    /// Set audio codec.
    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:a").output_arg(codec)
    }

    /// Set audio bitrate.
    pub fn audio_bitrate(self, bitrate: impl Into<String>) -> Self {
        self.output_arg("-b:a").output_arg(bitrate)
    }

    /// Set pixel format.
    pub fn pixel_format(self, format: impl Into<String>) -> Self {
        self.output_arg("-pix_fmt").output_arg(format)
    }

    /// Extract single frame.
    pub fn single_frame(self) -> Self {
        self.output_arg("-frames:v").output_arg("1")
    }

    /// Move the moov atom to the front for progressive playback.
    pub fn faststart(self) -> Self {
        self.output_arg("-movflags").output_arg("+faststart")
    }

    /// Set log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    /// Number of inputs added so far.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        self.build_args_with_level(DEFAULT_FFMPEG_LOG_LEVEL)
    }

    fn build_args_with_level(&self, default_level: &str) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.push("-hide_banner".to_string());
        args.push("-nostdin".to_string());

        args.push("-v".to_string());
        args.push(
            self.log_level
                .clone()
                .unwrap_or_else(|| default_level.to_string()),
        );

        for input in &self.inputs {
            args.extend(input.args.iter().cloned());
            args.push("-i".to_string());
            args.push(input.path.to_string_lossy().to_string());
        }

        args.extend(self.output_args.iter().cloned());

        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Captured result of one finished child process.
#[derive(Debug)]
struct ProcessOutput {
    status: ExitStatus,
    stdout: Vec<u8>,
    /// Non-benign stderr lines
    stderr: Vec<String>,
}

impl ProcessOutput {
    fn stderr_text(&self) -> Option<String> {
        if self.stderr.is_empty() {
            None
        } else {
            Some(self.stderr.join("\n"))
        }
    }
}

/// Runs FFmpeg and FFprobe as owned child processes.
///
/// Children are spawned with `kill_on_drop`, so dropping an in-flight future
/// (for example from a caller-side `tokio::time::timeout`) also kills the
/// process instead of leaving it orphaned.
#[derive(Debug, Clone)]
pub struct FfmpegRunner {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    log_level: String,
}

impl Default for FfmpegRunner {
    fn default() -> Self {
        Self::from_config(&MediaConfig::default())
    }
}

impl FfmpegRunner {
    pub fn from_config(config: &MediaConfig) -> Self {
        Self {
            ffmpeg: config.ffmpeg_path.clone(),
            ffprobe: config.ffprobe_path.clone(),
            log_level: config.log_level.clone(),
        }
    }

    /// Check that the FFmpeg binary can be invoked (`ffmpeg -version`).
    ///
    /// Never fails; any launch problem reports `false`.
    pub async fn is_available(&self) -> bool {
        if which::which(&self.ffmpeg).is_err() {
            return false;
        }

        match run_process(&self.ffmpeg, &["-version".to_string()], false).await {
            Ok(output) => output.status.success(),
            Err(e) => {
                debug!(error = %e, "FFmpeg availability check failed");
                false
            }
        }
    }

    /// Run an FFmpeg command to completion.
    ///
    /// Success is decided by the exit status alone. Benign prompt lines on
    /// stderr are dropped; everything else is returned in the error.
    pub async fn run(&self, operation: &'static str, cmd: &FfmpegCommand) -> MediaResult<()> {
        which::which(&self.ffmpeg).map_err(|_| MediaError::FfmpegNotFound(self.ffmpeg.clone()))?;

        let args = cmd.build_args_with_level(&self.log_level);
        debug!(operation, "Running FFmpeg: {} {}", self.ffmpeg.display(), args.join(" "));

        let started = Instant::now();
        let result = run_process(&self.ffmpeg, &args, false).await;
        let elapsed = started.elapsed().as_secs_f64();

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                record_process_run(operation, false, elapsed);
                return Err(MediaError::ffmpeg_failed(
                    format!("Failed to spawn FFmpeg: {}", e),
                    None,
                    None,
                ));
            }
        };

        record_process_run(operation, output.status.success(), elapsed);

        if output.status.success() {
            debug!(operation, elapsed_secs = elapsed, "FFmpeg finished");
            Ok(())
        } else {
            let stderr = output.stderr_text();
            warn!(
                operation,
                exit_code = ?output.status.code(),
                stderr = stderr.as_deref().unwrap_or(""),
                "FFmpeg exited with non-zero status"
            );
            Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                stderr,
                output.status.code(),
            ))
        }
    }

    /// Run FFprobe on a file and return its JSON document.
    pub async fn probe_json(&self, path: &Path) -> MediaResult<Vec<u8>> {
        which::which(&self.ffprobe)
            .map_err(|_| MediaError::FfprobeNotFound(self.ffprobe.clone()))?;

        let args = vec![
            "-v".to_string(),
            "error".to_string(),
            "-print_format".to_string(),
            "json".to_string(),
            "-show_format".to_string(),
            "-show_streams".to_string(),
            path.to_string_lossy().to_string(),
        ];

        let started = Instant::now();
        let output = run_process(&self.ffprobe, &args, true)
            .await
            .map_err(|e| MediaError::FfprobeFailed {
                message: format!("Failed to spawn FFprobe: {}", e),
                stderr: None,
            })?;
        record_process_run("probe", output.status.success(), started.elapsed().as_secs_f64());

        if !output.status.success() {
            return Err(MediaError::FfprobeFailed {
                message: "FFprobe exited with non-zero status".to_string(),
                stderr: output.stderr_text(),
            });
        }

        Ok(output.stdout)
    }
}

/// Spawn a child, drain its pipes and wait for exit.
async fn run_process(
    program: &Path,
    args: &[String],
    capture_stdout: bool,
) -> std::io::Result<ProcessOutput> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(if capture_stdout {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (status, stdout, stderr) =
        tokio::try_join!(child.wait(), read_stdout(stdout), collect_stderr(stderr))?;

    Ok(ProcessOutput {
        status,
        stdout,
        stderr,
    })
}

async fn read_stdout(stdout: Option<ChildStdout>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut stdout) = stdout {
        stdout.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

async fn collect_stderr(stderr: Option<ChildStderr>) -> std::io::Result<Vec<String>> {
    let mut lines = Vec::new();
    let Some(stderr) = stderr else {
        return Ok(lines);
    };

    let mut reader = BufReader::new(stderr).lines();
    while let Some(line) = reader.next_line().await? {
        let line = line.trim_end().to_string();
        if line.is_empty() || is_benign_stderr(&line) {
            continue;
        }
        debug!(target: "showreel_media::ffmpeg", "{}", line);
        lines.push(line);
    }

    Ok(lines)
}

/// Whether a stderr line is interactive-prompt noise.
pub fn is_benign_stderr(line: &str) -> bool {
    let lower = line.to_lowercase();
    BENIGN_STDERR_PATTERNS
        .iter()
        .any(|pattern| lower.contains(pattern))
}

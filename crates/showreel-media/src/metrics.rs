//! Metrics for external process runs.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const FFMPEG_DURATION_SECONDS: &str = "showreel_ffmpeg_duration_seconds";
    pub const FFMPEG_RUNS_TOTAL: &str = "showreel_ffmpeg_runs_total";
}

/// Record one finished FFmpeg/FFprobe invocation.
pub fn record_process_run(operation: &'static str, success: bool, duration_secs: f64) {
    let status = if success { "success" } else { "failure" };
    let labels = [
        ("operation", operation.to_string()),
        ("status", status.to_string()),
    ];
    counter!(names::FFMPEG_RUNS_TOTAL, &labels).increment(1);
    histogram!(names::FFMPEG_DURATION_SECONDS, &labels).record(duration_secs);
}

//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

use showreel_models::Platform;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during media processing.
///
/// Operation-level variants (`CompilationFailed`, `WatermarkFailed`, ...) keep
/// the underlying process error as their source. Their `Display` never
/// includes FFmpeg output; walk the source chain to log it.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found: {0}")]
    FfmpegNotFound(PathBuf),

    #[error("FFprobe not found: {0}")]
    FfprobeNotFound(PathBuf),

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("FFprobe command failed: {message}")]
    FfprobeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("Video compilation failed")]
    CompilationFailed {
        #[source]
        source: Box<MediaError>,
    },

    #[error("Failed to optimize video for {platform}")]
    PlatformOptimizationFailed {
        platform: Platform,
        #[source]
        source: Box<MediaError>,
    },

    #[error("Failed to extract video information")]
    ProbeFailed {
        #[source]
        source: Box<MediaError>,
    },

    #[error("Failed to add watermark")]
    WatermarkFailed {
        #[source]
        source: Box<MediaError>,
    },

    #[error("Failed to generate thumbnail")]
    ThumbnailFailed {
        #[source]
        source: Box<MediaError>,
    },

    #[error("Invalid compilation request: {0}")]
    InvalidRequest(String),

    #[error("Unknown transition: {0}")]
    UnknownTransition(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid video file: {0}")]
    InvalidVideo(String),
}

impl MediaError {
    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    pub fn compilation_failed(source: MediaError) -> Self {
        Self::CompilationFailed {
            source: Box::new(source),
        }
    }

    pub fn platform_failed(platform: Platform, source: MediaError) -> Self {
        Self::PlatformOptimizationFailed {
            platform,
            source: Box::new(source),
        }
    }

    pub fn probe_failed(source: MediaError) -> Self {
        Self::ProbeFailed {
            source: Box::new(source),
        }
    }

    pub fn watermark_failed(source: MediaError) -> Self {
        Self::WatermarkFailed {
            source: Box::new(source),
        }
    }

    pub fn thumbnail_failed(source: MediaError) -> Self {
        Self::ThumbnailFailed {
            source: Box::new(source),
        }
    }

    /// Captured process stderr, looking through operation wrappers.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::FfmpegFailed { stderr, .. } | Self::FfprobeFailed { stderr, .. } => {
                stderr.as_deref()
            }
            Self::CompilationFailed { source }
            | Self::PlatformOptimizationFailed { source, .. }
            | Self::ProbeFailed { source }
            | Self::WatermarkFailed { source }
            | Self::ThumbnailFailed { source } => source.stderr(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_error_hides_stderr() {
        let inner = MediaError::ffmpeg_failed(
            "FFmpeg exited with non-zero status",
            Some("Invalid data found when processing input".to_string()),
            Some(1),
        );
        let err = MediaError::compilation_failed(inner);

        assert_eq!(err.to_string(), "Video compilation failed");
        assert_eq!(err.stderr(), Some("Invalid data found when processing input"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_platform_error_message() {
        let err = MediaError::platform_failed(
            Platform::Tiktok,
            MediaError::ffmpeg_failed("boom", None, Some(1)),
        );
        assert_eq!(err.to_string(), "Failed to optimize video for tiktok");
        assert!(err.stderr().is_none());
    }
}

//! Clip and audio track models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// File extensions treated as still images.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// A reference to a media segment included in a compiled video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct Clip {
    /// Caller-assigned identifier
    pub id: String,

    /// Path to the source video or image
    pub source_path: PathBuf,

    /// Duration in seconds
    #[validate(range(min = 0.0))]
    pub duration_seconds: f64,

    /// Ordering key within the compiled sequence (not necessarily contiguous)
    pub scene_number: u32,
}

/// How a clip source is fed to FFmpeg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipKind {
    /// Regular video segment
    Video,
    /// Still image, looped for the clip duration
    Image,
}

impl Clip {
    /// Create a new clip.
    pub fn new(
        id: impl Into<String>,
        source_path: impl Into<PathBuf>,
        duration_seconds: f64,
        scene_number: u32,
    ) -> Self {
        Self {
            id: id.into(),
            source_path: source_path.into(),
            duration_seconds,
            scene_number,
        }
    }

    /// Infer the clip kind from the source file extension.
    pub fn kind(&self) -> ClipKind {
        if is_image_path(&self.source_path) {
            ClipKind::Image
        } else {
            ClipKind::Video
        }
    }
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// The single audio track mapped onto a compiled video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct AudioTrack {
    pub id: String,
    pub source_path: PathBuf,
    #[validate(range(min = 0.0))]
    pub duration_seconds: f64,
}

impl AudioTrack {
    pub fn new(id: impl Into<String>, source_path: impl Into<PathBuf>, duration_seconds: f64) -> Self {
        Self {
            id: id.into(),
            source_path: source_path.into(),
            duration_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_kind_from_extension() {
        assert_eq!(Clip::new("a", "car.JPG", 3.0, 1).kind(), ClipKind::Image);
        assert_eq!(Clip::new("b", "car.webp", 3.0, 1).kind(), ClipKind::Image);
        assert_eq!(Clip::new("c", "drive.mp4", 3.0, 1).kind(), ClipKind::Video);
        assert_eq!(Clip::new("d", "no_extension", 3.0, 1).kind(), ClipKind::Video);
    }

    #[test]
    fn test_negative_duration_rejected() {
        let clip = Clip::new("a", "drive.mp4", -1.0, 1);
        assert!(clip.validate().is_err());
    }
}

//! Compilation request model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

use crate::clip::{AudioTrack, Clip};
use crate::encoding::{AspectRatio, QualityTier, Resolution};

/// Transition used between every clip pair when the caller supplies none.
pub const DEFAULT_TRANSITION_ID: &str = "fade";

/// Everything needed to compile one marketing video.
///
/// `resolution` and `aspect_ratio` are independent knobs. They are not
/// cross-validated here, so a 16:9 request with a portrait resolution is
/// accepted as-is.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct CompilationRequest {
    /// Clips to include, ordered later by `scene_number`
    #[validate(length(min = 1, message = "at least one clip is required"), nested)]
    pub clips: Vec<Clip>,

    /// Audio track mapped to the output
    #[validate(nested)]
    pub audio: AudioTrack,

    /// Destination file
    pub output_path: PathBuf,

    /// Transition ids between adjacent clips (expected `clips.len() - 1`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transitions: Option<Vec<String>>,

    #[serde(default)]
    #[schemars(with = "String")]
    pub aspect_ratio: AspectRatio,

    #[serde(default)]
    #[schemars(with = "String")]
    pub resolution: Resolution,

    #[serde(default)]
    pub quality_tier: QualityTier,
}

impl CompilationRequest {
    /// Create a request with default resolution, aspect ratio and quality.
    pub fn new(clips: Vec<Clip>, audio: AudioTrack, output_path: impl Into<PathBuf>) -> Self {
        Self {
            clips,
            audio,
            output_path: output_path.into(),
            transitions: None,
            aspect_ratio: AspectRatio::default(),
            resolution: Resolution::default(),
            quality_tier: QualityTier::default(),
        }
    }

    pub fn with_transitions<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.transitions = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_quality(mut self, quality_tier: QualityTier) -> Self {
        self.quality_tier = quality_tier;
        self
    }

    /// Clips in scene order. Ties keep their original relative order.
    pub fn sorted_clips(&self) -> Vec<&Clip> {
        let mut clips: Vec<&Clip> = self.clips.iter().collect();
        clips.sort_by_key(|clip| clip.scene_number);
        clips
    }

    /// Transition ids to use, defaulting to one `fade` per adjacent clip pair.
    pub fn transition_ids(&self) -> Vec<String> {
        match &self.transitions {
            Some(ids) => ids.clone(),
            None => vec![DEFAULT_TRANSITION_ID.to_string(); self.clips.len().saturating_sub(1)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(scenes: &[u32]) -> CompilationRequest {
        let clips = scenes
            .iter()
            .enumerate()
            .map(|(i, scene)| Clip::new(format!("clip-{}", i), format!("clip{}.mp4", i), 4.0, *scene))
            .collect();
        CompilationRequest::new(clips, AudioTrack::new("audio", "music.mp3", 30.0), "out.mp4")
    }

    #[test]
    fn test_sorted_clips_by_scene() {
        let req = request(&[2, 1, 3]);
        let order: Vec<u32> = req.sorted_clips().iter().map(|c| c.scene_number).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let req = request(&[2, 1, 2, 1]);
        let ids: Vec<&str> = req.sorted_clips().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["clip-1", "clip-3", "clip-0", "clip-2"]);
    }

    #[test]
    fn test_default_transitions() {
        let req = request(&[1, 2, 3, 4]);
        assert_eq!(req.transition_ids(), vec!["fade", "fade", "fade"]);

        let single = request(&[1]);
        assert!(single.transition_ids().is_empty());

        let explicit = request(&[1, 2]).with_transitions(["dissolve"]);
        assert_eq!(explicit.transition_ids(), vec!["dissolve"]);
    }

    #[test]
    fn test_empty_clips_fail_validation() {
        let req = request(&[]);
        assert!(req.validate().is_err());
        assert!(request(&[1, 2]).validate().is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "clips": [{"id": "a", "source_path": "a.mp4", "duration_seconds": 5.0, "scene_number": 1}],
            "audio": {"id": "m", "source_path": "m.mp3", "duration_seconds": 20.0},
            "output_path": "out.mp4",
            "resolution": "1080x1920",
            "aspect_ratio": "9:16",
            "quality_tier": "high"
        }"#;
        let req: CompilationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.resolution, Resolution::PORTRAIT_HD);
        assert_eq!(req.aspect_ratio, AspectRatio::PORTRAIT);
        assert_eq!(req.quality_tier, QualityTier::High);
        assert!(req.transitions.is_none());
    }
}

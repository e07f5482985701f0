//! Video encoding configuration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default video codec (H.264)
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";
/// Default audio codec
pub const DEFAULT_AUDIO_CODEC: &str = "aac";
/// Default audio bitrate
pub const DEFAULT_AUDIO_BITRATE: &str = "192k";
/// Output pixel format (broadest player compatibility)
pub const DEFAULT_PIXEL_FORMAT: &str = "yuv420p";
/// Frame rate every input is normalized to before transitions
pub const DEFAULT_FRAME_RATE: u32 = 30;

/// Named quality bundles for compiled videos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    High,
    #[default]
    Medium,
    Low,
}

/// Fixed encoder parameters for a quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityPreset {
    /// Constant Rate Factor (0-51, lower is better)
    pub crf: u8,
    /// x264 speed preset
    pub preset: &'static str,
    /// H.264 profile
    pub profile: &'static str,
    /// H.264 level cap
    pub level: &'static str,
}

impl QualityTier {
    pub const ALL: &'static [QualityTier] = &[QualityTier::High, QualityTier::Medium, QualityTier::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::High => "high",
            QualityTier::Medium => "medium",
            QualityTier::Low => "low",
        }
    }

    /// Encoder parameters for this tier.
    pub fn preset(&self) -> QualityPreset {
        match self {
            QualityTier::High => QualityPreset {
                crf: 18,
                preset: "slow",
                profile: "high",
                level: "4.2",
            },
            QualityTier::Medium => QualityPreset {
                crf: 23,
                preset: "medium",
                profile: "main",
                level: "4.0",
            },
            QualityTier::Low => QualityPreset {
                crf: 28,
                preset: "veryfast",
                profile: "baseline",
                level: "3.1",
            },
        }
    }
}

impl QualityPreset {
    /// Convert to FFmpeg video encoder arguments.
    pub fn to_ffmpeg_args(&self) -> Vec<String> {
        vec![
            "-c:v".to_string(),
            DEFAULT_VIDEO_CODEC.to_string(),
            "-crf".to_string(),
            self.crf.to_string(),
            "-preset".to_string(),
            self.preset.to_string(),
            "-profile:v".to_string(),
            self.profile.to_string(),
            "-level".to_string(),
            self.level.to_string(),
        ]
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QualityTier {
    type Err = QualityTierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(QualityTier::High),
            "medium" => Ok(QualityTier::Medium),
            "low" => Ok(QualityTier::Low),
            _ => Err(QualityTierParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown quality tier: {0}")]
pub struct QualityTierParseError(String);

/// Output frame size in pixels, written as `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Landscape 1080p
    pub const FULL_HD: Resolution = Resolution::new(1920, 1080);
    /// Portrait 1080p for short-form platforms
    pub const PORTRAIT_HD: Resolution = Resolution::new(1080, 1920);
    /// Landscape 720p
    pub const HD: Resolution = Resolution::new(1280, 720);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::FULL_HD
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = ResolutionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| ResolutionParseError(s.to_string()))?;
        let width: u32 = w.parse().map_err(|_| ResolutionParseError(s.to_string()))?;
        let height: u32 = h.parse().map_err(|_| ResolutionParseError(s.to_string()))?;
        if width == 0 || height == 0 {
            return Err(ResolutionParseError(s.to_string()));
        }
        Ok(Resolution { width, height })
    }
}

impl TryFrom<String> for Resolution {
    type Error = ResolutionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Resolution> for String {
    fn from(value: Resolution) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Error)]
#[error("Invalid resolution (expected WIDTHxHEIGHT): {0}")]
pub struct ResolutionParseError(String);

/// Aspect ratio specification, written as `W:H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Standard landscape (16:9)
    pub const LANDSCAPE: AspectRatio = AspectRatio {
        width: 16,
        height: 9,
    };

    /// Standard portrait (9:16) for TikTok/Reels
    pub const PORTRAIT: AspectRatio = AspectRatio {
        width: 9,
        height: 16,
    };

    /// Square (1:1)
    pub const SQUARE: AspectRatio = AspectRatio {
        width: 1,
        height: 1,
    };

    /// Whether a resolution has exactly this ratio.
    pub fn matches(&self, resolution: Resolution) -> bool {
        u64::from(resolution.width) * u64::from(self.height)
            == u64::from(resolution.height) * u64::from(self.width)
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::LANDSCAPE
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for AspectRatio {
    type Err = AspectRatioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| AspectRatioParseError(s.to_string()))?;
        let width: u32 = w.parse().map_err(|_| AspectRatioParseError(s.to_string()))?;
        let height: u32 = h.parse().map_err(|_| AspectRatioParseError(s.to_string()))?;
        if width == 0 || height == 0 {
            return Err(AspectRatioParseError(s.to_string()));
        }
        Ok(AspectRatio { width, height })
    }
}

impl TryFrom<String> for AspectRatio {
    type Error = AspectRatioParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AspectRatio> for String {
    fn from(value: AspectRatio) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Error)]
#[error("Invalid aspect ratio (expected W:H): {0}")]
pub struct AspectRatioParseError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_tiers_ordered_by_fidelity() {
        let high = QualityTier::High.preset();
        let medium = QualityTier::Medium.preset();
        let low = QualityTier::Low.preset();
        assert!(high.crf < medium.crf && medium.crf < low.crf);
        assert_eq!(high.profile, "high");
        assert_eq!(low.profile, "baseline");
    }

    #[test]
    fn test_preset_args() {
        let args = QualityTier::High.preset().to_ffmpeg_args();
        assert!(args.windows(2).any(|w| w[0] == "-crf" && w[1] == "18"));
        assert!(args.windows(2).any(|w| w[0] == "-preset" && w[1] == "slow"));
        assert!(args.windows(2).any(|w| w[0] == "-level" && w[1] == "4.2"));
    }

    #[test]
    fn test_resolution_parse() {
        assert_eq!("1080x1920".parse::<Resolution>().unwrap(), Resolution::PORTRAIT_HD);
        assert!("1080".parse::<Resolution>().is_err());
        assert!("0x720".parse::<Resolution>().is_err());
        assert_eq!(Resolution::HD.to_string(), "1280x720");
    }

    #[test]
    fn test_aspect_ratio_matches() {
        assert!(AspectRatio::LANDSCAPE.matches(Resolution::FULL_HD));
        assert!(!AspectRatio::LANDSCAPE.matches(Resolution::PORTRAIT_HD));
        assert!(AspectRatio::PORTRAIT.matches(Resolution::PORTRAIT_HD));
        assert_eq!("4:5".parse::<AspectRatio>().unwrap().to_string(), "4:5");
    }
}

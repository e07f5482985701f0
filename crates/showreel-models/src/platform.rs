//! Target platforms and overlay placement.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::encoding::Resolution;

/// Social platforms a compiled video can be re-encoded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Tiktok,
    Instagram,
    Youtube,
    Facebook,
}

/// Fixed delivery settings for a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformSettings {
    pub resolution: Resolution,
    /// Target video bitrate (FFmpeg notation, e.g. "4000k")
    pub video_bitrate: &'static str,
    /// Longest video the platform accepts
    pub max_duration_secs: u32,
}

impl Platform {
    pub const ALL: &'static [Platform] = &[
        Platform::Tiktok,
        Platform::Instagram,
        Platform::Youtube,
        Platform::Facebook,
    ];

    /// Returns the platform name as used in filenames.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Tiktok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::Youtube => "youtube",
            Platform::Facebook => "facebook",
        }
    }

    pub fn settings(&self) -> PlatformSettings {
        match self {
            Platform::Tiktok => PlatformSettings {
                resolution: Resolution::PORTRAIT_HD,
                video_bitrate: "4000k",
                max_duration_secs: 60,
            },
            Platform::Instagram => PlatformSettings {
                resolution: Resolution::PORTRAIT_HD,
                video_bitrate: "3500k",
                max_duration_secs: 90,
            },
            Platform::Youtube => PlatformSettings {
                resolution: Resolution::FULL_HD,
                video_bitrate: "8000k",
                max_duration_secs: 600,
            },
            Platform::Facebook => PlatformSettings {
                resolution: Resolution::HD,
                video_bitrate: "4000k",
                max_duration_secs: 240,
            },
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = PlatformParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tiktok" => Ok(Platform::Tiktok),
            "instagram" => Ok(Platform::Instagram),
            "youtube" => Ok(Platform::Youtube),
            "facebook" => Ok(Platform::Facebook),
            _ => Err(PlatformParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown platform: {0}")]
pub struct PlatformParseError(String);

/// Corner a watermark is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl WatermarkPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatermarkPosition::TopLeft => "top-left",
            WatermarkPosition::TopRight => "top-right",
            WatermarkPosition::BottomLeft => "bottom-left",
            WatermarkPosition::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for WatermarkPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WatermarkPosition {
    type Err = WatermarkPositionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "top-left" => Ok(WatermarkPosition::TopLeft),
            "top-right" => Ok(WatermarkPosition::TopRight),
            "bottom-left" => Ok(WatermarkPosition::BottomLeft),
            "bottom-right" => Ok(WatermarkPosition::BottomRight),
            _ => Err(WatermarkPositionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown watermark position: {0}")]
pub struct WatermarkPositionParseError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiktok_settings() {
        let settings = Platform::Tiktok.settings();
        assert_eq!(settings.max_duration_secs, 60);
        assert_eq!(settings.resolution, Resolution::PORTRAIT_HD);
    }

    #[test]
    fn test_platform_parse() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), *platform);
        }
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn test_position_parse_accepts_underscores() {
        assert_eq!(
            "bottom_right".parse::<WatermarkPosition>().unwrap(),
            WatermarkPosition::BottomRight
        );
        assert_eq!(
            serde_json_position("top-left"),
            WatermarkPosition::TopLeft
        );
    }

    fn serde_json_position(s: &str) -> WatermarkPosition {
        serde_json::from_str(&format!("\"{}\"", s)).unwrap()
    }
}

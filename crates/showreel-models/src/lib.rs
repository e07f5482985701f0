//! Shared data models for the Showreel compilation pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Clips, audio tracks and compilation requests
//! - Vehicle styles used for transition recommendation
//! - Quality tiers, resolutions and aspect ratios
//! - Target platforms and watermark placement

pub mod clip;
pub mod encoding;
pub mod platform;
pub mod request;
pub mod style;

// Re-export common types
pub use clip::{AudioTrack, Clip, ClipKind};
pub use encoding::{
    AspectRatio, AspectRatioParseError, QualityPreset, QualityTier, QualityTierParseError,
    Resolution, ResolutionParseError,
};
pub use platform::{
    Platform, PlatformParseError, PlatformSettings, WatermarkPosition,
    WatermarkPositionParseError,
};
pub use request::{CompilationRequest, DEFAULT_TRANSITION_ID};
pub use style::{StyleParseError, VehicleStyle};

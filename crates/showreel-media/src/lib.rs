#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper for compiling vehicle marketing videos.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building and an owned-child process runner
//! - A static transition catalog with style/mood selection policies
//! - Filter-graph construction chaining clips through transitions
//! - Multi-clip compilation with quality tiers and a mapped audio track
//! - Post-processing: platform re-encodes, probing, watermarks, thumbnails

pub mod command;
pub mod compiler;
pub mod config;
pub mod error;
pub mod fs_utils;
pub mod metrics;
pub mod platform;
pub mod probe;
pub mod thumbnail;
pub mod transitions;
pub mod watermark;

pub use command::{is_benign_stderr, FfmpegCommand, FfmpegRunner};
pub use compiler::{build_compile_graph, VideoCompiler};
pub use config::MediaConfig;
pub use error::{MediaError, MediaResult};
pub use fs_utils::cleanup;
pub use platform::optimize_for_platform;
pub use probe::{extract_info, get_duration, VideoInfo};
pub use thumbnail::{generate_thumbnail, DEFAULT_THUMBNAIL_OFFSET_SECS};
pub use transitions::{
    build_graph, optimize_for_pacing, recommended_sequence, transition_presets,
    validate_sequence, SequenceValidation, Transition, TransitionCatalog, TransitionPreset,
};
pub use watermark::{add_watermark, WatermarkConfig};

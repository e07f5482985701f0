//! Transition selection policies.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use showreel_models::VehicleStyle;

use super::catalog::{Transition, TransitionCatalog};

/// Seconds a clip must run beyond its outgoing transition.
pub const CLIP_SAFETY_MARGIN_SECS: f64 = 1.0;

/// Hand-curated two-step sequence per vehicle style.
pub fn recommended_ids(style: VehicleStyle) -> [&'static str; 2] {
    match style {
        VehicleStyle::Luxury => ["fade-black", "dissolve"],
        VehicleStyle::Sporty => ["slide-left", "zoom-in"],
        VehicleStyle::Family => ["fade", "wipe-left"],
        VehicleStyle::Adventure => ["slide-up", "radial"],
        VehicleStyle::Eco => ["fade-white", "smooth-left"],
    }
}

/// Recommended transitions for a style tag. Unknown tags use the family sequence.
pub fn recommended_sequence(catalog: &TransitionCatalog, style: &str) -> Vec<&'static Transition> {
    recommended_ids(VehicleStyle::from_tag_or_default(style))
        .iter()
        .filter_map(|id| catalog.get_by_id(id))
        .collect()
}

/// Pick transition ids from the moods of the scenes being joined.
///
/// Energetic moods win over elegant ones; with neither present the style's
/// recommended sequence is used.
pub fn optimize_for_pacing<S: AsRef<str>>(style: &str, scene_moods: &[S]) -> Vec<&'static str> {
    let moods: Vec<String> = scene_moods
        .iter()
        .map(|m| m.as_ref().to_lowercase())
        .collect();
    let any_mood = |needles: &[&str]| {
        moods
            .iter()
            .any(|mood| needles.iter().any(|needle| mood.contains(needle)))
    };

    if any_mood(&["exciting", "dynamic"]) {
        if style.to_lowercase().contains("sport") {
            return vec!["zoom-in", "slide-left"];
        }
        return vec!["slide-right", "wipe-right"];
    }

    if any_mood(&["elegant", "sophisticated"]) {
        return vec!["dissolve", "fade-black"];
    }

    recommended_ids(VehicleStyle::from_tag_or_default(style)).to_vec()
}

/// One problem found by [`validate_sequence`].
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SequenceError {
    #[error("Expected {expected} transitions for {clips} clips, got {actual}")]
    CountMismatch {
        expected: usize,
        actual: usize,
        clips: usize,
    },

    #[error("Transition {index}: unknown transition '{id}'")]
    UnknownTransition { index: usize, id: String },

    #[error("Transition {index}: clip lasts {clip_duration:.2}s but needs at least {required:.2}s")]
    ClipTooShort {
        index: usize,
        clip_duration: f64,
        required: f64,
    },
}

/// Structured result of sequence validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceValidation {
    pub is_valid: bool,
    pub errors: Vec<SequenceError>,
}

impl SequenceValidation {
    fn from_errors(errors: Vec<SequenceError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Check a transition sequence against the clips it will join.
///
/// Reports every problem found instead of stopping at the first.
pub fn validate_sequence<S: AsRef<str>>(
    catalog: &TransitionCatalog,
    transition_ids: &[S],
    clip_durations: &[f64],
) -> SequenceValidation {
    let mut errors = Vec::new();

    let expected = clip_durations.len().saturating_sub(1);
    if transition_ids.len() != expected || clip_durations.is_empty() {
        errors.push(SequenceError::CountMismatch {
            expected,
            actual: transition_ids.len(),
            clips: clip_durations.len(),
        });
    }

    for (index, id) in transition_ids.iter().enumerate() {
        let id = id.as_ref();
        let Some(transition) = catalog.get_by_id(id) else {
            errors.push(SequenceError::UnknownTransition {
                index,
                id: id.to_string(),
            });
            continue;
        };

        let required = transition.duration + CLIP_SAFETY_MARGIN_SECS;
        if let Some(&clip_duration) = clip_durations.get(index) {
            if clip_duration < required {
                errors.push(SequenceError::ClipTooShort {
                    index,
                    clip_duration,
                    required,
                });
            }
        }
    }

    SequenceValidation::from_errors(errors)
}

/// Named ready-made sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionPreset {
    Smooth,
    Dynamic,
    Elegant,
    Energetic,
    Modern,
    Classic,
}

impl TransitionPreset {
    pub const ALL: &'static [TransitionPreset] = &[
        TransitionPreset::Smooth,
        TransitionPreset::Dynamic,
        TransitionPreset::Elegant,
        TransitionPreset::Energetic,
        TransitionPreset::Modern,
        TransitionPreset::Classic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPreset::Smooth => "smooth",
            TransitionPreset::Dynamic => "dynamic",
            TransitionPreset::Elegant => "elegant",
            TransitionPreset::Energetic => "energetic",
            TransitionPreset::Modern => "modern",
            TransitionPreset::Classic => "classic",
        }
    }

    pub fn ids(&self) -> [&'static str; 2] {
        match self {
            TransitionPreset::Smooth => ["fade", "dissolve"],
            TransitionPreset::Dynamic => ["slide-left", "zoom-in"],
            TransitionPreset::Elegant => ["fade-black", "dissolve"],
            TransitionPreset::Energetic => ["zoom-in", "pixelize"],
            TransitionPreset::Modern => ["slide-right", "circle-open"],
            TransitionPreset::Classic => ["fade", "wipe-left"],
        }
    }
}

impl fmt::Display for TransitionPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransitionPreset {
    type Err = PresetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransitionPreset::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s.to_lowercase())
            .ok_or_else(|| PresetParseError(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("Unknown transition preset: {0}")]
pub struct PresetParseError(String);

/// All presets keyed by name.
pub fn transition_presets() -> BTreeMap<&'static str, [&'static str; 2]> {
    TransitionPreset::ALL
        .iter()
        .map(|p| (p.as_str(), p.ids()))
        .collect()
}

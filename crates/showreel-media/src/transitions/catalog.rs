//! Built-in transition catalog.
//!
//! Every transition is an FFmpeg filter fragment with five placeholders:
//! `{in1}`/`{in2}` (input labels), `{out}` (output label), `{duration}` and
//! `{offset}` (seconds). Apart from `cut`, all entries use `xfade`.

use serde::Serialize;
use std::fmt;

use showreel_models::VehicleStyle;

use crate::error::{MediaError, MediaResult};

/// Broad family a transition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCategory {
    Cut,
    Fade,
    Slide,
    Zoom,
    Wipe,
    Dissolve,
}

impl TransitionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionCategory::Cut => "cut",
            TransitionCategory::Fade => "fade",
            TransitionCategory::Slide => "slide",
            TransitionCategory::Zoom => "zoom",
            TransitionCategory::Wipe => "wipe",
            TransitionCategory::Dissolve => "dissolve",
        }
    }
}

impl fmt::Display for TransitionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Easing curve of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

/// Which vehicle styles a transition suits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Suitability {
    Any,
    Style(VehicleStyle),
}

impl Suitability {
    pub fn accepts(&self, style: VehicleStyle) -> bool {
        match self {
            Suitability::Any => true,
            Suitability::Style(s) => *s == style,
        }
    }
}

/// Immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    pub id: &'static str,
    pub display_name: &'static str,
    pub category: TransitionCategory,
    pub filter_fragment: &'static str,
    /// Default duration in seconds
    pub duration: f64,
    pub easing: Easing,
    pub suitable_for: Suitability,
}

impl Transition {
    /// Fill the fragment template for one chain step.
    pub fn render(&self, in1: &str, in2: &str, out: &str, offset: f64) -> String {
        self.filter_fragment
            .replace("{in1}", in1)
            .replace("{in2}", in2)
            .replace("{out}", out)
            .replace("{duration}", &format!("{:.3}", self.duration))
            .replace("{offset}", &format!("{:.3}", offset))
    }
}

const fn entry(
    id: &'static str,
    display_name: &'static str,
    category: TransitionCategory,
    filter_fragment: &'static str,
    duration: f64,
    easing: Easing,
    suitable_for: Suitability,
) -> Transition {
    Transition {
        id,
        display_name,
        category,
        filter_fragment,
        duration,
        easing,
        suitable_for,
    }
}

static BUILTIN_TRANSITIONS: [Transition; 15] = [
    entry(
        "cut",
        "Hard Cut",
        TransitionCategory::Cut,
        "[{in1}][{in2}]concat=n=2:v=1:a=0[{out}]",
        0.0,
        Easing::Linear,
        Suitability::Any,
    ),
    entry(
        "fade",
        "Crossfade",
        TransitionCategory::Fade,
        "[{in1}][{in2}]xfade=transition=fade:duration={duration}:offset={offset}[{out}]",
        1.0,
        Easing::EaseInOut,
        Suitability::Any,
    ),
    entry(
        "fade-black",
        "Fade Through Black",
        TransitionCategory::Fade,
        "[{in1}][{in2}]xfade=transition=fadeblack:duration={duration}:offset={offset}[{out}]",
        1.2,
        Easing::EaseInOut,
        Suitability::Style(VehicleStyle::Luxury),
    ),
    entry(
        "fade-white",
        "Fade Through White",
        TransitionCategory::Fade,
        "[{in1}][{in2}]xfade=transition=fadewhite:duration={duration}:offset={offset}[{out}]",
        0.8,
        Easing::EaseInOut,
        Suitability::Style(VehicleStyle::Eco),
    ),
    entry(
        "slide-left",
        "Slide Left",
        TransitionCategory::Slide,
        "[{in1}][{in2}]xfade=transition=slideleft:duration={duration}:offset={offset}[{out}]",
        0.6,
        Easing::EaseOut,
        Suitability::Style(VehicleStyle::Sporty),
    ),
    entry(
        "slide-right",
        "Slide Right",
        TransitionCategory::Slide,
        "[{in1}][{in2}]xfade=transition=slideright:duration={duration}:offset={offset}[{out}]",
        0.6,
        Easing::EaseOut,
        Suitability::Any,
    ),
    entry(
        "slide-up",
        "Slide Up",
        TransitionCategory::Slide,
        "[{in1}][{in2}]xfade=transition=slideup:duration={duration}:offset={offset}[{out}]",
        0.7,
        Easing::EaseOut,
        Suitability::Style(VehicleStyle::Adventure),
    ),
    entry(
        "smooth-left",
        "Smooth Left",
        TransitionCategory::Slide,
        "[{in1}][{in2}]xfade=transition=smoothleft:duration={duration}:offset={offset}[{out}]",
        1.0,
        Easing::EaseInOut,
        Suitability::Style(VehicleStyle::Eco),
    ),
    entry(
        "zoom-in",
        "Zoom In",
        TransitionCategory::Zoom,
        "[{in1}][{in2}]xfade=transition=zoomin:duration={duration}:offset={offset}[{out}]",
        0.8,
        Easing::EaseIn,
        Suitability::Style(VehicleStyle::Sporty),
    ),
    entry(
        "wipe-left",
        "Wipe Left",
        TransitionCategory::Wipe,
        "[{in1}][{in2}]xfade=transition=wipeleft:duration={duration}:offset={offset}[{out}]",
        0.7,
        Easing::Linear,
        Suitability::Style(VehicleStyle::Family),
    ),
    entry(
        "wipe-right",
        "Wipe Right",
        TransitionCategory::Wipe,
        "[{in1}][{in2}]xfade=transition=wiperight:duration={duration}:offset={offset}[{out}]",
        0.7,
        Easing::Linear,
        Suitability::Any,
    ),
    entry(
        "radial",
        "Radial Wipe",
        TransitionCategory::Wipe,
        "[{in1}][{in2}]xfade=transition=radial:duration={duration}:offset={offset}[{out}]",
        0.9,
        Easing::EaseInOut,
        Suitability::Style(VehicleStyle::Adventure),
    ),
    entry(
        "circle-open",
        "Circle Open",
        TransitionCategory::Wipe,
        "[{in1}][{in2}]xfade=transition=circleopen:duration={duration}:offset={offset}[{out}]",
        1.0,
        Easing::EaseInOut,
        Suitability::Style(VehicleStyle::Luxury),
    ),
    entry(
        "dissolve",
        "Dissolve",
        TransitionCategory::Dissolve,
        "[{in1}][{in2}]xfade=transition=dissolve:duration={duration}:offset={offset}[{out}]",
        1.5,
        Easing::EaseInOut,
        Suitability::Style(VehicleStyle::Luxury),
    ),
    entry(
        "pixelize",
        "Pixelize",
        TransitionCategory::Dissolve,
        "[{in1}][{in2}]xfade=transition=pixelize:duration={duration}:offset={offset}[{out}]",
        0.6,
        Easing::Linear,
        Suitability::Style(VehicleStyle::Sporty),
    ),
];

/// Read-only registry of transitions, in presentation order.
#[derive(Debug, Clone, Copy)]
pub struct TransitionCatalog {
    entries: &'static [Transition],
}

impl Default for TransitionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TransitionCatalog {
    /// The built-in transition table.
    pub fn builtin() -> Self {
        Self {
            entries: &BUILTIN_TRANSITIONS,
        }
    }

    /// Catalog over a custom static table.
    pub fn from_static(entries: &'static [Transition]) -> Self {
        Self { entries }
    }

    pub fn all(&self) -> &'static [Transition] {
        self.entries
    }

    pub fn list_by_category(&self, category: TransitionCategory) -> Vec<&'static Transition> {
        self.entries
            .iter()
            .filter(|t| t.category == category)
            .collect()
    }

    /// Exact-key lookup. A missing id is an ordinary outcome.
    pub fn get_by_id(&self, id: &str) -> Option<&'static Transition> {
        self.entries.iter().find(|t| t.id == id)
    }

    /// Lookup for callers that named a transition explicitly.
    pub fn require(&self, id: &str) -> MediaResult<&'static Transition> {
        self.get_by_id(id)
            .ok_or_else(|| MediaError::UnknownTransition(id.to_string()))
    }

    /// Transitions marked for any style or for exactly `style`.
    pub fn list_suitable_for(&self, style: VehicleStyle) -> Vec<&'static Transition> {
        self.entries
            .iter()
            .filter(|t| t.suitable_for.accepts(style))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let catalog = TransitionCatalog::builtin();
        let ids: HashSet<&str> = catalog.all().iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), catalog.all().len());
    }

    #[test]
    fn test_every_fragment_has_labels() {
        for t in TransitionCatalog::builtin().all() {
            assert!(t.filter_fragment.contains("{in1}"), "{}", t.id);
            assert!(t.filter_fragment.contains("{in2}"), "{}", t.id);
            assert!(t.filter_fragment.contains("{out}"), "{}", t.id);
            assert!(t.duration >= 0.0);
        }
    }

    #[test]
    fn test_list_by_category_keeps_order() {
        let fades = TransitionCatalog::builtin().list_by_category(TransitionCategory::Fade);
        let ids: Vec<&str> = fades.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["fade", "fade-black", "fade-white"]);
    }

    #[test]
    fn test_get_by_id() {
        let catalog = TransitionCatalog::builtin();
        assert_eq!(catalog.get_by_id("dissolve").map(|t| t.id), Some("dissolve"));
        assert!(catalog.get_by_id("star-wipe").is_none());
        assert!(matches!(
            catalog.require("star-wipe"),
            Err(MediaError::UnknownTransition(_))
        ));
    }

    #[test]
    fn test_suitable_for_includes_any_and_exact_only() {
        let suitable = TransitionCatalog::builtin().list_suitable_for(VehicleStyle::Eco);
        assert!(suitable.iter().any(|t| t.id == "fade"));
        assert!(suitable.iter().any(|t| t.id == "fade-white"));
        assert!(!suitable.iter().any(|t| t.id == "fade-black"));
        assert!(suitable
            .iter()
            .all(|t| matches!(t.suitable_for, Suitability::Any | Suitability::Style(VehicleStyle::Eco))));
    }

    #[test]
    fn test_render_fragment() {
        let fade = TransitionCatalog::builtin().get_by_id("fade").unwrap();
        assert_eq!(
            fade.render("v0", "v1", "outv", 4.0),
            "[v0][v1]xfade=transition=fade:duration=1.000:offset=4.000[outv]"
        );

        let cut = TransitionCatalog::builtin().get_by_id("cut").unwrap();
        assert_eq!(cut.render("0:v", "1:v", "x0", 0.0), "[0:v][1:v]concat=n=2:v=1:a=0[x0]");
    }
}

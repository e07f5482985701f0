//! Scene-to-scene transitions: catalog, selection policies and graph building.

pub mod catalog;
pub mod graph;
pub mod selector;

pub use catalog::{Easing, Suitability, Transition, TransitionCatalog, TransitionCategory};
pub use graph::{build_graph, resolve_transitions, TERMINAL_LABEL};
pub use selector::{
    optimize_for_pacing, recommended_ids, recommended_sequence, transition_presets,
    validate_sequence, SequenceError, SequenceValidation, TransitionPreset,
};

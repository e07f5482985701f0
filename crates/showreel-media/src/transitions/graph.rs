//! Filter-graph construction for transition chains.
//!
//! Clips are joined by a left fold: the running label is combined with the
//! next clip through one transition per adjacent pair. The last step writes
//! to [`TERMINAL_LABEL`]; earlier steps write to throwaway `x<n>` labels.

use tracing::debug;

use super::catalog::{Transition, TransitionCatalog};

/// Label of the final video stream of every graph.
pub const TERMINAL_LABEL: &str = "outv";

/// Separator between filter-graph segments.
pub const SEGMENT_SEPARATOR: &str = ";";

/// Clip length assumed when real durations are unknown.
pub const NOMINAL_CLIP_SECONDS: f64 = 5.0;

/// Resolve ids against the catalog, skipping any that do not exist.
pub fn resolve_transitions<S: AsRef<str>>(
    catalog: &TransitionCatalog,
    ids: &[S],
) -> Vec<&'static Transition> {
    ids.iter()
        .filter_map(|id| {
            let id = id.as_ref();
            let resolved = catalog.get_by_id(id);
            if resolved.is_none() {
                debug!(transition = id, "Skipping unknown transition");
            }
            resolved
        })
        .collect()
}

/// Build a transition graph over raw inputs `[0:v]..[n-1:v]`.
///
/// Returns an empty string for fewer than two clips. When none of the ids
/// resolve the clips are concatenated instead.
pub fn build_graph<S: AsRef<str>>(
    catalog: &TransitionCatalog,
    transition_ids: &[S],
    clip_count: usize,
) -> String {
    if clip_count < 2 {
        return String::new();
    }

    let labels: Vec<String> = (0..clip_count).map(|i| format!("{}:v", i)).collect();
    let transitions = resolve_transitions(catalog, transition_ids);

    if transitions.is_empty() {
        return concat_segment(&labels, TERMINAL_LABEL);
    }

    let durations = vec![NOMINAL_CLIP_SECONDS; clip_count];
    chain_transitions(&labels, &transitions, &durations).join(SEGMENT_SEPARATOR)
}

/// `[a][b]...concat=n=N:v=1:a=0[out]`
pub(crate) fn concat_segment(labels: &[String], output: &str) -> String {
    let inputs: String = labels.iter().map(|l| format!("[{}]", l)).collect();
    format!("{}concat=n={}:v=1:a=0[{}]", inputs, labels.len(), output)
}

/// Fold `labels` through `transitions`, one transition per adjacent pair.
///
/// Extra transitions are ignored. When there are fewer transitions than
/// pairs, the clips left over are concatenated onto the end of the chain so
/// every input still reaches the terminal label.
pub(crate) fn chain_transitions(
    labels: &[String],
    transitions: &[&Transition],
    durations: &[f64],
) -> Vec<String> {
    let pair_count = labels.len().saturating_sub(1);
    let steps = transitions.len().min(pair_count);
    let has_tail = steps < pair_count;
    let duration_of = |i: usize| durations.get(i).copied().unwrap_or(NOMINAL_CLIP_SECONDS);

    let mut segments = Vec::with_capacity(steps + 1);
    let mut current = labels[0].clone();
    let mut running = duration_of(0);

    for (i, transition) in transitions.iter().take(steps).enumerate() {
        let output = if i + 1 == steps && !has_tail {
            TERMINAL_LABEL.to_string()
        } else {
            format!("x{}", i)
        };

        let offset = (running - transition.duration).max(0.0);
        segments.push(transition.render(&current, &labels[i + 1], &output, offset));

        running += duration_of(i + 1) - transition.duration;
        current = output;
    }

    if has_tail {
        let mut tail = vec![current];
        tail.extend(labels[steps + 1..].iter().cloned());
        segments.push(concat_segment(&tail, TERMINAL_LABEL));
    }

    segments
}

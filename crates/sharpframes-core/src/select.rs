use tracing::info;

use crate::frame::{ScoredFrame, SelectionResult};
use crate::pipeline::config::SelectionPolicy;

/// Apply `policy` to scanned scores.
///
/// Input order does not matter; the result is always ascending by index and
/// may be empty when nothing clears the floor or spacing constraints.
pub fn select(scores: &[ScoredFrame], policy: &SelectionPolicy) -> SelectionResult {
    let ordered = index_ordered(scores);

    let kept = match *policy {
        SelectionPolicy::Windowed {
            window_size,
            window_gap,
            score_floor,
        } => select_windowed(&ordered, window_size, window_gap, score_floor),
        SelectionPolicy::GlobalTopK {
            k,
            min_spacing,
            score_floor,
        } => select_top_k(&ordered, k, min_spacing, score_floor),
    };

    if kept.is_empty() {
        info!(policy = %policy, candidates = ordered.len(), "No frame passed selection");
    } else {
        info!(
            policy = %policy,
            candidates = ordered.len(),
            kept = kept.len(),
            "Selection complete"
        );
    }
    SelectionResult { kept }
}

/// Indices kept by [`select`].
pub fn select_indices(scores: &[ScoredFrame], policy: &SelectionPolicy) -> Vec<usize> {
    select(scores, policy).indices()
}

fn index_ordered(scores: &[ScoredFrame]) -> Vec<ScoredFrame> {
    let mut ordered = scores.to_vec();
    ordered.sort_by_key(|s| s.index);
    ordered.dedup_by_key(|s| s.index);
    ordered
}

/// Windows cover positions `[g * stride, g * stride + window_size)` of the
/// index-ordered sequence with `stride = window_size + window_gap`; positions
/// in the gap are never picked.
fn select_windowed(
    ordered: &[ScoredFrame],
    window_size: usize,
    window_gap: usize,
    score_floor: f64,
) -> Vec<ScoredFrame> {
    if window_size == 0 {
        return Vec::new();
    }
    let stride = window_size.saturating_add(window_gap);

    let mut kept = Vec::new();
    let mut start = 0usize;
    while start < ordered.len() {
        let end = start.saturating_add(window_size).min(ordered.len());
        if let Some(best) = best_in_window(&ordered[start..end]) {
            if best.score >= score_floor {
                kept.push(best);
            }
        }
        start = start.saturating_add(stride);
    }
    kept
}

/// Highest score in the window; the earliest frame wins ties. NaN scores
/// are skipped.
fn best_in_window(window: &[ScoredFrame]) -> Option<ScoredFrame> {
    window
        .iter()
        .copied()
        .filter(|s| !s.score.is_nan())
        .reduce(|best, s| if s.score > best.score { s } else { best })
}

fn select_top_k(
    ordered: &[ScoredFrame],
    k: usize,
    min_spacing: Option<usize>,
    score_floor: f64,
) -> Vec<ScoredFrame> {
    let mut candidates: Vec<ScoredFrame> = ordered
        .iter()
        .copied()
        .filter(|s| s.score >= score_floor)
        .collect();
    // Score descending, lowest index first among equals.
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.index.cmp(&b.index)));

    let mut accepted: Vec<ScoredFrame> = Vec::with_capacity(k.min(candidates.len()));
    for candidate in candidates {
        if accepted.len() >= k {
            break;
        }
        if let Some(spacing) = min_spacing {
            let too_close = accepted
                .iter()
                .any(|a| a.index.abs_diff(candidate.index) < spacing);
            if too_close {
                continue;
            }
        }
        accepted.push(candidate);
    }

    accepted.sort_by_key(|s| s.index);
    accepted
}

//! Human-readable record of which frames were kept.
//!
//! Format: `F:<index> (Score:<integer score>)` entries joined by `", "`.
//! Downstream tools parse it back with [`parse_manifest`], so the shape is
//! stable.

use std::sync::OnceLock;

use regex::Regex;

use crate::frame::ScoredFrame;

const ENTRY_SEPARATOR: &str = ", ";

fn entry_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"F:(\d+).*?Score:\s*(\d+(?:\.\d+)?)").expect("valid manifest pattern")
    })
}

/// Render kept frames as a manifest. Scores are truncated toward zero.
pub fn format_manifest(kept: &[ScoredFrame]) -> String {
    kept.iter()
        .map(|s| format!("F:{} (Score:{})", s.index, s.score.max(0.0).trunc() as u64))
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}

/// Recover `(index, score)` pairs from manifest text in order of appearance.
/// Text that does not match the entry pattern is ignored.
pub fn parse_manifest(text: &str) -> Vec<ScoredFrame> {
    entry_pattern()
        .captures_iter(text)
        .filter_map(|caps| {
            let index = caps.get(1)?.as_str().parse::<usize>().ok()?;
            let score = caps.get(2)?.as_str().parse::<f64>().ok()?;
            Some(ScoredFrame::new(index, score))
        })
        .collect()
}

/// [`parse_manifest`] sized to exactly `batch_size` entries: extra entries are
/// dropped and missing ones are filled with `(0, 0.0)`.
pub fn parse_manifest_padded(text: &str, batch_size: usize) -> Vec<ScoredFrame> {
    let mut entries = parse_manifest(text);
    entries.resize(batch_size, ScoredFrame::new(0, 0.0));
    entries
}

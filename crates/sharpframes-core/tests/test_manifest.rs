use approx::assert_abs_diff_eq;

use sharpframes_core::frame::ScoredFrame;
use sharpframes_core::manifest::{format_manifest, parse_manifest, parse_manifest_padded};

#[test]
fn test_format() {
    let kept = [
        ScoredFrame::new(12, 431.9),
        ScoredFrame::new(240, 1002.0),
        ScoredFrame::new(311, 0.4),
    ];
    assert_eq!(
        format_manifest(&kept),
        "F:12 (Score:431), F:240 (Score:1002), F:311 (Score:0)"
    );
}

#[test]
fn test_parse_formatted_manifest() {
    let parsed = parse_manifest("F:12 (Score:431), F:240 (Score:1002)");
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].index, 12);
    assert_abs_diff_eq!(parsed[0].score, 431.0);
    assert_eq!(parsed[1].index, 240);
}

#[test]
fn test_parse_accepts_decimal_scores_and_noise() {
    let parsed = parse_manifest("batch 3 -> F:7 frame (Score: 12.75); junk; F:9 (Score:3)");
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].index, 7);
    assert_abs_diff_eq!(parsed[0].score, 12.75);
    assert_eq!(parsed[1].index, 9);
}

#[test]
fn test_parse_garbage_is_empty() {
    assert!(parse_manifest("").is_empty());
    assert!(parse_manifest("no frames here").is_empty());
}

#[test]
fn test_padded_fills_missing_entries() {
    let parsed = parse_manifest_padded("F:5 (Score:10)", 3);
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[0], ScoredFrame::new(5, 10.0));
    assert_eq!(parsed[1], ScoredFrame::new(0, 0.0));
    assert_eq!(parsed[2], ScoredFrame::new(0, 0.0));
}

#[test]
fn test_padded_truncates_extra_entries() {
    let parsed = parse_manifest_padded("F:1 (Score:1), F:2 (Score:2), F:3 (Score:3)", 2);
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[1].index, 2);
}

#[test]
fn test_format_then_parse_keeps_indices() {
    let kept = [ScoredFrame::new(0, 88.8), ScoredFrame::new(48, 120.2)];
    let indices: Vec<usize> = parse_manifest(&format_manifest(&kept))
        .iter()
        .map(|s| s.index)
        .collect();
    assert_eq!(indices, vec![0, 48]);
}

use sharpframes_core::frame::ScoredFrame;
use sharpframes_core::pipeline::config::SelectionPolicy;
use sharpframes_core::select::{select, select_indices};

const SCENARIO_SCORES: [f64; 10] = [1.0, 9.0, 2.0, 8.0, 3.0, 7.0, 4.0, 6.0, 5.0, 0.0];

fn scored(values: &[f64]) -> Vec<ScoredFrame> {
    values
        .iter()
        .enumerate()
        .map(|(i, &s)| ScoredFrame::new(i, s))
        .collect()
}

fn top_k(k: usize, min_spacing: Option<usize>, score_floor: f64) -> SelectionPolicy {
    SelectionPolicy::GlobalTopK {
        k,
        min_spacing,
        score_floor,
    }
}

fn windowed(window_size: usize, window_gap: usize, score_floor: f64) -> SelectionPolicy {
    SelectionPolicy::Windowed {
        window_size,
        window_gap,
        score_floor,
    }
}

// ---------------------------------------------------------------------------
// GlobalTopK
// ---------------------------------------------------------------------------

#[test]
fn test_top_k_without_spacing() {
    let kept = select(&scored(&SCENARIO_SCORES), &top_k(3, None, 0.0));
    assert_eq!(kept.indices(), vec![1, 3, 5]);
}

#[test]
fn test_top_k_zero_spacing_matches_no_spacing() {
    let scores = scored(&SCENARIO_SCORES);
    assert_eq!(
        select_indices(&scores, &top_k(3, Some(0), 0.0)),
        select_indices(&scores, &top_k(3, None, 0.0))
    );
}

#[test]
fn test_top_k_floor_filters() {
    let kept = select(&scored(&SCENARIO_SCORES), &top_k(3, None, 8.5));
    assert_eq!(kept.indices(), vec![1]);
    assert_eq!(kept.kept[0].score, 9.0);
}

#[test]
fn test_top_k_floor_is_inclusive() {
    let kept = select(&scored(&SCENARIO_SCORES), &top_k(5, None, 8.0));
    assert_eq!(kept.indices(), vec![1, 3]);
}

#[test]
fn test_top_k_spacing_greedy() {
    // Ranked: 9@1, 8@3, 7@5, 6@7, 5@8 ... with spacing 3:
    // accept 1, reject 3, accept 5, reject 7, accept 8
    let kept = select(&scored(&SCENARIO_SCORES), &top_k(3, Some(3), 0.0));
    assert_eq!(kept.indices(), vec![1, 5, 8]);
}

#[test]
fn test_top_k_spacing_may_return_fewer_than_k() {
    let kept = select(&scored(&SCENARIO_SCORES), &top_k(4, Some(6), 0.0));
    assert_eq!(kept.indices(), vec![1, 7]);
}

#[test]
fn test_top_k_spacing_holds_pairwise() {
    let values: Vec<f64> = (0..200).map(|i| ((i * 37) % 101) as f64).collect();
    let kept = select(&scored(&values), &top_k(12, Some(24), 0.0));
    let indices = kept.indices();
    assert!(!indices.is_empty());
    for (a, &i) in indices.iter().enumerate() {
        for &j in &indices[a + 1..] {
            assert!(j - i >= 24, "{i} and {j} are closer than 24");
        }
    }
}

#[test]
fn test_top_k_ties_prefer_lower_index() {
    let kept = select(&scored(&[5.0, 7.0, 7.0, 7.0, 1.0]), &top_k(2, None, 0.0));
    assert_eq!(kept.indices(), vec![1, 2]);
}

#[test]
fn test_top_k_larger_than_input() {
    let kept = select(&scored(&[3.0, 1.0, 2.0]), &top_k(10, None, 0.0));
    assert_eq!(kept.indices(), vec![0, 1, 2]);
}

#[test]
fn test_top_k_all_below_floor_is_empty() {
    let kept = select(&scored(&SCENARIO_SCORES), &top_k(3, None, 100.0));
    assert!(kept.is_empty());
}

#[test]
fn test_nan_scores_never_selected() {
    let kept = select(&scored(&[f64::NAN, 2.0, f64::NAN]), &top_k(3, None, 0.0));
    assert_eq!(kept.indices(), vec![1]);
}

// ---------------------------------------------------------------------------
// Windowed
// ---------------------------------------------------------------------------

#[test]
fn test_windowed_two_windows() {
    let kept = select(&scored(&SCENARIO_SCORES), &windowed(5, 0, 0.0));
    assert_eq!(kept.indices(), vec![1, 5]);
}

#[test]
fn test_windowed_skips_leading_nan() {
    let kept = select(&scored(&[f64::NAN, 5.0, 3.0]), &windowed(3, 0, 0.0));
    assert_eq!(kept.indices(), vec![1]);

    let all_nan = select(&scored(&[f64::NAN, f64::NAN, 4.0]), &windowed(2, 0, 0.0));
    assert_eq!(all_nan.indices(), vec![2]);
}

#[test]
fn test_windowed_partial_last_window() {
    let kept = select(&scored(&SCENARIO_SCORES), &windowed(4, 0, 0.0));
    // [0..4) -> 1, [4..8) -> 5, [8..10) -> 8
    assert_eq!(kept.indices(), vec![1, 5, 8]);
}

#[test]
fn test_windowed_floor_drops_whole_window() {
    let kept = select(&scored(&SCENARIO_SCORES), &windowed(5, 0, 7.5));
    assert_eq!(kept.indices(), vec![1]);
}

#[test]
fn test_windowed_gap_skips_positions() {
    // stride 5: windows [0,1,2] and [5,6,7]
    let kept = select(&scored(&SCENARIO_SCORES), &windowed(3, 2, 0.0));
    assert_eq!(kept.indices(), vec![1, 5]);
}

#[test]
fn test_windowed_at_most_one_per_window() {
    let values: Vec<f64> = (0..97).map(|i| ((i * 13) % 29) as f64).collect();
    let kept = select(&scored(&values), &windowed(10, 0, 0.0));
    assert_eq!(kept.len(), 10);
    for s in &kept.kept {
        let window = s.index / 10;
        assert_eq!(kept.kept.iter().filter(|o| o.index / 10 == window).count(), 1);
    }
}

#[test]
fn test_windowed_ties_prefer_lower_index() {
    let kept = select(&scored(&[2.0, 4.0, 4.0, 1.0]), &windowed(4, 0, 0.0));
    assert_eq!(kept.indices(), vec![1]);
}

#[test]
fn test_windowed_uses_positions_of_sparse_indices() {
    // Step-5 scan: indices 0,5,10,15 with window size 2
    let scores = vec![
        ScoredFrame::new(0, 1.0),
        ScoredFrame::new(5, 3.0),
        ScoredFrame::new(10, 8.0),
        ScoredFrame::new(15, 2.0),
    ];
    assert_eq!(select_indices(&scores, &windowed(2, 0, 0.0)), vec![5, 10]);
}

// ---------------------------------------------------------------------------
// Shared behaviour
// ---------------------------------------------------------------------------

#[test]
fn test_empty_input_is_empty_selection() {
    assert!(select(&[], &top_k(3, Some(24), 0.0)).is_empty());
    assert!(select(&[], &windowed(5, 0, 0.0)).is_empty());
}

#[test]
fn test_input_order_is_irrelevant() {
    let mut shuffled = scored(&SCENARIO_SCORES);
    shuffled.reverse();
    assert_eq!(
        select_indices(&shuffled, &windowed(5, 0, 0.0)),
        vec![1, 5]
    );
    assert_eq!(
        select_indices(&shuffled, &top_k(3, None, 0.0)),
        vec![1, 3, 5]
    );
}

#[test]
fn test_output_strictly_increasing() {
    let values: Vec<f64> = (0..300).map(|i| ((i * 7919) % 1009) as f64).collect();
    for policy in [
        top_k(20, Some(5), 10.0),
        top_k(20, None, 0.0),
        windowed(16, 4, 0.0),
    ] {
        let indices = select_indices(&scored(&values), &policy);
        assert!(indices.windows(2).all(|w| w[0] < w[1]), "{policy}");
    }
}

#[test]
fn test_kept_scores_meet_floor() {
    let values: Vec<f64> = (0..120).map(|i| (i % 17) as f64).collect();
    for policy in [top_k(50, None, 9.0), windowed(7, 1, 9.0)] {
        let kept = select(&scored(&values), &policy);
        assert!(kept.kept.iter().all(|s| s.score >= 9.0));
    }
}

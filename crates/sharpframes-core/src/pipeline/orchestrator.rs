use tracing::info;

use crate::error::Result;
use crate::extract::{extract, Extraction};
use crate::frame::{Frame, SelectionWindow};
use crate::quality::laplacian::sharpness_score;
use crate::scan::scan_window_with;
use crate::select::select;
use crate::source::{FrameSource, MemorySource};

use super::config::{SelectionPolicy, SharpFramesConfig};
use super::types::{PipelineStage, ProgressReporter, RunOutput};

/// Scan, select and extract one segment of `source`.
///
/// The segment is `config.segment.batch_index` planned against the source's
/// frame count. An empty selection is not an error: the output simply holds
/// no frames and an empty manifest.
pub fn run_segment(
    source: &mut dyn FrameSource,
    config: &SharpFramesConfig,
    reporter: &dyn ProgressReporter,
) -> Result<RunOutput> {
    config.validate()?;

    reporter.begin_stage(PipelineStage::Planning, None);
    let total = source.frame_count();
    let window = config.planner().check(config.segment.batch_index, total)?;
    info!(
        batch = config.segment.batch_index,
        window = %window,
        total_frames = ?total,
        "Processing segment"
    );
    reporter.finish_stage();

    reporter.begin_stage(
        PipelineStage::Scanning,
        expected_scans(window, config.scan.step, total),
    );
    let progress = |done: usize| reporter.advance(done);
    let scores = scan_window_with(
        source,
        window,
        &config.scan,
        sharpness_score,
        Some(&progress as &dyn Fn(usize)),
    )?;
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Selecting, Some(scores.len()));
    let selection = select(&scores, &config.selection);
    reporter.finish_stage();

    let extraction = if selection.is_empty() {
        Extraction::default()
    } else {
        reporter.begin_stage(PipelineStage::Extracting, Some(selection.len()));
        let extraction = extract(source, &selection)?;
        reporter.finish_stage();
        extraction
    };

    Ok(RunOutput {
        window: Some(window),
        scores,
        selection,
        extraction,
    })
}

/// Select from scores computed elsewhere and pull the matching frames out of
/// `frames`. Mismatched lengths are truncated to the shorter one.
pub fn run_precomputed(
    frames: Vec<Frame>,
    scores: Vec<f64>,
    policy: &SelectionPolicy,
) -> Result<RunOutput> {
    policy.validate()?;

    let mut source = MemorySource::with_scores(frames, scores);
    let scores = source.scored_frames();
    let selection = select(&scores, policy);
    let extraction = if selection.is_empty() {
        Extraction::default()
    } else {
        extract(&mut source, &selection)?
    };

    info!(
        candidates = scores.len(),
        kept = extraction.len(),
        "Precomputed selection complete"
    );
    Ok(RunOutput {
        window: None,
        scores,
        selection,
        extraction,
    })
}

/// Upper bound on frames the scan will score, when it can be known.
fn expected_scans(window: SelectionWindow, step: usize, total: Option<usize>) -> Option<usize> {
    let step = step.max(1);
    let by_source = total.map(|t| t.saturating_sub(window.start_index).div_ceil(step));
    match (window.is_unbounded(), by_source) {
        (true, by_source) => by_source,
        (false, Some(n)) => Some(n.min(window.length)),
        (false, None) => Some(window.length),
    }
}

//! Concurrent scan: sequential decode on the caller's thread, parallel scoring
//! on a short-lived worker pool.

use crossbeam_channel::{bounded, unbounded, Sender};
use tracing::{debug, info, warn};

use crate::error::{Result, SharpFramesError};
use crate::frame::{Frame, ScoredFrame, SelectionWindow};
use crate::pipeline::config::ScanConfig;
use crate::quality::laplacian::sharpness_score;
use crate::source::FrameSource;

/// Why the driver stopped decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StopReason {
    WindowFilled,
    EndOfSource,
    DecodeError,
}

struct DriveOutcome {
    submitted: usize,
    stop: StopReason,
}

/// Score every `step`-th frame of `window` with the Laplacian sharpness metric.
///
/// Returns `(index, score)` pairs sorted by index.
pub fn scan_window(
    source: &mut dyn FrameSource,
    window: SelectionWindow,
    config: &ScanConfig,
) -> Result<Vec<ScoredFrame>> {
    scan_window_with(source, window, config, sharpness_score, None)
}

/// Scan `window` using `score_fn` on a pool of `config.workers` threads.
///
/// The caller's thread owns `source` and performs every seek and decode.
/// Decoded frames go through a rendezvous queue, so when every worker is busy
/// the driver waits instead of decoding ahead; at most `workers` frames are in
/// flight. The pool is torn down before this function returns.
///
/// `on_progress(frames_submitted)` is called from the driver thread.
pub fn scan_window_with(
    source: &mut dyn FrameSource,
    window: SelectionWindow,
    config: &ScanConfig,
    score_fn: fn(&Frame) -> f64,
    on_progress: Option<&dyn Fn(usize)>,
) -> Result<Vec<ScoredFrame>> {
    let step = config.step.max(1);
    let workers = config.workers.max(1);
    let start = window.start_index;

    if let Some(total) = source.frame_count() {
        if start >= total {
            return Err(SharpFramesError::SegmentExhausted {
                start_index: start,
                total_frames: total,
            });
        }
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("sharpframes-score-{i}"))
        .build()
        .map_err(|e| SharpFramesError::InvalidConfig(format!("scoring pool: {e}")))?;

    let (task_tx, task_rx) = bounded::<(usize, Frame)>(0);
    let (result_tx, result_rx) = unbounded::<ScoredFrame>();

    let outcome = pool.in_place_scope(|scope| {
        for _ in 0..workers {
            let tasks = task_rx.clone();
            let results = result_tx.clone();
            scope.spawn(move |_| {
                for (index, frame) in tasks.iter() {
                    let score = score_fn(&frame);
                    // The receiver outlives the scope.
                    let _ = results.send(ScoredFrame::new(index, score));
                }
            });
        }
        drop(task_rx);
        drop(result_tx);

        let outcome = drive(&mut *source, window, step, &task_tx, on_progress);
        // Closing the queue lets the workers drain and exit.
        drop(task_tx);
        outcome
    })?;

    let mut scores: Vec<ScoredFrame> = result_rx.iter().collect();
    scores.sort_by_key(|s| s.index);

    if scores.is_empty() {
        // A source with a known length already passed the bounds check above,
        // so running dry here only means exhaustion when the length is unknown.
        return Err(match (outcome.stop, source.frame_count()) {
            (StopReason::EndOfSource, None) => SharpFramesError::SegmentExhausted {
                start_index: start,
                total_frames: source.position(),
            },
            _ => SharpFramesError::EmptyScan { start_index: start },
        });
    }

    debug_assert_eq!(scores.len(), outcome.submitted);
    info!(
        window = %window,
        step,
        workers,
        scored = scores.len(),
        stop = ?outcome.stop,
        "Scan complete"
    );
    Ok(scores)
}

/// Decode/skip through the window, submitting decoded frames for scoring.
fn drive(
    source: &mut dyn FrameSource,
    window: SelectionWindow,
    step: usize,
    tasks: &Sender<(usize, Frame)>,
    on_progress: Option<&dyn Fn(usize)>,
) -> Result<DriveOutcome> {
    source.seek(window.start_index)?;

    let mut submitted = 0usize;
    let stop = loop {
        if submitted >= window.length {
            break StopReason::WindowFilled;
        }

        let position = source.position();
        let frame = match source.decode_next() {
            Ok(Some(frame)) => frame,
            Ok(None) => break StopReason::EndOfSource,
            Err(e) => {
                warn!(index = position, error = %e, "Decode failed, ending scan early");
                break StopReason::DecodeError;
            }
        };

        debug!(index = frame.index(), "Submitting frame for scoring");
        if tasks.send((frame.index(), frame)).is_err() {
            break StopReason::DecodeError;
        }
        submitted += 1;
        if let Some(progress) = on_progress {
            progress(submitted);
        }

        if step > 1 && submitted < window.length {
            match source.skip(step - 1) {
                Ok(skipped) if skipped == step - 1 => {}
                Ok(_) => break StopReason::EndOfSource,
                Err(e) => {
                    warn!(index = source.position(), error = %e, "Skip failed, ending scan early");
                    break StopReason::DecodeError;
                }
            }
        }
    };

    Ok(DriveOutcome { submitted, stop })
}

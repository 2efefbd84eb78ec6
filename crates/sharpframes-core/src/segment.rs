use tracing::debug;

use crate::error::{Result, SharpFramesError};
use crate::frame::SelectionWindow;

/// Maps a caller-owned batch counter onto absolute scan windows so a long
/// video can be processed across repeated invocations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentPlanner {
    /// Frames scored per batch; 0 scans everything from the offset in one batch.
    pub frames_per_batch: usize,
    pub global_offset: usize,
    /// Raw frames advanced per scored frame.
    pub step: usize,
}

impl SegmentPlanner {
    pub fn new(frames_per_batch: usize, global_offset: usize) -> Self {
        Self {
            frames_per_batch,
            global_offset,
            step: 1,
        }
    }

    /// Make consecutive segments tile the raw timeline when only every
    /// `step`-th frame is scored.
    pub fn with_step(mut self, step: usize) -> Self {
        self.step = step.max(1);
        self
    }

    /// Absolute start index for `batch_index`.
    ///
    /// `batch_index * frames_per_batch * step + global_offset`, saturating.
    pub fn start_index(&self, batch_index: usize) -> usize {
        if self.frames_per_batch == 0 {
            return if batch_index == 0 {
                self.global_offset
            } else {
                usize::MAX
            };
        }
        batch_index
            .saturating_mul(self.frames_per_batch)
            .saturating_mul(self.step)
            .saturating_add(self.global_offset)
    }

    pub fn plan(&self, batch_index: usize) -> SelectionWindow {
        let start = self.start_index(batch_index);
        if self.frames_per_batch == 0 {
            SelectionWindow::unbounded(start)
        } else {
            SelectionWindow::new(start, self.frames_per_batch)
        }
    }

    /// True when a segment starting at `start_index` has nothing to scan.
    pub fn is_exhausted(start_index: usize, total_frame_count: usize) -> bool {
        start_index >= total_frame_count
    }

    /// Plan `batch_index` and fail with `SegmentExhausted` when it starts past
    /// the end. `total_frame_count` comes from the source metadata; an unknown
    /// count defers the check to the scan.
    pub fn check(
        &self,
        batch_index: usize,
        total_frame_count: Option<usize>,
    ) -> Result<SelectionWindow> {
        let window = self.plan(batch_index);
        if let Some(total) = total_frame_count {
            if Self::is_exhausted(window.start_index, total) {
                return Err(SharpFramesError::SegmentExhausted {
                    start_index: window.start_index,
                    total_frames: total,
                });
            }
        }
        debug!(batch = batch_index, window = %window, "Planned segment");
        Ok(window)
    }

    /// Number of batches needed to cover `total_frame_count` frames.
    pub fn batch_count(&self, total_frame_count: usize) -> usize {
        let remaining = total_frame_count.saturating_sub(self.global_offset);
        if remaining == 0 {
            return 0;
        }
        if self.frames_per_batch == 0 {
            return 1;
        }
        remaining.div_ceil(self.frames_per_batch.saturating_mul(self.step))
    }
}

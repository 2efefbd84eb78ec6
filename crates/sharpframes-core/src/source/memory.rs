use std::path::PathBuf;

use tracing::warn;

use crate::error::Result;
use crate::frame::{ColorMode, Frame, ScoredFrame, SourceInfo};

use super::FrameSource;

/// In-memory frame collection, optionally paired with precomputed scores.
///
/// Scores are typically computed on a low-resolution proxy set while the
/// frames held here are the full-resolution originals with the same index
/// alignment.
pub struct MemorySource {
    frames: Vec<Frame>,
    scores: Option<Vec<f64>>,
    position: usize,
}

impl MemorySource {
    /// Wrap decoded frames. Each frame's index is its position.
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: reindex(frames),
            scores: None,
            position: 0,
        }
    }

    /// Wrap decoded frames together with externally computed scores.
    ///
    /// If the two collections differ in length both are truncated to the
    /// shorter one.
    pub fn with_scores(mut frames: Vec<Frame>, mut scores: Vec<f64>) -> Self {
        if frames.len() != scores.len() {
            let shorter = frames.len().min(scores.len());
            warn!(
                frames = frames.len(),
                scores = scores.len(),
                kept = shorter,
                "Frame/score count mismatch, truncating to the shorter length"
            );
            frames.truncate(shorter);
            scores.truncate(shorter);
        }
        Self {
            frames: reindex(frames),
            scores: Some(scores),
            position: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Precomputed scores as index-ordered `ScoredFrame`s; empty when the
    /// source was built without scores.
    pub fn scored_frames(&self) -> Vec<ScoredFrame> {
        self.scores
            .as_deref()
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(i, &s)| ScoredFrame::new(i, s))
            .collect()
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

impl FrameSource for MemorySource {
    fn frame_count(&self) -> Option<usize> {
        Some(self.frames.len())
    }

    fn position(&self) -> usize {
        self.position
    }

    fn seek(&mut self, index: usize) -> Result<()> {
        self.position = index;
        Ok(())
    }

    fn decode_next(&mut self) -> Result<Option<Frame>> {
        let frame = self.frames.get(self.position).cloned();
        if frame.is_some() {
            self.position += 1;
        }
        Ok(frame)
    }

    fn skip(&mut self, count: usize) -> Result<usize> {
        let available = self.frames.len().saturating_sub(self.position);
        let skipped = count.min(available);
        self.position += skipped;
        Ok(skipped)
    }

    fn info(&self) -> SourceInfo {
        let (width, height) = self
            .frames
            .first()
            .map(|f| (f.width() as u32, f.height() as u32))
            .unwrap_or((0, 0));
        SourceInfo {
            filename: PathBuf::from("<memory>"),
            total_frames: Some(self.frames.len()),
            width,
            height,
            bit_depth: self.frames.first().map_or(8, |f| f.original_bit_depth),
            color_mode: ColorMode::RGB,
            frames_per_second: None,
            observer: None,
            telescope: None,
            instrument: None,
        }
    }
}

fn reindex(frames: Vec<Frame>) -> Vec<Frame> {
    frames
        .into_iter()
        .enumerate()
        .map(|(i, f)| f.with_index(i))
        .collect()
}

use tracing::{debug, info, warn};

use crate::error::{Result, SharpFramesError};
use crate::frame::{Frame, ScoredFrame, SelectionResult};
use crate::manifest::format_manifest;
use crate::source::FrameSource;

/// Full-resolution frames recovered for a selection.
#[derive(Clone, Debug, Default)]
pub struct Extraction {
    /// Decoded frames, ascending by index.
    pub frames: Vec<Frame>,
    /// Entries of `frames`, same order.
    pub kept: Vec<ScoredFrame>,
    /// Selected indices that could not be decoded.
    pub failed: Vec<usize>,
}

impl Extraction {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn manifest(&self) -> String {
        format_manifest(&self.kept)
    }
}

/// Seek to and decode every selected frame in index order.
///
/// A frame that fails to decode is logged and left out; extraction only
/// fails when the selection was non-empty and nothing could be recovered.
pub fn extract(source: &mut dyn FrameSource, selection: &SelectionResult) -> Result<Extraction> {
    let mut out = Extraction::default();
    if selection.is_empty() {
        return Ok(out);
    }

    let mut kept = selection.kept.clone();
    kept.sort_by_key(|s| s.index);

    for entry in kept {
        match source.seek_and_decode(entry.index) {
            Ok(Some(frame)) => {
                debug!(index = entry.index, score = entry.score, "Extracted frame");
                out.frames.push(frame.with_index(entry.index));
                out.kept.push(entry);
            }
            Ok(None) => {
                warn!(index = entry.index, "Selected frame is past the end of the source");
                out.failed.push(entry.index);
            }
            Err(e) => {
                warn!(index = entry.index, error = %e, "Failed to decode selected frame");
                out.failed.push(entry.index);
            }
        }
    }

    if out.frames.is_empty() {
        return Err(SharpFramesError::ExtractionTotalFailure {
            requested: selection.len(),
        });
    }

    info!(
        extracted = out.frames.len(),
        failed = out.failed.len(),
        "Extraction complete"
    );
    Ok(out)
}

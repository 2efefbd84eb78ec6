mod common;

use approx::assert_abs_diff_eq;

use common::{tagged_frames, write_checker_ser};
use sharpframes_core::error::{Result, SharpFramesError};
use sharpframes_core::extract::extract;
use sharpframes_core::frame::{Frame, ScoredFrame, SelectionResult, SourceInfo};
use sharpframes_core::source::{FrameSource, MemorySource, SerSource};

fn selection(entries: &[(usize, f64)]) -> SelectionResult {
    SelectionResult {
        kept: entries
            .iter()
            .map(|&(i, s)| ScoredFrame::new(i, s))
            .collect(),
    }
}

/// Refuses to decode the listed indices.
struct Flaky {
    inner: MemorySource,
    broken: Vec<usize>,
}

impl FrameSource for Flaky {
    fn frame_count(&self) -> Option<usize> {
        self.inner.frame_count()
    }
    fn position(&self) -> usize {
        self.inner.position()
    }
    fn seek(&mut self, index: usize) -> Result<()> {
        self.inner.seek(index)
    }
    fn decode_next(&mut self) -> Result<Option<Frame>> {
        if self.broken.contains(&self.inner.position()) {
            return Err(SharpFramesError::Decode("bad frame".into()));
        }
        self.inner.decode_next()
    }
    fn skip(&mut self, count: usize) -> Result<usize> {
        self.inner.skip(count)
    }
    fn info(&self) -> SourceInfo {
        self.inner.info()
    }
}

#[test]
fn test_extracts_selected_frames_in_order() {
    let mut source = MemorySource::new(tagged_frames(10));
    let result = extract(&mut source, &selection(&[(7, 3.0), (2, 9.0), (4, 1.5)])).unwrap();

    let indices: Vec<usize> = result.frames.iter().map(|f| f.index()).collect();
    assert_eq!(indices, vec![2, 4, 7]);
    assert_abs_diff_eq!(result.frames[0].data[[0, 0, 0]], 0.2);
    assert_abs_diff_eq!(result.frames[2].data[[0, 0, 0]], 0.7);
    assert_eq!(result.kept[0], ScoredFrame::new(2, 9.0));
    assert!(result.failed.is_empty());
}

#[test]
fn test_empty_selection_is_not_an_error() {
    let mut source = MemorySource::new(tagged_frames(3));
    let result = extract(&mut source, &SelectionResult::empty()).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.manifest(), "");
}

#[test]
fn test_failed_frame_is_skipped() {
    let mut source = Flaky {
        inner: MemorySource::new(tagged_frames(10)),
        broken: vec![4],
    };
    let result = extract(&mut source, &selection(&[(2, 5.0), (4, 6.0), (8, 7.0)])).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.failed, vec![4]);
    assert_eq!(result.manifest(), "F:2 (Score:5), F:8 (Score:7)");
}

#[test]
fn test_index_past_end_is_a_failure() {
    let mut source = MemorySource::new(tagged_frames(5));
    let result = extract(&mut source, &selection(&[(1, 2.0), (12, 9.0)])).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.failed, vec![12]);
}

#[test]
fn test_all_failed_is_total_failure() {
    let mut source = Flaky {
        inner: MemorySource::new(tagged_frames(10)),
        broken: vec![1, 3],
    };
    let err = extract(&mut source, &selection(&[(1, 5.0), (3, 6.0)])).unwrap_err();
    assert!(matches!(
        err,
        SharpFramesError::ExtractionTotalFailure { requested: 2 }
    ));
}

#[test]
fn test_extract_from_ser_matches_direct_read() {
    let tmp = write_checker_ser(6, 4, &[0, 10, 20, 30, 40]);
    let mut source = SerSource::open(tmp.path()).unwrap();
    let result = extract(&mut source, &selection(&[(3, 100.0)])).unwrap();

    let direct = source.reader().read_frame(3).unwrap();
    assert_eq!(result.frames[0].data, direct.data);
    assert_eq!(result.frames[0].index(), 3);
}

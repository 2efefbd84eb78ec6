use ndarray::Array3;
use std::path::PathBuf;

use crate::consts::COLOR_CHANNEL_COUNT;

/// A single decoded color frame.
/// Pixel values are f32 in [0.0, 1.0].
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width, 3), RGB order
    pub data: Array3<f32>,
    /// Original bit depth before conversion (8 or 16)
    pub original_bit_depth: u8,
    pub metadata: FrameMetadata,
}

impl Frame {
    pub fn new(data: Array3<f32>, bit_depth: u8) -> Self {
        debug_assert_eq!(data.dim().2, COLOR_CHANNEL_COUNT);
        Self {
            data,
            original_bit_depth: bit_depth,
            metadata: FrameMetadata::default(),
        }
    }

    /// Attach the absolute source index.
    pub fn with_index(mut self, index: usize) -> Self {
        self.metadata.frame_index = index;
        self
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// Absolute position of this frame in its source.
    pub fn index(&self) -> usize {
        self.metadata.frame_index
    }
}

#[derive(Clone, Debug, Default)]
pub struct FrameMetadata {
    pub frame_index: usize,
    pub timestamp_us: Option<u64>,
}

/// Sharpness score of one scanned frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredFrame {
    pub index: usize,
    pub score: f64,
}

impl ScoredFrame {
    pub fn new(index: usize, score: f64) -> Self {
        Self { index, score }
    }
}

/// Contiguous scan range within a possibly much longer source.
///
/// `length` counts frames to decode and score, not raw positions stepped over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionWindow {
    pub start_index: usize,
    pub length: usize,
}

impl SelectionWindow {
    pub fn new(start_index: usize, length: usize) -> Self {
        Self {
            start_index,
            length,
        }
    }

    /// Window that runs until the source ends.
    pub fn unbounded(start_index: usize) -> Self {
        Self::new(start_index, usize::MAX)
    }

    pub fn end_index(&self) -> usize {
        self.start_index.saturating_add(self.length)
    }

    pub fn is_unbounded(&self) -> bool {
        self.length == usize::MAX
    }
}

impl std::fmt::Display for SelectionWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_unbounded() {
            write!(f, "{}..end", self.start_index)
        } else {
            write!(f, "{}+{}", self.start_index, self.length)
        }
    }
}

/// Frames kept by the selector, ascending by index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionResult {
    pub kept: Vec<ScoredFrame>,
}

impl SelectionResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }

    pub fn len(&self) -> usize {
        self.kept.len()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.kept.iter().map(|s| s.index).collect()
    }
}

/// Color/Bayer mode of the source data.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ColorMode {
    Mono,
    BayerRGGB,
    BayerGRBG,
    BayerGBRG,
    BayerBGGR,
    RGB,
    BGR,
}

/// Metadata about the source file.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub filename: PathBuf,
    pub total_frames: Option<usize>,
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_mode: ColorMode,
    pub frames_per_second: Option<f64>,
    pub observer: Option<String>,
    pub telescope: Option<String>,
    pub instrument: Option<String>,
}

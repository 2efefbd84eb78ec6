use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_COUNTER_DIGITS, DEFAULT_FILE_PREFIX, DEFAULT_FRAMES_PER_BATCH, DEFAULT_MIN_SPACING,
    DEFAULT_SCAN_STEP, DEFAULT_SCAN_WORKERS, DEFAULT_TOP_K,
};
use crate::error::{Result, SharpFramesError};
use crate::segment::SegmentPlanner;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SharpFramesConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub segment: SegmentConfig,
    #[serde(default)]
    pub selection: SelectionPolicy,
    #[serde(default)]
    pub writer: WriterConfig,
}

impl Default for SharpFramesConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("input.ser"),
            output: PathBuf::from("sharp_frames"),
            scan: ScanConfig::default(),
            segment: SegmentConfig::default(),
            selection: SelectionPolicy::default(),
            writer: WriterConfig::default(),
        }
    }
}

impl SharpFramesConfig {
    pub fn validate(&self) -> Result<()> {
        if self.scan.step == 0 {
            return Err(SharpFramesError::InvalidConfig("scan step must be at least 1".into()));
        }
        if self.scan.workers == 0 {
            return Err(SharpFramesError::InvalidConfig(
                "worker pool needs at least one thread".into(),
            ));
        }
        self.selection.validate()
    }

    pub fn planner(&self) -> SegmentPlanner {
        SegmentPlanner::new(self.scan.frames_per_batch, self.segment.global_offset)
            .with_step(self.scan.step)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Frames scored per segment (0 = scan to the end).
    pub frames_per_batch: usize,
    /// Score every Nth frame.
    pub step: usize,
    /// Scoring worker threads.
    pub workers: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            frames_per_batch: DEFAULT_FRAMES_PER_BATCH,
            step: DEFAULT_SCAN_STEP,
            workers: DEFAULT_SCAN_WORKERS,
        }
    }
}

/// Caller-owned position in a segmented traversal.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    pub batch_index: usize,
    /// Frames to skip at the start of the video.
    pub global_offset: usize,
}

/// Which frames survive selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SelectionPolicy {
    /// Best frame of each `window_size` run, windows `window_gap` apart.
    Windowed {
        window_size: usize,
        window_gap: usize,
        score_floor: f64,
    },
    /// Up to `k` best frames overall. `min_spacing` enforces a minimum index
    /// distance between kept frames; `None` takes the plain top K.
    GlobalTopK {
        k: usize,
        min_spacing: Option<usize>,
        score_floor: f64,
    },
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::GlobalTopK {
            k: DEFAULT_TOP_K,
            min_spacing: Some(DEFAULT_MIN_SPACING),
            score_floor: 0.0,
        }
    }
}

impl SelectionPolicy {
    pub fn score_floor(&self) -> f64 {
        match self {
            Self::Windowed { score_floor, .. } | Self::GlobalTopK { score_floor, .. } => {
                *score_floor
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let floor = self.score_floor();
        if !floor.is_finite() || floor < 0.0 {
            return Err(SharpFramesError::InvalidConfig(format!(
                "score floor must be a finite non-negative number, got {floor}"
            )));
        }
        match self {
            Self::Windowed { window_size: 0, .. } => Err(SharpFramesError::InvalidConfig(
                "window size must be at least 1".into(),
            )),
            Self::GlobalTopK { k: 0, .. } => Err(SharpFramesError::InvalidConfig(
                "top-K count must be at least 1".into(),
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windowed {
                window_size,
                window_gap,
                score_floor,
            } => write!(
                f,
                "Windowed (size {window_size}, gap {window_gap}, floor {score_floor})"
            ),
            Self::GlobalTopK {
                k,
                min_spacing: Some(spacing),
                score_floor,
            } => write!(
                f,
                "Global Top-{k} (spacing {spacing}, floor {score_floor})"
            ),
            Self::GlobalTopK {
                k,
                min_spacing: None,
                score_floor,
            } => write!(f, "Global Top-{k} (floor {score_floor})"),
        }
    }
}

/// Naming rules for written frames.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    pub prefix: String,
    pub counter_digits: usize,
    pub filename_with_score: bool,
    pub use_timestamp: bool,
    /// Continue numbering after the highest `<prefix>_<n>` already on disk.
    pub auto_increment: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_FILE_PREFIX.to_string(),
            counter_digits: DEFAULT_COUNTER_DIGITS,
            filename_with_score: false,
            use_timestamp: false,
            auto_increment: true,
        }
    }
}

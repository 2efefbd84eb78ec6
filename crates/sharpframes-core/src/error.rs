use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharpFramesError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Video source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Unsupported container: {}", path.display())]
    UnsupportedContainer { path: PathBuf },

    #[error("Invalid SER file: {0}")]
    InvalidSer(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Decode error: {0}")]
    Decode(String),

    /// The requested segment starts at or beyond the end of the source.
    #[error("Segment exhausted: start index {start_index} is past the end of the source ({total_frames} frames)")]
    SegmentExhausted {
        start_index: usize,
        total_frames: usize,
    },

    /// Nothing could be scored inside an otherwise valid segment.
    #[error("Scan produced no frames starting at index {start_index}")]
    EmptyScan { start_index: usize },

    #[error("All {requested} selected frames failed to decode during extraction")]
    ExtractionTotalFailure { requested: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[cfg(feature = "ffmpeg")]
    #[error("FFmpeg error: {0}")]
    Ffmpeg(#[from] ffmpeg_next::Error),
}

pub type Result<T> = std::result::Result<T, SharpFramesError>;

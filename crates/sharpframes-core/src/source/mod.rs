//! Frame sources: anything that can hand out decoded frames by absolute index.
//!
//! A source is owned by a single driver thread. `decode_next` reports the end
//! of the source as `Ok(None)`, which callers must keep distinct from a decode
//! error.

#[cfg(feature = "ffmpeg")]
pub mod ffmpeg;
pub mod memory;
pub mod ser;
pub mod ser_writer;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Result, SharpFramesError};
use crate::frame::{Frame, SourceInfo};

pub use memory::MemorySource;
pub use ser::{SerReader, SerSource};

/// A sequence of frames addressable by integer index.
pub trait FrameSource {
    /// Total number of frames according to the container metadata.
    fn frame_count(&self) -> Option<usize>;

    /// Index the next call to [`decode_next`](Self::decode_next) will return.
    fn position(&self) -> usize;

    /// Move the cursor to an absolute index.
    fn seek(&mut self, index: usize) -> Result<()>;

    /// Decode the frame at the cursor and advance by one.
    fn decode_next(&mut self) -> Result<Option<Frame>>;

    /// Advance the cursor by up to `count` frames as cheaply as the container
    /// allows, without producing frames. Returns how many were skipped; fewer
    /// than `count` means the source ended.
    fn skip(&mut self, count: usize) -> Result<usize>;

    fn info(&self) -> SourceInfo;

    fn seek_and_decode(&mut self, index: usize) -> Result<Option<Frame>> {
        self.seek(index)?;
        self.decode_next()
    }
}

/// Strip whitespace and the quotes that pasted paths often carry.
pub fn normalize_path(raw: &Path) -> PathBuf {
    let text = raw.to_string_lossy();
    let trimmed = text.trim().trim_matches(|c| c == '"' || c == '\'');
    PathBuf::from(trimmed)
}

/// Open a video-backed source, choosing the decoder from the file extension.
pub fn open_source(path: &Path) -> Result<Box<dyn FrameSource>> {
    let path = if path.exists() {
        path.to_path_buf()
    } else {
        normalize_path(path)
    };
    if !path.is_file() {
        return Err(SharpFramesError::SourceNotFound { path });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let source: Box<dyn FrameSource> = match extension.as_deref() {
        Some("ser") => Box::new(SerSource::open(&path)?),
        _ => open_container(&path)?,
    };

    let info = source.info();
    info!(
        path = %path.display(),
        frames = ?info.total_frames,
        width = info.width,
        height = info.height,
        "Opened video source"
    );
    Ok(source)
}

#[cfg(feature = "ffmpeg")]
fn open_container(path: &Path) -> Result<Box<dyn FrameSource>> {
    Ok(Box::new(ffmpeg::FfmpegSource::open(path)?))
}

#[cfg(not(feature = "ffmpeg"))]
fn open_container(path: &Path) -> Result<Box<dyn FrameSource>> {
    Err(SharpFramesError::UnsupportedContainer {
        path: path.to_path_buf(),
    })
}

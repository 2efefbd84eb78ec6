use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use ndarray::{Array2, Array3};
use tracing::debug;

use crate::color::debayer::{debayer_bilinear, is_bayer};
use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{Result, SharpFramesError};
use crate::frame::{ColorMode, Frame, FrameMetadata, SourceInfo};

use super::FrameSource;

pub const SER_HEADER_SIZE: usize = 178;
pub const SER_MAGIC: &[u8; 14] = b"LUCAM-RECORDER";
const SER_TEXT_FIELD: usize = 40;

/// SER file header (178 bytes).
#[derive(Clone, Debug)]
pub struct SerHeader {
    pub color_id: i32,
    pub little_endian: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u32,
    pub frame_count: u32,
    pub observer: String,
    pub instrument: String,
    pub telescope: String,
    pub date_time: u64,
    pub date_time_utc: u64,
}

impl SerHeader {
    /// Header for an 8-bit RGB clip, the layout exported selections use.
    pub fn rgb8(width: u32, height: u32, frame_count: u32) -> Self {
        Self {
            color_id: 100,
            little_endian: true,
            width,
            height,
            pixel_depth: 8,
            frame_count,
            observer: String::new(),
            instrument: String::new(),
            telescope: String::new(),
            date_time: 0,
            date_time_utc: 0,
        }
    }

    /// Bytes per pixel plane (1 for 8-bit, 2 for 9-16 bit).
    pub fn bytes_per_pixel_plane(&self) -> usize {
        if self.pixel_depth <= 8 { 1 } else { 2 }
    }

    /// Number of planes per pixel (1 for mono/bayer, 3 for RGB/BGR).
    pub fn planes_per_pixel(&self) -> usize {
        match self.color_id {
            100 | 101 => 3,
            _ => 1,
        }
    }

    /// Total bytes per frame, `None` if the dimensions overflow.
    pub fn frame_byte_size(&self) -> Option<usize> {
        let bytes_per_pixel = self.bytes_per_pixel_plane() * self.planes_per_pixel();
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(bytes_per_pixel)
    }

    pub fn color_mode(&self) -> ColorMode {
        match self.color_id {
            0 => ColorMode::Mono,
            8 => ColorMode::BayerRGGB,
            9 => ColorMode::BayerGRBG,
            10 => ColorMode::BayerGBRG,
            11 => ColorMode::BayerBGGR,
            100 => ColorMode::RGB,
            101 => ColorMode::BGR,
            _ => ColorMode::Mono,
        }
    }
}

/// Memory-mapped SER file reader.
pub struct SerReader {
    mmap: Mmap,
    frame_size: usize,
    pub header: SerHeader,
}

impl SerReader {
    /// Open a SER file and parse its header.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and lives as long as the reader.
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < SER_HEADER_SIZE {
            return Err(SharpFramesError::InvalidSer(
                "File too small for SER header".into(),
            ));
        }

        if !mmap.starts_with(SER_MAGIC) {
            return Err(SharpFramesError::InvalidSer(
                "Missing LUCAM-RECORDER magic".into(),
            ));
        }

        let header = parse_header(&mmap[..SER_HEADER_SIZE])?;
        let frame_size = header
            .frame_byte_size()
            .ok_or_else(|| SharpFramesError::InvalidSer("Image dimensions too large".into()))?;

        let expected_data_size = frame_size
            .checked_mul(header.frame_count as usize)
            .and_then(|n| n.checked_add(SER_HEADER_SIZE))
            .ok_or_else(|| SharpFramesError::InvalidSer("Frame data size overflow".into()))?;
        if mmap.len() < expected_data_size {
            return Err(SharpFramesError::InvalidSer(format!(
                "File truncated: expected at least {} bytes, got {}",
                expected_data_size,
                mmap.len()
            )));
        }

        debug!(
            frames = header.frame_count,
            width = header.width,
            height = header.height,
            depth = header.pixel_depth,
            "Opened SER file"
        );
        Ok(Self {
            mmap,
            frame_size,
            header,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    pub fn frame_byte_size(&self) -> usize {
        self.frame_size
    }

    /// Get the raw bytes for a single frame (zero-copy from mmap).
    pub fn frame_raw(&self, index: usize) -> Result<&[u8]> {
        let count = self.frame_count();
        if index >= count {
            return Err(SharpFramesError::FrameIndexOutOfRange {
                index,
                total: count,
            });
        }
        let offset = SER_HEADER_SIZE + index * self.frame_size;
        Ok(&self.mmap[offset..offset + self.frame_size])
    }

    /// Read a single frame as RGB, converting samples to f32 in [0.0, 1.0].
    pub fn read_frame(&self, index: usize) -> Result<Frame> {
        let raw = self.frame_raw(index)?;
        let height = self.header.height as usize;
        let layout = PlaneLayout::new(&self.header);
        let mode = self.header.color_mode();

        let data = match mode {
            ColorMode::RGB | ColorMode::BGR => {
                let order = channel_order(&mode);
                Array3::from_shape_fn(
                    (height, layout.width, COLOR_CHANNEL_COUNT),
                    |(row, col, channel)| layout.sample(raw, row, col, order[channel]),
                )
            }
            _ => {
                let plane = layout.decode(raw, height, 0);
                if is_bayer(&mode) {
                    debayer_bilinear(&plane, &mode)
                        .ok_or_else(|| SharpFramesError::Decode("Bayer demosaic failed".into()))?
                } else {
                    replicate_mono(&plane)
                }
            }
        };

        let mut frame = Frame::new(data, layout.sample_bytes as u8 * 8);
        frame.metadata = FrameMetadata {
            frame_index: index,
            timestamp_us: self.read_timestamp(index),
        };
        Ok(frame)
    }

    /// Per-frame timestamp from the optional trailer after the pixel data.
    fn read_timestamp(&self, index: usize) -> Option<u64> {
        let at = SER_HEADER_SIZE + self.frame_size * self.frame_count() + index * 8;
        let bytes: [u8; 8] = self.mmap.get(at..at + 8)?.try_into().ok()?;
        Some(u64::from_le_bytes(bytes))
    }

    /// Build SourceInfo from the header.
    pub fn source_info(&self, path: &Path) -> SourceInfo {
        SourceInfo {
            filename: path.to_path_buf(),
            total_frames: Some(self.frame_count()),
            width: self.header.width,
            height: self.header.height,
            bit_depth: self.header.pixel_depth as u8,
            color_mode: self.header.color_mode(),
            frames_per_second: None,
            observer: non_empty(&self.header.observer),
            telescope: non_empty(&self.header.telescope),
            instrument: non_empty(&self.header.instrument),
        }
    }
}

/// SER-backed frame source.
///
/// Frames sit at fixed offsets in the mapping, so seeking is arithmetic and
/// skipping only moves the cursor without touching pixel data.
pub struct SerSource {
    reader: SerReader,
    path: PathBuf,
    position: usize,
}

impl SerSource {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            reader: SerReader::open(path)?,
            path: path.to_path_buf(),
            position: 0,
        })
    }

    pub fn reader(&self) -> &SerReader {
        &self.reader
    }
}

impl FrameSource for SerSource {
    fn frame_count(&self) -> Option<usize> {
        Some(self.reader.frame_count())
    }

    fn position(&self) -> usize {
        self.position
    }

    fn seek(&mut self, index: usize) -> Result<()> {
        self.position = index;
        Ok(())
    }

    fn decode_next(&mut self) -> Result<Option<Frame>> {
        if self.position >= self.reader.frame_count() {
            return Ok(None);
        }
        let frame = self.reader.read_frame(self.position)?;
        self.position += 1;
        Ok(Some(frame))
    }

    fn skip(&mut self, count: usize) -> Result<usize> {
        let available = self.reader.frame_count().saturating_sub(self.position);
        let skipped = count.min(available);
        self.position += skipped;
        Ok(skipped)
    }

    fn info(&self) -> SourceInfo {
        self.reader.source_info(&self.path)
    }
}

fn parse_header(buf: &[u8]) -> Result<SerHeader> {
    let mut cursor = Cursor::new(&buf[SER_MAGIC.len()..]);
    let mut field = || cursor.read_i32::<LittleEndian>();

    let _lu_id = field()?;
    let color_id = field()?;
    let endian_flag = field()?;
    let width = field()? as u32;
    let height = field()? as u32;
    let pixel_depth = field()? as u32;
    let frame_count = field()? as u32;

    let mut text = || -> Result<String> {
        let mut raw = [0u8; SER_TEXT_FIELD];
        cursor.read_exact(&mut raw)?;
        Ok(String::from_utf8_lossy(&raw)
            .trim_end_matches('\0')
            .trim()
            .to_owned())
    };
    let observer = text()?;
    let instrument = text()?;
    let telescope = text()?;

    let date_time = cursor.read_u64::<LittleEndian>()?;
    let date_time_utc = cursor.read_u64::<LittleEndian>()?;

    if width == 0 || height == 0 {
        return Err(SharpFramesError::InvalidDimensions { width, height });
    }
    if !(1..=16).contains(&pixel_depth) {
        return Err(SharpFramesError::InvalidSer(format!(
            "Unsupported pixel depth {pixel_depth}"
        )));
    }

    Ok(SerHeader {
        color_id,
        // Capture tools commonly write 0 for little-endian data.
        little_endian: endian_flag != 1,
        width,
        height,
        pixel_depth,
        frame_count,
        observer,
        instrument,
        telescope,
        date_time,
        date_time_utc,
    })
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_owned())
}

/// Plane offsets feeding output channels R, G, B.
fn channel_order(mode: &ColorMode) -> [usize; 3] {
    match mode {
        ColorMode::BGR => [2, 1, 0],
        _ => [0, 1, 2],
    }
}

fn replicate_mono(plane: &Array2<f32>) -> Array3<f32> {
    let (h, w) = plane.dim();
    Array3::from_shape_fn((h, w, COLOR_CHANNEL_COUNT), |(r, c, _)| plane[[r, c]])
}

/// Where one plane's samples sit in an interleaved frame buffer.
struct PlaneLayout {
    width: usize,
    stride: usize,
    sample_bytes: usize,
    little_endian: bool,
    scale: f32,
}

impl PlaneLayout {
    fn new(header: &SerHeader) -> Self {
        let sample_bytes = header.bytes_per_pixel_plane();
        Self {
            width: header.width as usize,
            stride: header.planes_per_pixel() * sample_bytes,
            sample_bytes,
            little_endian: header.little_endian,
            scale: ((1u32 << header.pixel_depth) - 1) as f32,
        }
    }

    fn sample(&self, raw: &[u8], row: usize, col: usize, plane: usize) -> f32 {
        let at = (row * self.width + col) * self.stride + plane * self.sample_bytes;
        let value = match self.sample_bytes {
            1 => raw[at] as u16,
            _ if self.little_endian => u16::from_le_bytes([raw[at], raw[at + 1]]),
            _ => u16::from_be_bytes([raw[at], raw[at + 1]]),
        };
        (value as f32 / self.scale).min(1.0)
    }

    fn decode(&self, raw: &[u8], height: usize, plane: usize) -> Array2<f32> {
        Array2::from_shape_fn((height, self.width), |(row, col)| {
            self.sample(raw, row, col, plane)
        })
    }
}

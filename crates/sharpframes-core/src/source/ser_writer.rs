use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, SharpFramesError};
use crate::frame::Frame;

use super::ser::{SerHeader, SER_HEADER_SIZE, SER_MAGIC};

/// Writes a valid SER file at the raw byte level.
pub struct SerWriter {
    writer: BufWriter<File>,
    header: SerHeader,
    frame_size: usize,
    frames_written: u32,
}

impl SerWriter {
    /// Create a new SER file and write the header.
    pub fn create(path: &Path, header: &SerHeader) -> Result<Self> {
        let frame_size = header
            .frame_byte_size()
            .ok_or_else(|| SharpFramesError::InvalidSer("Image dimensions too large".into()))?;
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write_header(&mut writer, header)?;
        Ok(Self {
            writer,
            header: header.clone(),
            frame_size,
            frames_written: 0,
        })
    }

    /// Write a single raw frame (bytes must match the header's frame size).
    pub fn write_raw_frame(&mut self, data: &[u8]) -> Result<()> {
        if data.len() != self.frame_size {
            return Err(SharpFramesError::InvalidSer(format!(
                "Frame is {} bytes, header expects {}",
                data.len(),
                self.frame_size
            )));
        }
        self.writer.write_all(data)?;
        self.frames_written += 1;
        Ok(())
    }

    /// Write a decoded frame as interleaved 8-bit RGB.
    ///
    /// Only valid for headers created with [`SerHeader::rgb8`].
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        if frame.width() != self.header.width as usize
            || frame.height() != self.header.height as usize
        {
            return Err(SharpFramesError::InvalidDimensions {
                width: frame.width() as u32,
                height: frame.height() as u32,
            });
        }
        let bytes: Vec<u8> = frame
            .data
            .iter()
            .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect();
        self.write_raw_frame(&bytes)
    }

    /// Write the optional timestamp trailer (one u64 per frame, little-endian).
    pub fn write_timestamps(&mut self, timestamps: &[u64]) -> Result<()> {
        for &ts in timestamps {
            self.writer.write_all(&ts.to_le_bytes())?;
        }
        Ok(())
    }

    pub fn frames_written(&self) -> u32 {
        self.frames_written
    }

    /// Flush and finalize the file. Fails if the number of frames written
    /// does not match the header's frame count.
    pub fn finalize(mut self) -> Result<()> {
        self.writer.flush()?;
        if self.frames_written != self.header.frame_count {
            return Err(SharpFramesError::InvalidSer(format!(
                "Header declares {} frames, {} written",
                self.header.frame_count, self.frames_written
            )));
        }
        Ok(())
    }
}

/// Write `frames` to a new 8-bit RGB SER clip.
///
/// All frames must share the first frame's dimensions. Timestamps are written
/// when every frame carries one.
pub fn write_ser_clip(path: &Path, frames: &[Frame]) -> Result<()> {
    let first = frames.first().ok_or_else(|| {
        SharpFramesError::InvalidSer("Cannot write a SER clip with no frames".into())
    })?;
    let header = SerHeader::rgb8(first.width() as u32, first.height() as u32, frames.len() as u32);
    let mut writer = SerWriter::create(path, &header)?;
    for frame in frames {
        writer.write_frame(frame)?;
    }
    let timestamps: Option<Vec<u64>> = frames.iter().map(|f| f.metadata.timestamp_us).collect();
    if let Some(ts) = timestamps {
        writer.write_timestamps(&ts)?;
    }
    writer.finalize()
}

fn write_header(w: &mut impl Write, header: &SerHeader) -> Result<()> {
    w.write_all(SER_MAGIC)?;
    // LuID
    w.write_all(&0i32.to_le_bytes())?;
    w.write_all(&header.color_id.to_le_bytes())?;
    // 0 = little-endian, matching the reader
    let le_flag: i32 = if header.little_endian { 0 } else { 1 };
    w.write_all(&le_flag.to_le_bytes())?;
    w.write_all(&(header.width as i32).to_le_bytes())?;
    w.write_all(&(header.height as i32).to_le_bytes())?;
    w.write_all(&(header.pixel_depth as i32).to_le_bytes())?;
    w.write_all(&(header.frame_count as i32).to_le_bytes())?;
    write_fixed_string(w, &header.observer, 40)?;
    write_fixed_string(w, &header.instrument, 40)?;
    write_fixed_string(w, &header.telescope, 40)?;
    w.write_all(&header.date_time.to_le_bytes())?;
    w.write_all(&header.date_time_utc.to_le_bytes())?;

    debug_assert_eq!(
        14 + 4 + 4 + 4 + 4 + 4 + 4 + 4 + 40 + 40 + 40 + 8 + 8,
        SER_HEADER_SIZE
    );
    Ok(())
}

fn write_fixed_string(w: &mut impl Write, s: &str, len: usize) -> Result<()> {
    let bytes = s.as_bytes();
    let to_write = bytes.len().min(len);
    w.write_all(&bytes[..to_write])?;
    w.write_all(&vec![0u8; len - to_write])?;
    Ok(())
}

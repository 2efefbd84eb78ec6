#![allow(dead_code)]

use ndarray::Array3;
use sharpframes_core::frame::Frame;
use sharpframes_core::source::ser::SER_HEADER_SIZE;

/// Build a SER file header for mono 8-bit frames.
///
/// Returns a `Vec<u8>` containing just the 178-byte header.
/// Append frame pixel data after calling this function.
pub fn build_ser_header(width: u32, height: u32, num_frames: usize) -> Vec<u8> {
    build_ser_header_full(width, height, 8, num_frames, 0)
}

/// Build a SER file header with configurable bit depth and color mode.
///
/// `color_id`: 0=MONO, 8=BAYER_RGGB, 9=BAYER_GRBG, 10=BAYER_GBRG, 11=BAYER_BGGR,
///             100=RGB, 101=BGR
pub fn build_ser_header_full(
    width: u32,
    height: u32,
    bit_depth: u32,
    num_frames: usize,
    color_id: i32,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SER_HEADER_SIZE);

    // Magic (14 bytes)
    buf.extend_from_slice(b"LUCAM-RECORDER");
    // LuID (4 bytes)
    buf.extend_from_slice(&0i32.to_le_bytes());
    // ColorID (4 bytes)
    buf.extend_from_slice(&color_id.to_le_bytes());
    // LittleEndian = 0
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    buf.extend_from_slice(&(bit_depth as i32).to_le_bytes());
    buf.extend_from_slice(&(num_frames as i32).to_le_bytes());
    // Observer, Instrument, Telescope (40 bytes each)
    buf.extend_from_slice(&[0u8; 40]);
    buf.extend_from_slice(&[0u8; 40]);
    buf.extend_from_slice(&[0u8; 40]);
    // DateTime, DateTimeUTC
    buf.extend_from_slice(&0u64.to_le_bytes());
    buf.extend_from_slice(&0u64.to_le_bytes());

    assert_eq!(buf.len(), SER_HEADER_SIZE);
    buf
}

/// Build a complete synthetic mono 8-bit SER file with the given frame data.
pub fn build_ser_with_frames(width: u32, height: u32, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = build_ser_header(width, height, frames.len());
    for frame in frames {
        buf.extend_from_slice(frame);
    }
    buf
}

/// Write a SER buffer to a temporary `.ser` file.
///
/// The file stays alive as long as the returned `NamedTempFile` is not dropped.
pub fn write_test_ser(data: &[u8]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::Builder::new()
        .suffix(".ser")
        .tempfile()
        .expect("create temp file");
    f.write_all(data).expect("write SER data");
    f.flush().expect("flush");
    f
}

/// Mono 8-bit checkerboard bytes alternating `128 + amplitude` and
/// `128 - amplitude`. Amplitude 0 gives a flat frame.
pub fn checker_bytes(width: u32, height: u32, amplitude: u8) -> Vec<u8> {
    let amplitude = amplitude.min(127);
    let mut data = Vec::with_capacity((width * height) as usize);
    for row in 0..height {
        for col in 0..width {
            let v = if (row + col) % 2 == 0 {
                128 + amplitude
            } else {
                128 - amplitude
            };
            data.push(v);
        }
    }
    data
}

/// Write a mono SER file where frame `i` is a checkerboard of
/// `amplitudes[i]`, so a larger amplitude means a sharper frame.
pub fn write_checker_ser(width: u32, height: u32, amplitudes: &[u8]) -> tempfile::NamedTempFile {
    let frames: Vec<Vec<u8>> = amplitudes
        .iter()
        .map(|&a| checker_bytes(width, height, a))
        .collect();
    write_test_ser(&build_ser_with_frames(width, height, &frames))
}

/// Uniform RGB frame.
pub fn solid_frame(height: usize, width: usize, value: f32) -> Frame {
    Frame::new(Array3::from_elem((height, width, 3), value), 8)
}

/// Gray checkerboard frame alternating `0.5 + delta` and `0.5 - delta`.
pub fn checker_frame(height: usize, width: usize, delta: f32) -> Frame {
    let data = Array3::from_shape_fn((height, width, 3), |(r, c, _)| {
        if (r + c) % 2 == 0 {
            0.5 + delta
        } else {
            0.5 - delta
        }
    });
    Frame::new(data, 8)
}

/// Smooth diagonal gradient frame.
pub fn gradient_frame(height: usize, width: usize) -> Frame {
    let span = (height + width) as f32;
    let data = Array3::from_shape_fn((height, width, 3), |(r, c, _)| (r + c) as f32 / span);
    Frame::new(data, 8)
}

/// Frames whose pixel value encodes their position, for identity checks.
pub fn tagged_frames(count: usize) -> Vec<Frame> {
    (0..count)
        .map(|i| solid_frame(4, 4, i as f32 / count.max(1) as f32))
        .collect()
}

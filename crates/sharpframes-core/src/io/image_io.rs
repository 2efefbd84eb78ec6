use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};
use ndarray::Array3;
use tracing::debug;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{Result, SharpFramesError};
use crate::frame::Frame;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "webp"];

/// Quantize a frame to 8-bit RGB, rounding to the nearest level.
pub fn frame_to_rgb8(frame: &Frame) -> RgbImage {
    let h = frame.height();
    let w = frame.width();

    let mut img = RgbImage::new(w as u32, h as u32);
    for row in 0..h {
        for col in 0..w {
            let px = |c: usize| (frame.data[[row, col, c]].clamp(0.0, 1.0) * 255.0).round() as u8;
            img.put_pixel(col as u32, row as u32, Rgb([px(0), px(1), px(2)]));
        }
    }
    img
}

/// Save a frame as 8-bit RGB PNG.
pub fn save_frame_png(frame: &Frame, path: &Path) -> Result<()> {
    frame_to_rgb8(frame).save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Load any image the `image` crate can decode as an RGB frame.
pub fn load_frame(path: &Path) -> Result<Frame> {
    let img = image::open(path)?;
    let color = img.color();
    let bit_depth = (color.bits_per_pixel() / color.channel_count() as u16).min(16) as u8;

    let rgb = img.to_rgb16();
    let (w, h) = rgb.dimensions();
    if w == 0 || h == 0 {
        return Err(SharpFramesError::InvalidDimensions {
            width: w,
            height: h,
        });
    }

    let mut data = Array3::<f32>::zeros((h as usize, w as usize, COLOR_CHANNEL_COUNT));
    for (col, row, pixel) in rgb.enumerate_pixels() {
        for c in 0..COLOR_CHANNEL_COUNT {
            data[[row as usize, col as usize, c]] = pixel.0[c] as f32 / 65535.0;
        }
    }

    Ok(Frame::new(data, bit_depth))
}

/// Load every image in `dir`, ordered by file name. Each frame's index is its
/// position in that order.
pub fn load_frames_dir(dir: &Path) -> Result<Vec<Frame>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && has_image_extension(p))
        .collect();
    paths.sort();

    debug!(dir = %dir.display(), count = paths.len(), "Loading image sequence");
    paths
        .iter()
        .enumerate()
        .map(|(i, p)| load_frame(p).map(|f| f.with_index(i)))
        .collect()
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R, SCORE_SCALE};
use crate::frame::Frame;

/// Compute luminance from an RGB frame using ITU-R BT.601 weights.
pub fn luminance(frame: &Frame) -> Array2<f32> {
    let (h, w, _) = frame.data.dim();
    let mut data = Array2::<f32>::zeros((h, w));

    for row in 0..h {
        for col in 0..w {
            data[[row, col]] = LUMINANCE_R * frame.data[[row, col, 0]]
                + LUMINANCE_G * frame.data[[row, col, 1]]
                + LUMINANCE_B * frame.data[[row, col, 2]];
        }
    }

    data
}

/// Reflect-101 border indexing: -1 maps to 1, n maps to n - 2.
#[inline]
fn reflect_101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let n = n as isize;
    let r = if i < 0 {
        -i
    } else if i >= n {
        2 * n - 2 - i
    } else {
        i
    };
    r as usize
}

/// Variance of the Laplacian response over every pixel of `data`.
///
/// Convolves with the 3x3 Laplacian kernel:
///   0  1  0
///   1 -4  1
///   0  1  0
/// using reflect-101 borders, then returns the population variance.
/// A flat field returns exactly 0.
pub fn laplacian_variance_array(data: &Array2<f32>) -> f64 {
    let (h, w) = data.dim();
    if h == 0 || w == 0 {
        return 0.0;
    }

    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let count = (h * w) as f64;

    for row in 0..h {
        let ri = row as isize;
        let up = reflect_101(ri - 1, h);
        let down = reflect_101(ri + 1, h);
        for col in 0..w {
            let ci = col as isize;
            let left = reflect_101(ci - 1, w);
            let right = reflect_101(ci + 1, w);

            let lap = -4.0 * data[[row, col]] as f64
                + data[[up, col]] as f64
                + data[[down, col]] as f64
                + data[[row, left]] as f64
                + data[[row, right]] as f64;
            sum += lap;
            sum_sq += lap * lap;
        }
    }

    let mean = sum / count;
    (sum_sq / count - mean * mean).max(0.0)
}

/// Sharpness score of a frame. Higher means sharper.
///
/// Laplacian variance of the luminance plane, on the 8-bit intensity scale.
pub fn sharpness_score(frame: &Frame) -> f64 {
    let scale = SCORE_SCALE as f64;
    laplacian_variance_array(&luminance(frame)) * scale * scale
}

/// Score every frame in parallel. Scores are returned in input order.
pub fn score_frames(frames: &[Frame]) -> Vec<f64> {
    frames.par_iter().map(sharpness_score).collect()
}

/// Score every frame in parallel with per-frame progress reporting.
///
/// Calls `on_progress(items_done)` as each frame is scored.
pub fn score_frames_with_progress(
    frames: &[Frame],
    on_progress: impl Fn(usize) + Send + Sync,
) -> Vec<f64> {
    let done = AtomicUsize::new(0);
    frames
        .par_iter()
        .map(|f| {
            let score = sharpness_score(f);
            let completed = done.fetch_add(1, Ordering::Relaxed) + 1;
            on_progress(completed);
            score
        })
        .collect()
}

use ndarray::{Array2, Array3};

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::frame::ColorMode;

type Offsets = [(isize, isize)];

const CROSS: &Offsets = &[(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL: &Offsets = &[(-1, -1), (-1, 1), (1, -1), (1, 1)];
const HORIZONTAL: &Offsets = &[(0, -1), (0, 1)];
const VERTICAL: &Offsets = &[(-1, 0), (1, 0)];

/// Check whether a `ColorMode` is a Bayer pattern.
pub fn is_bayer(mode: &ColorMode) -> bool {
    red_parity(mode).is_some()
}

/// Demosaic a raw Bayer plane into an RGB array of shape (h, w, 3)
/// using bilinear interpolation.
///
/// Returns `None` if `mode` is not a Bayer pattern.
pub fn debayer_bilinear(raw: &Array2<f32>, mode: &ColorMode) -> Option<Array3<f32>> {
    let (red_row, red_col) = red_parity(mode)?;
    let (h, w) = raw.dim();

    let rgb = Array3::from_shape_fn((h, w, COLOR_CHANNEL_COUNT), |(row, col, channel)| {
        let on_red_row = row % 2 == red_row;
        let on_red_col = col % 2 == red_col;
        // Which neighbours supply each channel at this site
        let (r, g, b): (Option<&Offsets>, Option<&Offsets>, Option<&Offsets>) =
            match (on_red_row, on_red_col) {
                (true, true) => (None, Some(CROSS), Some(DIAGONAL)),
                (true, false) => (Some(HORIZONTAL), None, Some(VERTICAL)),
                (false, true) => (Some(VERTICAL), None, Some(HORIZONTAL)),
                (false, false) => (Some(DIAGONAL), Some(CROSS), None),
            };
        let source = match channel {
            0 => r,
            1 => g,
            _ => b,
        };
        match source {
            Some(offsets) => neighbour_mean(raw, row, col, offsets),
            None => raw[[row, col]],
        }
    });

    Some(rgb)
}

/// `(row, col)` parity of the red site in the 2x2 cell.
fn red_parity(mode: &ColorMode) -> Option<(usize, usize)> {
    match mode {
        ColorMode::BayerRGGB => Some((0, 0)),
        ColorMode::BayerGRBG => Some((0, 1)),
        ColorMode::BayerGBRG => Some((1, 0)),
        ColorMode::BayerBGGR => Some((1, 1)),
        _ => None,
    }
}

/// Mean of the neighbours at `offsets`, clamping at the mosaic edge.
#[inline]
fn neighbour_mean(raw: &Array2<f32>, row: usize, col: usize, offsets: &Offsets) -> f32 {
    let (h, w) = raw.dim();
    let max_r = h as isize - 1;
    let max_c = w as isize - 1;
    let sum: f32 = offsets
        .iter()
        .map(|&(dr, dc)| {
            let r = (row as isize + dr).clamp(0, max_r) as usize;
            let c = (col as isize + dc).clamp(0, max_c) as usize;
            raw[[r, c]]
        })
        .sum();
    sum / offsets.len() as f32
}

pub mod laplacian;

pub use laplacian::{laplacian_variance_array, luminance, sharpness_score};

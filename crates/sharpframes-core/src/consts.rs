/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Luminance is scored on the 8-bit scale so floors and manifest scores
/// read the same regardless of source bit depth.
pub const SCORE_SCALE: f32 = 255.0;

/// Number of channels in a decoded frame (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Default number of frames scored per segment (0 = whole video).
pub const DEFAULT_FRAMES_PER_BATCH: usize = 1440;

/// Default scan step: score every Nth frame.
pub const DEFAULT_SCAN_STEP: usize = 5;

/// Default size of the scoring worker pool.
pub const DEFAULT_SCAN_WORKERS: usize = 16;

/// Default number of frames kept by the global top-K policy.
pub const DEFAULT_TOP_K: usize = 4;

/// Default minimum index distance between two kept frames in video scans.
pub const DEFAULT_MIN_SPACING: usize = 24;

/// Default window length for the windowed policy.
pub const DEFAULT_WINDOW_SIZE: usize = 24;

/// Default zero-padding of the output file counter.
pub const DEFAULT_COUNTER_DIGITS: usize = 4;

/// Default output file name prefix.
pub const DEFAULT_FILE_PREFIX: &str = "frame";

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rayon::prelude::*;
use regex::Regex;
use tracing::{debug, info};

use crate::error::{Result, SharpFramesError};
use crate::frame::{Frame, ScoredFrame};
use crate::manifest::parse_manifest_padded;
use crate::pipeline::config::WriterConfig;

use super::image_io::save_frame_png;

/// First free counter for `<prefix>_<n>` files in `dir`: the highest `n`
/// found plus one, or 1 when there is none.
pub fn next_counter(dir: &Path, prefix: &str) -> Result<usize> {
    if !dir.exists() {
        return Ok(1);
    }
    let pattern = Regex::new(&format!(r"^{}_(\d+)", regex::escape(prefix)))
        .map_err(|e| SharpFramesError::InvalidConfig(format!("file prefix: {e}")))?;

    let mut highest = 0usize;
    for entry in std::fs::read_dir(dir)? {
        let name = entry?.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(n) = pattern
            .captures(name)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<usize>().ok())
        {
            highest = highest.max(n);
        }
    }
    Ok(highest + 1)
}

/// Write `frames` as PNG files into `dir`, creating it if needed.
///
/// `manifest` supplies each frame's source index and score in order. Files are
/// numbered by source index when the manifest carries real indices, otherwise
/// by a running counter that continues after existing files when
/// `auto_increment` is set. Returns the written paths in frame order.
pub fn write_frames(
    frames: &[Frame],
    manifest: &str,
    dir: &Path,
    config: &WriterConfig,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let entries = parse_manifest_padded(manifest, frames.len());
    let using_real_indices = entries.iter().any(|e| e.index > 0);

    let start_counter = if config.auto_increment && !config.use_timestamp && !using_real_indices {
        next_counter(dir, &config.prefix)?
    } else {
        0
    };
    let timestamp = if config.use_timestamp {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Some(secs)
    } else {
        None
    };

    let paths: Vec<PathBuf> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let number = if entry.index > 0 {
                entry.index
            } else {
                start_counter + i
            };
            dir.join(file_name(config, timestamp, number, entry))
        })
        .collect();

    frames
        .par_iter()
        .zip(paths.par_iter())
        .try_for_each(|(frame, path)| {
            debug!(path = %path.display(), "Writing frame");
            save_frame_png(frame, path)
        })?;

    info!(count = paths.len(), dir = %dir.display(), "Frames written");
    Ok(paths)
}

fn file_name(
    config: &WriterConfig,
    timestamp: Option<u64>,
    number: usize,
    entry: &ScoredFrame,
) -> String {
    let mut name = config.prefix.clone();
    if let Some(ts) = timestamp {
        name.push_str(&format!("_{ts}"));
    }
    name.push_str(&format!("_{number:0width$}", width = config.counter_digits));
    if config.filename_with_score {
        name.push_str(&format!("_{}", entry.score.max(0.0).trunc() as u64));
    }
    name.push_str(".png");
    name
}

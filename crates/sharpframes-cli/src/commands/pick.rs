use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use indicatif::ProgressBar;
use sharpframes_core::consts::{DEFAULT_COUNTER_DIGITS, DEFAULT_FILE_PREFIX, DEFAULT_TOP_K};
use sharpframes_core::frame::Frame;
use sharpframes_core::io::{load_frames_dir, write_frames};
use sharpframes_core::pipeline::config::{SelectionPolicy, WriterConfig};
use sharpframes_core::pipeline::run_precomputed;
use sharpframes_core::quality::laplacian::score_frames_with_progress;

use crate::progress::bar_style;
use crate::summary::print_run_result;

#[derive(Clone, Copy, ValueEnum)]
pub enum PickPolicyArg {
    /// Best frame of every batch of consecutive frames
    Batched,
    /// Best N frames overall
    BestN,
}

#[derive(Args)]
pub struct PickArgs {
    /// Folder with the full-resolution frames
    pub dir: PathBuf,

    /// Folder with low-resolution copies to score instead (same order)
    #[arg(long)]
    pub proxy: Option<PathBuf>,

    /// Selection mode
    #[arg(long, value_enum, default_value = "batched")]
    pub policy: PickPolicyArg,

    /// Frames per batch (batched)
    #[arg(long, default_value = "10")]
    pub batch_size: usize,

    /// Frames to keep (best-n)
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    pub count: usize,

    /// Minimum score a kept frame must reach
    #[arg(long, default_value = "0")]
    pub floor: f64,

    /// Output directory
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output file name prefix
    #[arg(long, default_value = DEFAULT_FILE_PREFIX)]
    pub prefix: String,

    /// Zero-padding of the file number
    #[arg(long, default_value_t = DEFAULT_COUNTER_DIGITS)]
    pub digits: usize,

    /// Append the integer score to file names
    #[arg(long)]
    pub with_score: bool,
}

pub fn run(args: &PickArgs) -> Result<()> {
    let frames = load_frames_dir(&args.dir)?;
    if frames.is_empty() {
        bail!("No images found in {}", args.dir.display());
    }

    let scores = match args.proxy {
        Some(ref proxy_dir) => {
            let proxies = load_frames_dir(proxy_dir)?;
            score_with_bar(&proxies)
        }
        None => score_with_bar(&frames),
    };

    let policy = match args.policy {
        PickPolicyArg::Batched => SelectionPolicy::Windowed {
            window_size: args.batch_size,
            window_gap: 0,
            score_floor: args.floor,
        },
        PickPolicyArg::BestN => SelectionPolicy::GlobalTopK {
            k: args.count,
            min_spacing: None,
            score_floor: args.floor,
        },
    };
    println!("Selecting with {}", policy);

    let output = run_precomputed(frames, scores, &policy)?;

    if !output.extraction.is_empty() {
        let writer = WriterConfig {
            prefix: args.prefix.clone(),
            counter_digits: args.digits,
            filename_with_score: args.with_score,
            ..Default::default()
        };
        let paths = write_frames(
            &output.extraction.frames,
            &output.manifest(),
            &args.output,
            &writer,
        )?;
        println!("{} frame(s) saved to {}", paths.len(), args.output.display());
    }

    print_run_result(&output);
    Ok(())
}

fn score_with_bar(frames: &[Frame]) -> Vec<f64> {
    let pb = ProgressBar::new(frames.len() as u64);
    pb.set_style(bar_style());
    pb.set_message("Scoring frames");
    let scores = score_frames_with_progress(frames, |done| pb.set_position(done as u64));
    pb.finish_with_message(format!("Scored {} frames", scores.len()));
    scores
}

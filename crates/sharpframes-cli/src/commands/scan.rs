use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use indicatif::ProgressBar;
use sharpframes_core::consts::{DEFAULT_FRAMES_PER_BATCH, DEFAULT_SCAN_STEP, DEFAULT_SCAN_WORKERS};
use sharpframes_core::pipeline::config::ScanConfig;
use sharpframes_core::quality::sharpness_score;
use sharpframes_core::scan::scan_window_with;
use sharpframes_core::segment::SegmentPlanner;
use sharpframes_core::source::open_source;

use crate::progress::bar_style;

#[derive(Args)]
pub struct ScanArgs {
    /// Input video file
    pub file: PathBuf,

    /// Frames to score (0 = until the end)
    #[arg(long, default_value_t = DEFAULT_FRAMES_PER_BATCH)]
    pub limit: usize,

    /// Score every Nth frame
    #[arg(long, default_value_t = DEFAULT_SCAN_STEP)]
    pub step: usize,

    /// Frames to skip at the start of the video
    #[arg(long, default_value = "0")]
    pub offset: usize,

    /// Scoring worker threads
    #[arg(long, default_value_t = DEFAULT_SCAN_WORKERS)]
    pub workers: usize,

    /// Show top N frames only
    #[arg(long, default_value = "20")]
    pub top: usize,
}

pub fn run(args: &ScanArgs) -> Result<()> {
    let mut source = open_source(&args.file)?;
    let config = ScanConfig {
        frames_per_batch: args.limit,
        step: args.step.max(1),
        workers: args.workers.max(1),
    };
    let window = SegmentPlanner::new(config.frames_per_batch, args.offset)
        .with_step(config.step)
        .check(0, source.frame_count())?;

    let pb = ProgressBar::new(if window.is_unbounded() { 0 } else { window.length as u64 });
    pb.set_style(bar_style());
    pb.set_message("Scoring frames");

    let progress = |done: usize| pb.set_position(done as u64);
    let scores = scan_window_with(
        &mut *source,
        window,
        &config,
        sharpness_score,
        Some(&progress as &dyn Fn(usize)),
    )?;
    pb.finish_with_message(format!("Scored {} frames", scores.len()));

    let mut ranked = scores.clone();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.index.cmp(&b.index)));

    println!(
        "\nTop {} frames by sharpness (of {} scored, window {}):",
        args.top.min(ranked.len()),
        ranked.len(),
        window
    );
    println!("{:>5}  {:>12}  {:>12}", "Rank", "Frame #", "Score");
    println!("{}", "-".repeat(33));

    for (rank, s) in ranked.iter().take(args.top).enumerate() {
        println!("{:>5}  {:>12}  {:>12.2}", rank + 1, s.index, s.score);
    }

    if let (Some(best), Some(worst)) = (ranked.first(), ranked.last()) {
        println!("\nBest score:  {:.2} (frame {})", best.score, best.index);
        println!("Worst score: {:.2} (frame {})", worst.score, worst.index);
    }

    Ok(())
}

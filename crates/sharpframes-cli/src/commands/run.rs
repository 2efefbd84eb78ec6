use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use console::style;
use sharpframes_core::consts::{
    DEFAULT_COUNTER_DIGITS, DEFAULT_FILE_PREFIX, DEFAULT_FRAMES_PER_BATCH, DEFAULT_MIN_SPACING,
    DEFAULT_SCAN_STEP, DEFAULT_SCAN_WORKERS, DEFAULT_TOP_K, DEFAULT_WINDOW_SIZE,
};
use sharpframes_core::error::SharpFramesError;
use sharpframes_core::io::write_frames;
use sharpframes_core::pipeline::config::{
    ScanConfig, SegmentConfig, SelectionPolicy, SharpFramesConfig, WriterConfig,
};
use sharpframes_core::pipeline::{run_segment, PipelineStage, ProgressReporter};
use sharpframes_core::source::open_source;
use sharpframes_core::source::ser_writer::write_ser_clip;

use crate::progress::BarReporter;
use crate::summary::{print_run_result, print_run_summary};

/// Exit code for a segment that starts past the end of the video.
const EXIT_SEGMENT_EXHAUSTED: i32 = 2;

#[derive(Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    /// Best frames overall, kept apart by a minimum distance
    TopK,
    /// Best frame of each fixed-size window
    Windowed,
}

#[derive(Args)]
pub struct RunArgs {
    /// Input video file
    pub file: PathBuf,

    /// Config file (TOML); replaces every flag except the input and --batch-index
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Which segment of the video to process
    #[arg(long)]
    pub batch_index: Option<usize>,

    /// Frames scored per segment (0 = whole video)
    #[arg(long, default_value_t = DEFAULT_FRAMES_PER_BATCH)]
    pub frames_per_batch: usize,

    /// Frames to skip at the start of the video
    #[arg(long, default_value = "0")]
    pub offset: usize,

    /// Score every Nth frame
    #[arg(long, default_value_t = DEFAULT_SCAN_STEP)]
    pub step: usize,

    /// Scoring worker threads
    #[arg(long, default_value_t = DEFAULT_SCAN_WORKERS)]
    pub workers: usize,

    /// Selection policy
    #[arg(long, value_enum, default_value = "top-k")]
    pub policy: PolicyArg,

    /// Frames to keep (top-k)
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    pub count: usize,

    /// Minimum index distance between kept frames (top-k, 0 = none)
    #[arg(long, default_value_t = DEFAULT_MIN_SPACING)]
    pub min_distance: usize,

    /// Scored frames per window (windowed)
    #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE)]
    pub window_size: usize,

    /// Scored frames skipped between windows (windowed)
    #[arg(long, default_value = "0")]
    pub window_gap: usize,

    /// Minimum score a kept frame must reach
    #[arg(long, default_value = "0")]
    pub floor: f64,

    /// Output directory
    #[arg(short, long, default_value = "sharp_frames")]
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

    /// Insert a unix timestamp into file names
    #[arg(long)]
    pub timestamp: bool,

    /// Write the kept frames as one SER clip instead of PNG files
    #[arg(long)]
    pub ser: bool,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let mut config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        let mut config: SharpFramesConfig =
            toml::from_str(&contents).context("Invalid config")?;
        config.input = args.file.clone();
        config
    } else {
        build_config_from_args(args)
    };
    if let Some(batch_index) = args.batch_index {
        config.segment.batch_index = batch_index;
    }
    config.validate()?;

    let mut source = open_source(&config.input)?;
    print_run_summary(&config, &source.info());

    let reporter = BarReporter::new();
    let output = match run_segment(&mut *source, &config, &reporter) {
        Ok(output) => output,
        Err(SharpFramesError::SegmentExhausted {
            start_index,
            total_frames,
        }) => {
            reporter.finish();
            eprintln!(
                "{} batch {} starts at frame {}, but the video has {} frames. Nothing left to process.",
                style("Segment exhausted:").yellow().bold(),
                config.segment.batch_index,
                start_index,
                total_frames
            );
            std::process::exit(EXIT_SEGMENT_EXHAUSTED);
        }
        Err(e) => return Err(e.into()),
    };

    if !output.extraction.is_empty() {
        if args.ser {
            std::fs::create_dir_all(&config.output)?;
            let path = config.output.join(format!(
                "{}_batch{:0width$}.ser",
                config.writer.prefix,
                config.segment.batch_index,
                width = config.writer.counter_digits
            ));
            reporter.begin_stage(PipelineStage::Writing, None);
            write_ser_clip(&path, &output.extraction.frames)?;
            reporter.finish_stage();
            reporter.finish();
            println!("\nSER clip saved to {}", path.display());
        } else {
            reporter.begin_stage(PipelineStage::Writing, Some(output.extraction.len()));
            let paths = write_frames(
                &output.extraction.frames,
                &output.manifest(),
                &config.output,
                &config.writer,
            )?;
            reporter.finish_stage();
            reporter.finish();
            println!(
                "\n{} frame(s) saved to {}",
                paths.len(),
                config.output.display()
            );
        }
    } else {
        reporter.finish();
    }

    print_run_result(&output);
    Ok(())
}

fn build_config_from_args(args: &RunArgs) -> SharpFramesConfig {
    let selection = match args.policy {
        PolicyArg::TopK => SelectionPolicy::GlobalTopK {
            k: args.count,
            min_spacing: (args.min_distance > 0).then_some(args.min_distance),
            score_floor: args.floor,
        },
        PolicyArg::Windowed => SelectionPolicy::Windowed {
            window_size: args.window_size,
            window_gap: args.window_gap,
            score_floor: args.floor,
        },
    };

    SharpFramesConfig {
        input: args.file.clone(),
        output: args.output.clone(),
        scan: ScanConfig {
            frames_per_batch: args.frames_per_batch,
            step: args.step,
            workers: args.workers,
        },
        segment: SegmentConfig {
            batch_index: 0,
            global_offset: args.offset,
        },
        selection,
        writer: WriterConfig {
            prefix: args.prefix.clone(),
            counter_digits: args.digits,
            filename_with_score: args.with_score,
            use_timestamp: args.timestamp,
            auto_increment: true,
        },
    }
}

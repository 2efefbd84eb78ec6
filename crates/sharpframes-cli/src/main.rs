mod commands;
mod progress;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sharpframes", about = "Pick the sharpest frames out of long videos")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show video file metadata
    Info(commands::info::InfoArgs),
    /// Score one segment and rank its frames by sharpness
    Scan(commands::scan::ScanArgs),
    /// Scan, select and extract the sharpest frames of one segment
    Run(commands::run::RunArgs),
    /// Select from image folders using proxy-computed scores
    Pick(commands::pick::PickArgs),
    /// Print or save the default configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Scan(args) => commands::scan::run(args),
        Commands::Run(args) => commands::run::run(args),
        Commands::Pick(args) => commands::pick::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}

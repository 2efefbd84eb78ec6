use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use sharpframes_core::source::open_source;

#[derive(Args)]
pub struct InfoArgs {
    /// Input video file
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let source = open_source(&args.file)?;
    let info = source.info();

    println!("File:        {}", info.filename.display());
    match info.total_frames {
        Some(n) => println!("Frames:      {}", n),
        None => println!("Frames:      unknown"),
    }
    println!("Dimensions:  {}x{}", info.width, info.height);
    println!("Bit depth:   {}", info.bit_depth);
    println!("Color mode:  {:?}", info.color_mode);
    if let Some(fps) = info.frames_per_second {
        println!("Frame rate:  {:.3} fps", fps);
    }

    if let Some(ref obs) = info.observer {
        println!("Observer:    {}", obs);
    }
    if let Some(ref tel) = info.telescope {
        println!("Telescope:   {}", tel);
    }
    if let Some(ref inst) = info.instrument {
        println!("Instrument:  {}", inst);
    }

    if let Some(total) = info.total_frames {
        let frame_bytes = info.width as usize * info.height as usize * 3;
        let total_mb = (frame_bytes * total) as f64 / (1024.0 * 1024.0);
        println!("Decoded size: {:.1} MB (8-bit RGB)", total_mb);
    }

    Ok(())
}

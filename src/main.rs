use clap::Parser;
use std::fs;
use tracing::{error, info};

use soundreel::args::Args;
use soundreel::driver;
use soundreel::ffmpeg::FfmpegTool;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info") // set to "debug" for more logs
        .init();

    let args = Args::parse();

    if !args.root.is_dir() {
        error!("Sound directory not found: {}", args.root.display());
        std::process::exit(1);
    }
    fs::create_dir_all(&args.output_dir)?;

    info!(
        "Converting sound classes under {} into {}",
        args.root.display(),
        args.output_dir.display()
    );

    let tool = FfmpegTool::new(args.ffmpeg.clone(), args.font.clone(), args.show_error_output);
    driver::run(&args, &tool)?;

    info!(
        "Final video: {}",
        args.output_dir
            .join(format!("{}.mp4", args.output_name))
            .display()
    );
    Ok(())
}

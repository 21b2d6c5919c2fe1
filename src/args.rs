use clap::Parser;
use std::path::PathBuf;

/// Batch-convert directories of short `.wav` clips into captioned videos
/// and splice them into a single output file.
///
/// The root directory is expected to hold one subdirectory per sound
/// class, named `"<number> <class name>"`, each containing `.wav` files
/// and an optional `transcript.txt` with one caption per line.
#[derive(Parser, Debug)]
pub struct Args {
    /// Root directory containing the sound class subdirectories.
    #[clap(long)]
    pub root: PathBuf,

    /// Directory where intermediate clip videos and the concat manifest
    /// are written; both are removed once the final video exists.
    #[clap(long, default_value = "./out")]
    pub output_dir: PathBuf,

    /// Path to the ffmpeg executable.
    #[clap(long, default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    /// Font file used for the burned-in caption and class-name lines.
    #[clap(long, default_value = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf")]
    pub font: PathBuf,

    /// Base name (no extension) of the final concatenated video.
    #[clap(long, default_value = "output_video")]
    pub output_name: String,

    /// Indentation width for per-file progress lines.
    #[clap(long, default_value_t = 4)]
    pub indent: usize,

    /// Echo ffmpeg's diagnostic output when an invocation fails.
    #[clap(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub show_error_output: bool,
}

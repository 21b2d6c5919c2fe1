use anyhow::Context;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::error;

use crate::escape::escape_for_filtergraph;

/// One per-clip render job for the external tool.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub wav_path: PathBuf,
    pub out_path: PathBuf,
    pub caption: String,
    pub class_name: String,
    pub duration_secs: f64,
}

/// The three invocation modes of the external media tool, kept behind a
/// trait so the driver can run without a real ffmpeg binary.
pub trait MediaTool {
    /// Measure a clip's duration in seconds.
    fn probe_duration(&self, wav_path: &Path) -> anyhow::Result<f64>;

    /// Render one captioned clip video.
    fn render_clip(&self, request: &RenderRequest) -> anyhow::Result<()>;

    /// Splice the clips listed in the manifest into `output_name`
    /// without re-encoding. The manifest lists names relative to
    /// `manifest_dir`, so the tool runs with that as working directory.
    fn concatenate(
        &self,
        manifest_dir: &Path,
        manifest_name: &str,
        output_name: &str,
    ) -> anyhow::Result<()>;
}

pub struct FfmpegTool {
    ffmpeg_path: PathBuf,
    font_path: PathBuf,
    show_error_output: bool,
}

impl FfmpegTool {
    pub fn new(ffmpeg_path: PathBuf, font_path: PathBuf, show_error_output: bool) -> Self {
        Self {
            ffmpeg_path,
            font_path,
            show_error_output,
        }
    }

    fn log_failure(&self, what: &str, output: &Output) {
        error!("ffmpeg failed to {} (exit status {})", what, output.status);
        if self.show_error_output {
            error!("{}", combined_output(output).trim_end());
        }
    }
}

impl MediaTool for FfmpegTool {
    fn probe_duration(&self, wav_path: &Path) -> anyhow::Result<f64> {
        // No output file is given, so ffmpeg exits non-zero; the
        // Duration line still lands on its diagnostic stream.
        let output = Command::new(&self.ffmpeg_path)
            .arg("-i")
            .arg(wav_path)
            .output()
            .with_context(|| format!("Failed to run {}", self.ffmpeg_path.display()))?;
        parse_duration_secs(&combined_output(&output))
            .with_context(|| format!("No duration found for {}", wav_path.display()))
    }

    fn render_clip(&self, request: &RenderRequest) -> anyhow::Result<()> {
        let font = self.font_path.display();
        let filter = format!(
            "drawtext=fontfile={font}:fontsize=30:fontcolor=green:x=(w-text_w)/2:y=h/2-ascent:text={}, \
             drawtext=fontfile={font}:fontsize=30:fontcolor=green:x=(w-text_w)/2:y=96-ascent:text={}",
            escape_for_filtergraph(&request.caption),
            escape_for_filtergraph(&request.class_name),
        );
        let output = Command::new(&self.ffmpeg_path)
            .args(["-y", "-f", "lavfi", "-i", "color=c=black:s=640x480", "-i"])
            .arg(&request.wav_path)
            .arg("-vf")
            .arg(&filter)
            .arg("-t")
            .arg(request.duration_secs.to_string())
            .arg(&request.out_path)
            .output()
            .with_context(|| format!("Failed to run {}", self.ffmpeg_path.display()))?;
        if !output.status.success() {
            self.log_failure("generate video", &output);
            anyhow::bail!(
                "ffmpeg exited with {} rendering {}",
                output.status,
                request.out_path.display()
            );
        }
        Ok(())
    }

    fn concatenate(
        &self,
        manifest_dir: &Path,
        manifest_name: &str,
        output_name: &str,
    ) -> anyhow::Result<()> {
        let output = Command::new(&self.ffmpeg_path)
            .current_dir(manifest_dir)
            .args(["-y", "-f", "concat", "-i", manifest_name, "-c", "copy", output_name])
            .output()
            .with_context(|| format!("Failed to run {}", self.ffmpeg_path.display()))?;
        if !output.status.success() {
            self.log_failure("concatenate intermediate video files", &output);
            anyhow::bail!("ffmpeg exited with {} concatenating clips", output.status);
        }
        Ok(())
    }
}

fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

/// Pull the `Duration: HH:MM:SS.ss` timestamp out of ffmpeg's diagnostic
/// text and convert it to seconds.
pub fn parse_duration_secs(text: &str) -> anyhow::Result<f64> {
    let re = Regex::new(r"Duration:\s(\d+):(\d+):(\d+\.\d+),").unwrap();
    let caps = re
        .captures(text)
        .ok_or_else(|| anyhow::anyhow!("No 'Duration:' line in tool output"))?;
    let hours: f64 = caps[1].parse()?;
    let minutes: f64 = caps[2].parse()?;
    let seconds: f64 = caps[3].parse()?;
    Ok(hours * 3600.0 + minutes * 60.0 + seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_line_converts_to_seconds() {
        let text = "Input #0, wav, from 'bark.wav':\n  Duration: 00:01:23.45, bitrate: 705 kb/s";
        let secs = parse_duration_secs(text).unwrap();
        assert!((secs - 83.45).abs() < 1e-9);
    }

    #[test]
    fn hours_are_included() {
        let secs = parse_duration_secs("Duration: 01:02:03.50, start").unwrap();
        assert!((secs - 3723.5).abs() < 1e-9);
    }

    #[test]
    fn text_without_a_duration_token_is_an_error() {
        assert!(parse_duration_secs("At least one output file must be specified").is_err());
    }
}

use anyhow::Context;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::{error, info, warn};

use crate::args::Args;
use crate::ffmpeg::{MediaTool, RenderRequest};
use crate::scan::{self, SoundClass};

pub const MANIFEST_NAME: &str = "concatFile.txt";

/// File names of the intermediate clips a run produced, in render order.
/// The rendered ones are deleted again during cleanup; the failed ones
/// are reported at the end of the run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub rendered: Vec<String>,
    pub failed: Vec<String>,
}

/// Walk the sound class directories, render one captioned clip per
/// `.wav` file, splice the clips into the final video, and remove the
/// intermediates.
///
/// Per-clip render failures and a failed concatenation are logged and
/// survived; everything else aborts the run.
pub fn run(config: &Args, tool: &dyn MediaTool) -> anyhow::Result<RunSummary> {
    let mut summary = RunSummary::default();

    let mut entries = Vec::new();
    for entry in fs::read_dir(&config.root)
        .with_context(|| format!("Failed to list {}", config.root.display()))?
    {
        entries.push(entry?.file_name().to_string_lossy().into_owned());
    }
    entries.sort();

    for dir_name in &entries {
        let class = scan::parse_class_dir_name(dir_name)?;
        let class_dir = config.root.join(dir_name);
        if !class_dir.is_dir() {
            continue;
        }
        info!("{}", "=".repeat(64));
        info!("Sound class: {}", class.name);
        info!("{}", "=".repeat(64));
        process_class(config, tool, &class, &class_dir, &mut summary)?;
    }

    write_manifest(&config.output_dir.join(MANIFEST_NAME), &summary.rendered)?;

    info!("Concatenating {} video file(s)...", summary.rendered.len());
    let output_file = format!("{}.mp4", config.output_name);
    if let Err(e) = tool.concatenate(&config.output_dir, MANIFEST_NAME, &output_file) {
        error!("Unable to concatenate intermediate video files: {:#}", e);
    }

    info!("Removing intermediate files...");
    cleanup(&config.output_dir, &summary)?;

    if summary.failed.is_empty() {
        info!("Done.");
    } else {
        warn!(
            "Done; {} clip(s) failed to render: {}",
            summary.failed.len(),
            summary.failed.join(", ")
        );
    }
    Ok(summary)
}

fn process_class(
    config: &Args,
    tool: &dyn MediaTool,
    class: &SoundClass,
    class_dir: &Path,
    summary: &mut RunSummary,
) -> anyhow::Result<()> {
    let tab = " ".repeat(config.indent);
    let wav_files = scan::list_wav_files(class_dir)?;

    let captions = match scan::load_transcript(class_dir)? {
        Some(captions) => {
            if captions.len() != wav_files.len() {
                anyhow::bail!(
                    "Transcript for sound class '{}' has {} line(s) but the directory holds {} .wav file(s)",
                    class.name,
                    captions.len(),
                    wav_files.len()
                );
            }
            Some(captions)
        }
        None => {
            warn!(
                "{}No transcript file found for sound class {}; using file name as caption.",
                tab, class.name
            );
            None
        }
    };

    for (index, wav_name) in wav_files.iter().enumerate() {
        info!("{}File: {}", tab, wav_name);
        let wav_path = class_dir.join(wav_name);

        info!("{}{}Getting file duration...", tab, tab);
        let duration_secs = tool.probe_duration(&wav_path)?;
        info!("{}{}Duration: {} seconds", tab, tab, duration_secs);

        let caption = match &captions {
            Some(captions) => captions[index].clone(),
            None => wav_name.clone(),
        };
        info!("{}{}Caption: {}", tab, tab, caption);

        let out_name = format!("{}_{}.mp4", class.number, index);
        let request = RenderRequest {
            wav_path,
            out_path: config.output_dir.join(&out_name),
            caption,
            class_name: class.name.clone(),
            duration_secs,
        };

        info!("{}{}Generating video...", tab, tab);
        match tool.render_clip(&request) {
            Ok(()) => summary.rendered.push(out_name),
            Err(e) => {
                error!("Unable to generate video for {}: {:#}", wav_name, e);
                summary.failed.push(out_name);
            }
        }
    }
    Ok(())
}

fn write_manifest(path: &Path, rendered: &[String]) -> anyhow::Result<()> {
    let mut f =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    for name in rendered {
        // Names are resolved relative to the manifest's own directory.
        writeln!(f, "file '{}'", name)?;
    }
    Ok(())
}

fn cleanup(output_dir: &Path, summary: &RunSummary) -> anyhow::Result<()> {
    fs::remove_file(output_dir.join(MANIFEST_NAME))?;
    for name in &summary.rendered {
        fs::remove_file(output_dir.join(name))?;
    }
    // A failed render can still leave a partial file behind.
    for name in &summary.failed {
        let path = output_dir.join(name);
        if path.exists() {
            fs::remove_file(path)?;
        }
    }
    Ok(())
}

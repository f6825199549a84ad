//! Asset generation commands.

use crate::config::{IconConfig, SoundConfig};
use anyhow::Context;
use skycargo_core::audio::{TranscodeSummary, Transcoder};
use skycargo_core::{sky_icon, write_png, write_sound_set};
use std::fs;
use std::path::{Path, PathBuf};

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    Ok(())
}

/// Remove a partially written output file.
///
/// A file that is already gone counts as removed.
fn discard_partial(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Write the sky gradient icon.
///
/// Geometry is checked before any pixels are generated. A partially written
/// file is removed if encoding fails; if that removal also fails, it is logged
/// and reported in the returned error.
pub fn run_icon(config: &IconConfig) -> anyhow::Result<PathBuf> {
    let output = &config.output;
    let image = sky_icon(config.geometry)
        .with_context(|| format!("generating icon {}", output.display()))?;

    ensure_parent(output)?;

    if let Err(e) = write_png(output, &image) {
        let err = anyhow::Error::new(e).context(format!("writing icon {}", output.display()));
        return Err(match discard_partial(output) {
            Ok(()) => err,
            Err(rm) => {
                tracing::warn!(
                    path = %output.display(),
                    error = %rm,
                    "failed to remove partial icon"
                );
                err.context(format!(
                    "removing partial icon {} also failed: {rm}",
                    output.display()
                ))
            }
        });
    }

    Ok(output.clone())
}

/// Write the sound set, then optionally convert it to MP3.
///
/// Returns the final asset paths: converted MP3 files first, then any WAV
/// files that could not be converted.
pub fn run_sounds(config: &SoundConfig) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("creating directory {}", config.out_dir.display()))?;

    let wavs = write_sound_set(&config.out_dir, &config.synth)
        .with_context(|| format!("writing sounds to {}", config.out_dir.display()))?;
    tracing::info!(count = wavs.len(), "all wav files generated");

    let Some(program) = &config.mp3_transcoder else {
        return Ok(wavs);
    };

    let summary = Transcoder::new(program).convert_all(&wavs);
    if !summary.all_converted() {
        tracing::warn!(
            failures = summary.failed.len(),
            "some sounds remain as wav; install ffmpeg to convert them"
        );
    }

    let mut assets = summary.converted;
    assets.extend(summary.failed);
    Ok(assets)
}

/// Convert the WAV files already in `dir` to MP3.
pub fn run_transcode(dir: &Path, program: &str) -> anyhow::Result<TranscodeSummary> {
    let summary = Transcoder::new(program)
        .convert_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?;
    tracing::info!(
        converted = summary.converted.len(),
        failed = summary.failed.len(),
        "transcoding finished"
    );
    Ok(summary)
}

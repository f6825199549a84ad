//! Sound effect generation for Skycargo.
//!
//! This module provides functionality for:
//! - Synthesizing the game's sound effects as 16-bit PCM
//! - Writing them as WAV files
//! - Optionally transcoding the WAV files to MP3 with `ffmpeg`

mod synth;
mod transcode;
mod wav;

pub use synth::{time_axis, SoundEffect, SAMPLE_RATE};
pub use transcode::{TranscodeError, TranscodeSummary, Transcoder};
pub use wav::{write_wav, write_wav_file, WavError, WAV_HEADER_LEN};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for rendering a sound set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthSettings {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Seed for the noise generator.
    pub seed: u64,
    /// Effects to render, in order.
    pub effects: Vec<SoundEffect>,
}

impl Default for SynthSettings {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            seed: 0,
            effects: SoundEffect::ALL.to_vec(),
        }
    }
}

/// Render each configured effect into `<out_dir>/<stem>.wav`.
///
/// Returns the written paths in render order. Stops at the first failure.
pub fn write_sound_set(out_dir: &Path, settings: &SynthSettings) -> Result<Vec<PathBuf>, WavError> {
    let mut written = Vec::with_capacity(settings.effects.len());
    for &effect in &settings.effects {
        let samples = effect.render_seeded(settings.sample_rate, settings.seed);
        let path = out_dir.join(format!("{}.wav", effect.file_stem()));
        write_wav_file(&path, settings.sample_rate, &samples)?;
        tracing::info!(path = %path.display(), samples = samples.len(), "wrote sound");
        written.push(path);
    }
    Ok(written)
}

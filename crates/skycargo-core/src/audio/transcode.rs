//! MP3 transcoding through an external `ffmpeg` process.
//!
//! Transcoding is optional: when the tool is missing or a conversion fails,
//! the WAV file stays in place and remains a usable asset.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

/// Errors from converting a single file.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// The transcoder could not be started (usually not installed).
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The transcoder ran but reported failure.
    #[error("Transcoding {path} failed with exit code {code:?}")]
    Failed { path: PathBuf, code: Option<i32> },

    /// The source WAV could not be removed after a successful conversion.
    #[error("Failed to remove {path}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Outcome of converting a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscodeSummary {
    /// MP3 files produced.
    pub converted: Vec<PathBuf>,
    /// WAV files left in place because conversion failed.
    pub failed: Vec<PathBuf>,
}

impl TranscodeSummary {
    pub fn all_converted(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs `ffmpeg` (or a compatible program) to turn WAV files into MP3.
#[derive(Debug, Clone)]
pub struct Transcoder {
    program: OsString,
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Transcoder {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Arguments for one conversion: LAME VBR quality 2, overwrite, errors only.
    fn arguments(wav: &Path, mp3: &Path) -> Vec<OsString> {
        vec![
            "-i".into(),
            wav.into(),
            "-codec:a".into(),
            "libmp3lame".into(),
            "-qscale:a".into(),
            "2".into(),
            mp3.into(),
            "-y".into(),
            "-loglevel".into(),
            "error".into(),
        ]
    }

    /// Convert one WAV file to an MP3 next to it and remove the WAV.
    ///
    /// Returns the MP3 path. On failure the WAV is left untouched.
    pub fn to_mp3(&self, wav: &Path) -> Result<PathBuf, TranscodeError> {
        let mp3 = wav.with_extension("mp3");

        let status = Command::new(&self.program)
            .args(Self::arguments(wav, &mp3))
            .stdin(Stdio::null())
            .status()
            .map_err(|source| TranscodeError::Spawn {
                program: self.program_name(),
                source,
            })?;

        if !status.success() {
            return Err(TranscodeError::Failed {
                path: wav.to_path_buf(),
                code: status.code(),
            });
        }

        fs::remove_file(wav).map_err(|source| TranscodeError::Cleanup {
            path: wav.to_path_buf(),
            source,
        })?;

        tracing::debug!(wav = %wav.display(), mp3 = %mp3.display(), "transcoded");
        Ok(mp3)
    }

    /// Convert each file in turn.
    ///
    /// Per-file failures are logged and collected rather than aborting the
    /// batch.
    pub fn convert_all(&self, wavs: &[PathBuf]) -> TranscodeSummary {
        let mut summary = TranscodeSummary::default();
        for wav in wavs {
            match self.to_mp3(wav) {
                Ok(mp3) => {
                    tracing::info!(path = %mp3.display(), "converted to mp3");
                    summary.converted.push(mp3);
                }
                Err(e) => {
                    tracing::warn!(path = %wav.display(), error = %e, "mp3 conversion failed");
                    summary.failed.push(wav.clone());
                }
            }
        }
        summary
    }

    /// Convert every `.wav` file in `dir`, in file name order.
    ///
    /// Only failing to read the directory is an error.
    pub fn convert_dir(&self, dir: &Path) -> io::Result<TranscodeSummary> {
        let mut wavs: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "wav"))
            .collect();
        wavs.sort();
        Ok(self.convert_all(&wavs))
    }
}

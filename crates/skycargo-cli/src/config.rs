//! Command-line options and the asset configs they map onto.

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use skycargo_core::audio::{SoundEffect, SAMPLE_RATE};
use skycargo_core::gradient::ICON_SIZE;
use skycargo_core::{IconGeometry, SynthSettings};
use std::path::PathBuf;

/// Generate the Skycargo game assets.
#[derive(Debug, Parser)]
#[command(name = "skycargo", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write the sky gradient icon as a PNG
    Icon(IconArgs),
    /// Synthesize the sound effects
    Sounds(SoundArgs),
    /// Convert every WAV file in a directory to MP3
    Transcode {
        /// Directory holding the WAV files
        #[arg(default_value = "assets/sounds")]
        dir: PathBuf,

        /// Transcoder program
        #[arg(long, default_value = "ffmpeg")]
        ffmpeg: String,
    },
    /// Write the icon and all sound effects
    All {
        #[command(flatten)]
        icon: IconArgs,
        #[command(flatten)]
        sounds: SoundArgs,
    },
}

#[derive(Debug, Clone, Args)]
pub struct IconArgs {
    /// Output path for the icon
    #[arg(long = "icon-output", default_value = "assets/icon.png")]
    pub output: PathBuf,

    /// Icon width in pixels
    #[arg(long, default_value_t = ICON_SIZE)]
    pub width: u32,

    /// Icon height in pixels
    #[arg(long, default_value_t = ICON_SIZE)]
    pub height: u32,
}

#[derive(Debug, Clone, Args)]
pub struct SoundArgs {
    /// Directory for the sound files
    #[arg(long = "sounds-dir", default_value = "assets/sounds")]
    pub out_dir: PathBuf,

    /// Sample rate in Hz
    #[arg(long, default_value_t = SAMPLE_RATE)]
    pub sample_rate: u32,

    /// Seed for the noise in engine, crash and whoosh sounds
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Only render these effects (file stems, e.g. `coin_collect`)
    #[arg(long = "only", value_delimiter = ',')]
    pub only: Vec<String>,

    /// Convert the WAV files to MP3 with ffmpeg
    #[arg(long)]
    pub mp3: bool,

    /// Transcoder program
    #[arg(long, default_value = "ffmpeg")]
    pub ffmpeg: String,
}

/// Where and how big to write the icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconConfig {
    pub output: PathBuf,
    pub geometry: IconGeometry,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("assets/icon.png"),
            geometry: IconGeometry::default(),
        }
    }
}

impl From<IconArgs> for IconConfig {
    fn from(args: IconArgs) -> Self {
        Self {
            output: args.output,
            geometry: IconGeometry {
                width: args.width,
                height: args.height,
            },
        }
    }
}

/// Where to write the sound set and how to render it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundConfig {
    pub out_dir: PathBuf,
    pub synth: SynthSettings,
    /// Transcoder to run afterwards, if any.
    pub mp3_transcoder: Option<String>,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("assets/sounds"),
            synth: SynthSettings::default(),
            mp3_transcoder: None,
        }
    }
}

impl TryFrom<SoundArgs> for SoundConfig {
    type Error = anyhow::Error;

    fn try_from(args: SoundArgs) -> Result<Self, Self::Error> {
        let effects = if args.only.is_empty() {
            SoundEffect::ALL.to_vec()
        } else {
            args.only
                .iter()
                .map(|stem| {
                    SoundEffect::from_stem(stem)
                        .ok_or_else(|| anyhow::anyhow!("unknown sound effect: {stem}"))
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        anyhow::ensure!(args.sample_rate > 0, "sample rate must be positive");

        Ok(Self {
            out_dir: args.out_dir,
            synth: SynthSettings {
                sample_rate: args.sample_rate,
                seed: args.seed,
                effects,
            },
            mp3_transcoder: args.mp3.then_some(args.ffmpeg),
        })
    }
}

//! Skycargo CLI - command-line driver for asset generation
//!
//! # Module Structure
//!
//! - `config` - clap options and the asset configs they map onto
//! - `commands` - icon and sound generation commands

pub mod commands;
pub mod config;

pub use commands::{run_icon, run_sounds, run_transcode};
pub use config::{Cli, Command, IconConfig, SoundConfig};

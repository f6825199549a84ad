//! Skycargo Core - asset generation library
//!
//! This crate produces the static assets of the Skycargo game from procedural
//! rules: the sky gradient icon, encoded by a self-contained PNG writer, and
//! the synthesized sound effects.

pub mod audio;
pub mod gradient;
pub mod png;

pub use audio::{write_sound_set, SoundEffect, SynthSettings};
pub use gradient::{sky_gradient, sky_icon, IconGeometry};
pub use png::{encode, encode_to_vec, write_png, EncodeError, RasterImage, Rgb};

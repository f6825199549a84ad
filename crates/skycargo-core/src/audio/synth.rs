//! Procedural synthesis of the game's sound effects.
//!
//! Every effect is a sum of sines shaped by an envelope, sampled over an
//! evenly spaced time axis that includes both endpoints. Effects with a noise
//! component draw standard-normal samples from a seeded generator, so a given
//! `(effect, sample_rate, seed)` always renders the same samples.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Default output sample rate in Hz.
pub const SAMPLE_RATE: u32 = 44_100;

/// Full-scale amplitude of a signed 16-bit sample.
const FULL_SCALE: f64 = 32767.0;

/// The sound effects used by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundEffect {
    ButtonClick,
    PlaneEngine,
    CargoPickup,
    CargoDelivery,
    Crash,
    Achievement,
    Whoosh,
    CoinCollect,
    LevelUp,
    Warning,
    MenuMusic,
    GameplayMusic,
}

impl SoundEffect {
    /// All effects, in generation order.
    pub const ALL: [SoundEffect; 12] = [
        SoundEffect::ButtonClick,
        SoundEffect::PlaneEngine,
        SoundEffect::CargoPickup,
        SoundEffect::CargoDelivery,
        SoundEffect::Crash,
        SoundEffect::Achievement,
        SoundEffect::Whoosh,
        SoundEffect::CoinCollect,
        SoundEffect::LevelUp,
        SoundEffect::Warning,
        SoundEffect::MenuMusic,
        SoundEffect::GameplayMusic,
    ];

    /// File name without extension.
    pub fn file_stem(self) -> &'static str {
        match self {
            SoundEffect::ButtonClick => "button_click",
            SoundEffect::PlaneEngine => "plane_engine",
            SoundEffect::CargoPickup => "cargo_pickup",
            SoundEffect::CargoDelivery => "cargo_delivery",
            SoundEffect::Crash => "crash",
            SoundEffect::Achievement => "achievement",
            SoundEffect::Whoosh => "whoosh",
            SoundEffect::CoinCollect => "coin_collect",
            SoundEffect::LevelUp => "level_up",
            SoundEffect::Warning => "warning",
            SoundEffect::MenuMusic => "menu_music",
            SoundEffect::GameplayMusic => "gameplay_music",
        }
    }

    /// Look an effect up by its file stem.
    pub fn from_stem(stem: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.file_stem() == stem)
    }

    /// Clip length in seconds.
    pub fn duration(self) -> f64 {
        match self {
            SoundEffect::ButtonClick => 0.1,
            SoundEffect::PlaneEngine => 2.0,
            SoundEffect::CargoPickup => 0.4,
            SoundEffect::CargoDelivery => 0.5,
            SoundEffect::Crash => 0.8,
            SoundEffect::Achievement => 0.8,
            SoundEffect::Whoosh => 0.3,
            SoundEffect::CoinCollect => 0.3,
            SoundEffect::LevelUp => 1.0,
            SoundEffect::Warning => 0.5,
            SoundEffect::MenuMusic => 10.0,
            SoundEffect::GameplayMusic => 15.0,
        }
    }

    /// Whether the effect mixes in random noise.
    pub fn is_noisy(self) -> bool {
        matches!(
            self,
            SoundEffect::PlaneEngine | SoundEffect::Crash | SoundEffect::Whoosh
        )
    }

    /// Render with a generator derived from `seed`.
    ///
    /// Each effect gets its own stream, so rendering one effect never shifts
    /// the noise of another.
    pub fn render_seeded(self, sample_rate: u32, seed: u64) -> Vec<i16> {
        let mut rng = StdRng::seed_from_u64(seed ^ self as u64);
        self.render(sample_rate, &mut rng)
    }

    /// Render the effect as 16-bit mono samples.
    pub fn render<R: Rng + ?Sized>(self, sample_rate: u32, rng: &mut R) -> Vec<i16> {
        let t = time_axis(self.duration(), sample_rate);
        let sine = |freq: f64, t: f64| (TAU * freq * t).sin();

        match self {
            SoundEffect::ButtonClick => {
                let audio: Vec<f64> = t
                    .iter()
                    .map(|&t| sine(800.0, t) * (-t * 50.0).exp())
                    .collect();
                scale(&audio, 1.0)
            }
            SoundEffect::PlaneEngine => {
                let audio: Vec<f64> = t
                    .iter()
                    .map(|&t| {
                        sine(80.0, t) * 0.3
                            + sine(120.0, t) * 0.2
                            + sine(160.0, t) * 0.15
                            + standard_normal(rng) * 0.1
                    })
                    .collect();
                normalize(&audio, 0.6)
            }
            SoundEffect::CargoPickup => {
                let audio: Vec<f64> = t
                    .iter()
                    .map(|&t| {
                        let freq = 400.0 + t * 300.0;
                        sine(freq, t) * (-t * 5.0).exp()
                    })
                    .collect();
                scale(&audio, 0.7)
            }
            SoundEffect::CargoDelivery => {
                let audio: Vec<f64> = t
                    .iter()
                    .map(|&t| {
                        let chord = sine(523.0, t) * 0.4 + sine(659.0, t) * 0.3 + sine(784.0, t) * 0.3;
                        chord * (-t * 4.0).exp()
                    })
                    .collect();
                scale(&audio, 0.6)
            }
            SoundEffect::Crash => {
                let audio: Vec<f64> = t
                    .iter()
                    .map(|&t| {
                        let rumble =
                            sine(100.0, t) * 0.3 + sine(50.0, t) * 0.2 + standard_normal(rng) * 0.5;
                        rumble * (-t * 3.0).exp()
                    })
                    .collect();
                normalize(&audio, 0.8)
            }
            SoundEffect::Achievement => {
                let audio = arpeggio(&t, &[523.0, 659.0, 784.0, 1047.0], 1.5, 8.0);
                normalize(&audio, 0.6)
            }
            SoundEffect::Whoosh => {
                let audio: Vec<f64> = t
                    .iter()
                    .map(|&t| {
                        let freq = 1000.0 - t * 2000.0;
                        let swept = sine(freq, t) * 0.3 + standard_normal(rng) * 0.4;
                        swept * (-t * 8.0).exp()
                    })
                    .collect();
                normalize(&audio, 0.5)
            }
            SoundEffect::CoinCollect => {
                let audio: Vec<f64> = t
                    .iter()
                    .map(|&t| (sine(1200.0, t) + sine(1600.0, t)) * (-t * 15.0).exp())
                    .collect();
                normalize(&audio, 0.5)
            }
            SoundEffect::LevelUp => {
                let audio = arpeggio(&t, &[392.0, 494.0, 587.0, 784.0], 1.2, 6.0);
                normalize(&audio, 0.6)
            }
            SoundEffect::Warning => {
                let audio: Vec<f64> = t
                    .iter()
                    .map(|&t| {
                        let wobble = sine(8.0, t);
                        let freq = 600.0 + 200.0 * wobble;
                        sine(freq, t) * (0.5 + 0.5 * wobble)
                    })
                    .collect();
                scale(&audio, 0.5)
            }
            SoundEffect::MenuMusic => {
                let audio: Vec<f64> = t
                    .iter()
                    .map(|&t| {
                        let chord =
                            sine(262.0, t) * 0.15 + sine(330.0, t) * 0.15 + sine(392.0, t) * 0.15;
                        chord + sine(524.0, t) * 0.1 * (1.0 + sine(0.5, t))
                    })
                    .collect();
                scale(&audio, 0.4)
            }
            SoundEffect::GameplayMusic => {
                let audio: Vec<f64> = t
                    .iter()
                    .map(|&t| {
                        let beat = if sine(2.0, t) > 0.5 { 0.2 } else { 0.0 };
                        let melody = sine(294.0, t) * 0.15 + sine(370.0, t) * 0.15;
                        beat + melody
                    })
                    .collect();
                scale(&audio, 0.4)
            }
        }
    }
}

// ============================================================================
// Signal Helpers
// ============================================================================

/// Evenly spaced sample times from 0 to `duration` inclusive.
///
/// The sample count is `floor(sample_rate * duration)`, so the spacing is
/// slightly wider than `1 / sample_rate`.
pub fn time_axis(duration: f64, sample_rate: u32) -> Vec<f64> {
    let n = (sample_rate as f64 * duration) as usize;
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = duration / (n - 1) as f64;
            (0..n).map(|i| i as f64 * step).collect()
        }
    }
}

/// One standard-normal sample (Box-Muller).
fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // gen() is in [0, 1); flip it so ln never sees zero
    let u1 = 1.0 - rng.gen::<f64>();
    let u2 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

/// Overlapping notes, each restarting its own decay envelope.
///
/// Note `i` spans `[n*i/k, n*(i+overlap)/k)` of the `n` samples, clipped to
/// the end of the clip.
fn arpeggio(t: &[f64], notes: &[f64], overlap: f64, decay: f64) -> Vec<f64> {
    let n = t.len();
    let k = notes.len() as f64;
    let mut audio = vec![0.0; n];

    for (i, &freq) in notes.iter().enumerate() {
        let start = (n as f64 * i as f64 / k) as usize;
        let end = ((n as f64 * (i as f64 + overlap) / k) as usize).min(n);
        if start >= end {
            continue;
        }
        let t0 = t[start];
        for (sample, &ts) in audio[start..end].iter_mut().zip(&t[start..end]) {
            let seg = ts - t0;
            *sample += (TAU * freq * seg).sin() * (-seg * decay).exp();
        }
    }
    audio
}

/// Convert to 16-bit, truncating toward zero and saturating at the rails.
#[inline]
fn to_i16(x: f64) -> i16 {
    x as i16
}

/// Scale an already bounded signal by `gain` of full scale.
fn scale(audio: &[f64], gain: f64) -> Vec<i16> {
    audio.iter().map(|&x| to_i16(x * FULL_SCALE * gain)).collect()
}

/// Normalize to the peak absolute value, then scale by `gain` of full scale.
///
/// A silent signal stays silent.
fn normalize(audio: &[f64], gain: f64) -> Vec<i16> {
    let peak = audio.iter().fold(0.0f64, |m, &x| m.max(x.abs()));
    if peak == 0.0 {
        return vec![0; audio.len()];
    }
    audio
        .iter()
        .map(|&x| to_i16(x / peak * FULL_SCALE * gain))
        .collect()
}


// ============================================================================
// Property-Based Tests
// ============================================================================

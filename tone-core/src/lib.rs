// tone-core/src/lib.rs

//! The core logic for the tone pitch analyzer.
//! This crate is responsible for decoding recorded tones, computing their
//! spectrum, estimating the fundamental frequency and naming the nearest
//! note. It is completely headless and contains no CLI code.

pub mod analysis;
pub mod audio;
pub mod error;
pub mod fft;
pub mod note;
pub mod peaks;
pub mod pitch;
pub mod spectrum;
pub mod tuning;

use serde::{Deserialize, Serialize};

pub use analysis::{analyze_audio, analyze_file};
pub use error::{Error, Result};
pub use note::{Note, Octave, PitchClass};
pub use spectrum::{DEFAULT_MIN_FREQUENCY, Spectrum};
pub use tuning::{Hz, frequency_to_note, standardize};

/// Tunable parameters of the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Lowest expected fundamental in Hz; also the minimum spacing between peaks.
    pub min_frequency: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_frequency: DEFAULT_MIN_FREQUENCY,
        }
    }
}

/// Represents the result of analyzing a single recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneReport {
    /// Source file, if the audio came from one.
    pub path: Option<String>,
    pub sample_rate: u32,
    /// Number of mono samples analyzed.
    pub num_samples: usize,
    /// Spectrum resolution in Hz.
    pub frequency_step: f64,
    /// The detected fundamental frequency in Hz (0.0 if none was found).
    pub fundamental_frequency: f64,
    /// The name of the nearest note, e.g. "A4".
    pub note: Option<String>,
    /// The deviation of the fundamental from the nearest note in cents.
    pub cents_deviation: Option<f64>,
    /// Magnitude of each harmonic (2nd, 3rd, ...) relative to the fundamental.
    pub harmonic_ratios: Vec<f64>,
}

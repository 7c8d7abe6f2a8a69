//! Error types shared by every module of the crate.

use thiserror::Error;

use crate::tuning::Hz;

/// Errors produced while naming notes, mapping frequencies or analyzing audio.
#[derive(Debug, Error)]
pub enum Error {
    /// Note name could not be normalized to one of the 12 canonical names.
    #[error("invalid note: \"{0}\"")]
    InvalidNote(String),

    /// Octave was not an integer or fell outside 0..=10.
    #[error("invalid octave: {0} (must be an integer between 0 and 10 inclusive)")]
    InvalidOctave(String),

    /// Text is not a plain decimal frequency.
    #[error("invalid frequency: \"{0}\"")]
    InvalidFrequency(String),

    /// Frequency lies outside the range covered by the frequency table.
    #[error("invalid frequency: {0} Hz is outside the supported range")]
    OutOfRange(f64),

    /// A standardized frequency had no exact entry in the table.
    #[error("did not find note for frequency: {0} Hz")]
    LookupFailed(Hz),

    #[error("spectrum index {index} out of range (spectrum has {len} bins)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Harmonic ratios were requested for a spectrum with no detectable fundamental.
    #[error("no fundamental frequency detected")]
    NoFundamental,

    #[error("sample rate must be positive")]
    InvalidSampleRate,

    #[error("channel count must be positive")]
    InvalidChannelCount,

    #[error("signal is too short to analyze ({0} samples)")]
    EmptySignal(usize),

    /// The WAV decoder rejected the input.
    #[error("failed to decode audio: {0}")]
    Decode(#[from] hound::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<std::convert::Infallible> for Error {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

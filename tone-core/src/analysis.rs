//! # Analysis Pipeline
//!
//! Ties decoding, spectral analysis and note mapping together into a single
//! [`ToneReport`] per recording.

use std::path::Path;

use log::{debug, info, warn};

use crate::audio::{self, DecodedAudio};
use crate::error::{Error, Result};
use crate::spectrum::Spectrum;
use crate::tuning::{calculate_cents_deviation, frequency_to_note};
use crate::{AnalysisConfig, ToneReport};

/// Analyzes decoded audio.
///
/// A tone whose fundamental cannot be found (or falls outside the note
/// table) still produces a report; its `note` is `None` and, without a
/// fundamental, its `harmonic_ratios` are empty.
///
/// # Errors
/// * Any error from [`Spectrum::from_interleaved`]
pub fn analyze_audio(audio: &DecodedAudio, config: &AnalysisConfig) -> Result<ToneReport> {
    let spectrum = Spectrum::from_interleaved(&audio.samples, audio.channels, audio.sample_rate)?;
    let fundamental = spectrum.fundamental_frequency(config.min_frequency);

    let note = match frequency_to_note(fundamental) {
        Ok(note) => Some(note),
        Err(Error::OutOfRange(freq)) => {
            warn!("No note for fundamental frequency {freq}Hz");
            None
        }
        Err(e) => return Err(e),
    };

    let harmonic_ratios = match spectrum.harmonic_ratios(config.min_frequency) {
        Ok(ratios) => ratios,
        Err(Error::NoFundamental) => Vec::new(),
        Err(e) => return Err(e),
    };

    Ok(ToneReport {
        path: None,
        sample_rate: spectrum.sample_rate(),
        num_samples: spectrum.num_samples(),
        frequency_step: spectrum.frequency_step(),
        fundamental_frequency: fundamental,
        note: note.map(|n| n.to_string()),
        cents_deviation: note
            .map(|n| calculate_cents_deviation(fundamental, n.frequency().to_f64())),
        harmonic_ratios,
    })
}

/// Decodes and analyzes the WAV file at `path`.
///
/// # Errors
/// * `Error::Decode` if the file cannot be read
/// * Any error from [`analyze_audio`]
pub fn analyze_file(path: impl AsRef<Path>, config: &AnalysisConfig) -> Result<ToneReport> {
    let path = path.as_ref();
    info!("Analyzing \"{}\"", path.display());

    let audio = audio::decode(path)?;
    debug!(
        "\t{} frame(s) of {} channel(s), {}s",
        audio.frames(),
        audio.channels,
        audio.duration_seconds()
    );
    let mut report = analyze_audio(&audio, config)?;
    report.path = Some(path.display().to_string());

    info!(
        "\"{}\": fundamental {}Hz ({})",
        path.display(),
        report.fundamental_frequency,
        report.note.as_deref().unwrap_or("no note")
    );
    Ok(report)
}

//! # Spectrum Module
//!
//! A [`Spectrum`] is the one-sided magnitude spectrum of a single recorded
//! tone. It locates the tone's fundamental frequency and measures how
//! strong each harmonic is relative to it.

use log::debug;
use once_cell::unsync::OnceCell;

use crate::error::{Error, Result};
use crate::fft;
use crate::peaks::{self, Peak};
use crate::pitch;

/// Default lower bound for the fundamental, which also sets the minimum
/// spacing between detected peaks.
pub const DEFAULT_MIN_FREQUENCY: f64 = 150.0;

/// Minimum peak prominence, as a percentage of the spectrum's magnitude range.
pub const PROMINENCE_PERCENT: f64 = 5.0;

/// Spectral analysis of one mono audio sample.
#[derive(Debug)]
pub struct Spectrum {
    sample_rate: u32,
    num_samples: usize,
    freq_step: f64,
    magnitudes: Vec<f64>,
    fundamental: OnceCell<f64>,
}

impl Spectrum {
    /// Analyzes a mono signal.
    ///
    /// # Errors
    /// * `Error::InvalidSampleRate` if `sample_rate` is 0
    /// * `Error::EmptySignal` if there are fewer than 2 samples
    pub fn new(samples: &[f32], sample_rate: u32) -> Result<Spectrum> {
        if sample_rate == 0 {
            return Err(Error::InvalidSampleRate);
        }
        if samples.len() < 2 {
            return Err(Error::EmptySignal(samples.len()));
        }

        let num_samples = samples.len();
        let freq_step = sample_rate as f64 / num_samples as f64;
        debug!("\tSample rate: {sample_rate}");
        debug!("\tNumber of samples: {num_samples}");
        debug!("\tTotal track length: {}s", num_samples as f64 / sample_rate as f64);
        debug!("\tFrequency step: {freq_step}Hz / sample");

        debug!("Analyzing signal spectrum");
        let magnitudes = fft::spectrum_to_magnitudes(&fft::perform_fft(samples));

        let spectrum = Spectrum {
            sample_rate,
            num_samples,
            freq_step,
            magnitudes,
            fundamental: OnceCell::new(),
        };
        debug!(
            "\tHighest frequency: {}Hz",
            spectrum.bin_frequency(spectrum.len() - 1)
        );
        Ok(spectrum)
    }

    /// Analyzes interleaved multi-channel audio after averaging it to mono.
    ///
    /// # Errors
    /// * `Error::InvalidChannelCount` if `channels` is 0
    /// * Any error from [`Spectrum::new`]
    pub fn from_interleaved(samples: &[f32], channels: usize, sample_rate: u32) -> Result<Spectrum> {
        if channels == 0 {
            return Err(Error::InvalidChannelCount);
        }
        if channels > 1 {
            debug!("\tConverting {channels} channels to mono");
        }
        Spectrum::new(&fft::downmix_to_mono(samples, channels), sample_rate)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of mono samples that were transformed.
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Frequency resolution in Hz: sample rate divided by the sample count.
    pub fn frequency_step(&self) -> f64 {
        self.freq_step
    }

    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    /// Number of retained bins (half the sample count, rounded down).
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    fn bin_frequency(&self, index: usize) -> f64 {
        index as f64 * self.sample_rate as f64 / (2 * self.magnitudes.len()) as f64
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.magnitudes.len() {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index,
                len: self.magnitudes.len(),
            })
        }
    }

    /// Frequency in Hz represented by bin `index`.
    ///
    /// # Errors
    /// * `Error::IndexOutOfRange` if `index >= self.len()`
    pub fn frequency_at(&self, index: usize) -> Result<f64> {
        self.check_index(index)?;
        Ok(self.bin_frequency(index))
    }

    /// Magnitude of bin `index`.
    ///
    /// # Errors
    /// * `Error::IndexOutOfRange` if `index >= self.len()`
    pub fn magnitude_at(&self, index: usize) -> Result<f64> {
        self.check_index(index)?;
        Ok(self.magnitudes[index])
    }

    /// Finds the prominent peaks of the spectrum, lowest frequency first.
    ///
    /// Peaks must be at least `min_freq` apart and rise at least 5% of the
    /// spectrum's magnitude range above their surroundings.
    pub fn peaks(&self, min_freq: f64) -> Vec<Peak> {
        let min_peak_distance = min_freq / self.freq_step;

        let (min_mag, max_mag) = self
            .magnitudes
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &mag| {
                (lo.min(mag), hi.max(mag))
            });
        let prominence = (max_mag - min_mag) * PROMINENCE_PERCENT / 100.0;

        peaks::find_peaks(&self.magnitudes, min_peak_distance, prominence)
            .into_iter()
            .map(|index| Peak {
                index,
                frequency: self.bin_frequency(index),
                magnitude: self.magnitudes[index],
            })
            .collect()
    }

    /// Estimates the fundamental frequency of the tone.
    ///
    /// The first call computes the value and caches it. Every later call
    /// returns the cached value and **ignores `min_freq`**, so analyzing with
    /// a different minimum requires a fresh `Spectrum`.
    ///
    /// # Returns
    /// * The peak frequency with the most harmonics, or 0.0 if none was found
    pub fn fundamental_frequency(&self, min_freq: f64) -> f64 {
        *self.fundamental.get_or_init(|| {
            debug!("Determining fundamental frequency");
            debug!("\tUsing minimum frequency distance of {min_freq}Hz");

            let peaks = self.peaks(min_freq);
            debug!("\tFound {} peaks", peaks.len());
            for peak in &peaks {
                debug!("\t\t{}Hz: {}", peak.frequency, peak.magnitude);
            }

            let peak_freqs: Vec<f64> = peaks.iter().map(|p| p.frequency).collect();

            let fundamental = pitch::select_fundamental(&peak_freqs);
            debug!("\tFundamental frequency: {fundamental}Hz");
            fundamental
        })
    }

    /// Ratios of each harmonic's magnitude to the fundamental's magnitude.
    ///
    /// Harmonics 2, 3, ... are measured up to the highest frequency in the
    /// spectrum. Each harmonic's magnitude is the maximum within a window of
    /// a tenth of the fundamental (in bins) on either side of its expected
    /// bin, which tolerates slightly sharp or flat overtones.
    ///
    /// # Errors
    /// * `Error::NoFundamental` if the fundamental frequency is 0
    /// * `Error::IndexOutOfRange` if the fundamental's bin is past the spectrum
    pub fn harmonic_ratios(&self, min_freq: f64) -> Result<Vec<f64>> {
        let fund_freq = self.fundamental_frequency(min_freq);
        if fund_freq <= 0.0 {
            return Err(Error::NoFundamental);
        }

        let half_width = (fund_freq / self.freq_step).floor() as usize / 10;
        let last = self.magnitudes.len() - 1;
        let max_freq = self.bin_frequency(last);

        let mut harmonic_mags = Vec::new();
        let mut multiple = 2.0;
        loop {
            let freq = multiple * fund_freq;
            if freq >= max_freq {
                break;
            }

            let center = (freq / self.freq_step).floor() as usize;
            let start = center.saturating_sub(half_width).min(last);
            let end = (center + half_width).min(last);
            let mag = self.magnitudes[start..=end]
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            harmonic_mags.push(mag);

            multiple += 1.0;
        }

        let fund_index = (fund_freq / self.freq_step).floor() as usize;
        let fund_mag = self.magnitude_at(fund_index)?;
        debug!(
            "\tMeasured {} harmonics against a fundamental magnitude of {fund_mag}",
            harmonic_mags.len()
        );

        Ok(harmonic_mags.into_iter().map(|mag| mag / fund_mag).collect())
    }
}

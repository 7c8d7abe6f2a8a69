//! # Fast Fourier Transform (FFT) Module
//!
//! This module turns a mono signal into a one-sided magnitude spectrum.
//!
//! ## Features
//! - Arbitrary-length forward DFT using RustFFT
//! - Nyquist trimming of the mirrored upper half
//! - Amplitude-scaled magnitudes (a unit sine yields a peak of 1.0)

use rustfft::{FftPlanner, num_complex::Complex};

/// Averages interleaved multi-channel frames into a single mono track.
///
/// A trailing partial frame is ignored.
pub fn downmix_to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Performs a forward FFT on a signal and returns the complex spectrum.
///
/// The transform length equals the signal length; no windowing or
/// zero-padding is applied.
pub fn perform_fft(signal: &[f32]) -> Vec<Complex<f64>> {
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(signal.len());

    let mut buffer: Vec<Complex<f64>> = signal
        .iter()
        .map(|&sample| Complex {
            re: sample as f64,
            im: 0.0,
        })
        .collect();

    fft.process(&mut buffer);
    buffer
}

/// Calculates the one-sided magnitude spectrum from a complex spectrum.
///
/// Only the first `N / 2` bins are kept, where `N` is the transform length;
/// the upper half mirrors them for real input. Each magnitude is doubled to
/// account for the discarded half and divided by `N` to undo the transform
/// scaling.
pub fn spectrum_to_magnitudes(spectrum: &[Complex<f64>]) -> Vec<f64> {
    let n = spectrum.len() as f64;
    spectrum
        .iter()
        .take(spectrum.len() / 2)
        .map(|c| 2.0 * c.norm() / n) // .norm() is sqrt(re^2 + im^2)
        .collect()
}

//! # Pitch Detection Module
//!
//! Chooses the fundamental frequency among a set of spectral peaks by
//! counting harmonics. The peak that has the most higher peaks sitting near
//! an integer multiple of it is taken as the fundamental.

/// Largest deviation from a perfect multiple, in whole percent of the base
/// frequency, that still counts as a harmonic.
pub const HARMONIC_TOLERANCE_PERCENT: f64 = 3.0;

/// Returns true if `freq` lies within 3% of an integer multiple of `base`.
///
/// The remainder is folded toward the nearest multiple and truncated to a
/// whole percentage of `base` before the comparison.
pub fn is_near_harmonic(freq: f64, base: f64) -> bool {
    if base <= 0.0 {
        return false;
    }
    let mut remainder = freq % base;
    if remainder > base / 2.0 {
        remainder = base - remainder;
    }
    (remainder * 100.0 / base).floor() < HARMONIC_TOLERANCE_PERCENT
}

/// Counts how many of `higher` are near-harmonics of `base`.
pub fn count_harmonics(base: f64, higher: &[f64]) -> usize {
    higher
        .iter()
        .filter(|&&freq| is_near_harmonic(freq, base))
        .count()
}

/// Picks the fundamental from peak frequencies sorted in ascending order.
///
/// Each peak is scored by the number of later peaks that are near-harmonics
/// of it. The strictly highest score wins, so ties keep the lower frequency.
///
/// # Returns
/// * The winning frequency, or 0.0 if there are no peaks or no peak has a harmonic
pub fn select_fundamental(peak_freqs: &[f64]) -> f64 {
    let mut best_count = 0;
    let mut fundamental = 0.0;

    for (i, &freq) in peak_freqs.iter().enumerate() {
        let count = count_harmonics(freq, &peak_freqs[i + 1..]);
        if count > best_count {
            best_count = count;
            fundamental = freq;
        }
    }

    fundamental
}

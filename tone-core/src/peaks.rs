//! # Peak Detection Module
//!
//! Finds prominent local maxima in a magnitude spectrum. Peaks are filtered
//! first by a minimum horizontal distance (taller peaks win) and then by a
//! minimum prominence.

/// A detected spectral peak.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Bin index in the magnitude spectrum.
    pub index: usize,
    /// Frequency of the bin in Hz.
    pub frequency: f64,
    pub magnitude: f64,
}

/// Finds every local maximum of `data`.
///
/// Endpoints are never peaks. A flat top counts once, at the middle of the
/// plateau (rounded down).
fn local_maxima(data: &[f64]) -> Vec<usize> {
    let mut maxima = Vec::new();
    if data.len() < 3 {
        return maxima;
    }

    let last = data.len() - 1;
    let mut i = 1;
    while i < last {
        if data[i - 1] < data[i] {
            let mut ahead = i + 1;
            while ahead < last && data[ahead] == data[i] {
                ahead += 1;
            }
            if data[ahead] < data[i] {
                let right_edge = ahead - 1;
                maxima.push((i + right_edge) / 2);
                i = ahead;
            }
        }
        i += 1;
    }

    maxima
}

/// Drops peaks closer than `distance` bins to a taller peak.
///
/// Peaks are visited from tallest to shortest; each kept peak removes its
/// lower neighbours within the distance.
fn select_by_distance(data: &[f64], peaks: &[usize], distance: f64) -> Vec<usize> {
    let distance = distance.ceil().max(1.0) as usize;
    let mut keep = vec![true; peaks.len()];

    let mut by_height: Vec<usize> = (0..peaks.len()).collect();
    by_height.sort_by(|&a, &b| data[peaks[a]].total_cmp(&data[peaks[b]]));

    for &i in by_height.iter().rev() {
        if !keep[i] {
            continue;
        }

        let mut j = i;
        while j > 0 && peaks[i] - peaks[j - 1] < distance {
            keep[j - 1] = false;
            j -= 1;
        }

        let mut j = i + 1;
        while j < peaks.len() && peaks[j] - peaks[i] < distance {
            keep[j] = false;
            j += 1;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&peak, kept)| kept.then_some(peak))
        .collect()
}

/// Vertical distance between a peak and its highest reference base.
///
/// On each side the signal is walked outward until a sample taller than the
/// peak or the boundary is reached; the lowest point seen is that side's
/// base. The higher of the two bases is the reference.
pub fn prominence(data: &[f64], peak: usize) -> f64 {
    let height = data[peak];

    let left_base = data[..=peak]
        .iter()
        .rev()
        .take_while(|&&value| value <= height)
        .copied()
        .fold(height, f64::min);

    let right_base = data[peak..]
        .iter()
        .take_while(|&&value| value <= height)
        .copied()
        .fold(height, f64::min);

    height - left_base.max(right_base)
}

/// Finds the indices of prominent peaks in ascending order.
///
/// # Arguments
/// * `data` - Signal to search, typically a magnitude spectrum
/// * `distance` - Minimum horizontal distance in samples between peaks (at least 1)
/// * `min_prominence` - Minimum prominence a peak must have
pub fn find_peaks(data: &[f64], distance: f64, min_prominence: f64) -> Vec<usize> {
    let maxima = local_maxima(data);
    let spaced = select_by_distance(data, &maxima, distance);
    spaced
        .into_iter()
        .filter(|&peak| prominence(data, peak) >= min_prominence)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_maxima() {
        let data = [0.0, 1.0, 0.0, 2.0, 2.0, 2.0, 1.0, 3.0, 3.0, 0.0, 5.0];
        assert_eq!(local_maxima(&data), vec![1, 4, 7]);
    }

    #[test]
    fn test_plateau_touching_the_end_is_not_a_peak() {
        let data = [0.0, 1.0, 1.0, 1.0];
        assert!(local_maxima(&data).is_empty());
    }

    #[test]
    fn test_short_input() {
        assert!(find_peaks(&[], 1.0, 0.0).is_empty());
        assert!(find_peaks(&[1.0, 2.0], 1.0, 0.0).is_empty());
    }

    #[test]
    fn test_distance_keeps_taller_peak() {
        let data = [0.0, 1.0, 0.0, 3.0, 0.0, 2.0, 0.0, 0.0, 0.0, 1.5, 0.0];
        assert_eq!(find_peaks(&data, 1.0, 0.0), vec![1, 3, 5, 9]);
        assert_eq!(find_peaks(&data, 3.0, 0.0), vec![3, 9]);
        assert_eq!(find_peaks(&data, 2.5, 0.0), vec![3, 9]);
    }

    #[test]
    fn test_prominence() {
        let data = [0.0, 4.0, 1.0, 3.0, 2.0, 5.0, 0.0];
        // The right base stops at 5.0, so the lowest point seen there is 1.0.
        assert_eq!(prominence(&data, 1), 3.0);
        // Bases are 1.0 on the left (before 4.0) and 2.0 on the right (before 5.0).
        assert_eq!(prominence(&data, 3), 1.0);
        assert_eq!(prominence(&data, 5), 5.0);
        assert_eq!(find_peaks(&data, 1.0, 2.0), vec![1, 5]);
    }

    #[test]
    fn test_ripple_on_a_slope_is_not_prominent() {
        let data = [0.0, 1.0, 2.0, 2.1, 2.05, 3.0, 4.0, 0.0];
        assert_eq!(find_peaks(&data, 1.0, 0.0), vec![3, 6]);
        assert_eq!(find_peaks(&data, 1.0, 0.5), vec![6]);
    }
}

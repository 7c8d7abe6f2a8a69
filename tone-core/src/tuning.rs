//! # Musical Tuning Module
//!
//! This module holds the reference frequencies of the 12-tone equal-tempered
//! scale (A4 = 440 Hz) for octaves 0 through 10 and maps arbitrary
//! frequencies onto them.
//!
//! ## Features
//! - Fixed-precision [`Hz`] values so table constants print and compare exactly
//! - 132-entry reference table (C0 to B10)
//! - Frequency standardization with a closest-match scan
//! - Frequency to note lookup
//! - Cent deviation calculations

use std::fmt;
use std::ops::{Add, Mul};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::note::{Note, PitchClass};

/// Number of fractional decimal digits carried by [`Hz`].
const SCALE_DIGITS: u32 = 5;
const SCALE: u64 = 10_u64.pow(SCALE_DIGITS);

/// Significant digits kept by arithmetic on [`Hz`] values.
pub const PRECISION: u32 = 7;

/// A non-negative frequency stored as a scaled integer (1 unit = 0.00001 Hz).
///
/// Reference frequencies are tabulated with 7 significant digits. Keeping
/// them as integers means a standardized frequency is always bit-for-bit one
/// of the table constants, and printing it reproduces the tabulated digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hz(u64);

/// Parses a decimal literal such as `"16.35160"` into scaled units.
///
/// Returns `None` if the text is empty, contains anything other than digits
/// and a single decimal point, has more than 5 fractional digits or overflows.
const fn parse_scaled(text: &str) -> Option<u64> {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return None;
    }

    let mut scaled: u64 = 0;
    let mut has_digit = false;
    let mut fraction_digits: i32 = -1;
    let mut i = 0;
    while i < bytes.len() {
        let byte = bytes[i];
        if byte == b'.' {
            if fraction_digits >= 0 {
                return None;
            }
            fraction_digits = 0;
        } else {
            if !byte.is_ascii_digit() || fraction_digits >= SCALE_DIGITS as i32 {
                return None;
            }
            scaled = match scaled.checked_mul(10) {
                Some(value) => match value.checked_add((byte - b'0') as u64) {
                    Some(value) => value,
                    None => return None,
                },
                None => return None,
            };
            has_digit = true;
            if fraction_digits >= 0 {
                fraction_digits += 1;
            }
        }
        i += 1;
    }
    if !has_digit {
        return None;
    }

    let mut digits = if fraction_digits < 0 { 0 } else { fraction_digits };
    while digits < SCALE_DIGITS as i32 {
        scaled = match scaled.checked_mul(10) {
            Some(value) => value,
            None => return None,
        };
        digits += 1;
    }
    Some(scaled)
}

impl Hz {
    pub const fn scaled(self) -> u64 {
        self.0
    }

    /// Converts a float, truncating toward zero to [`PRECISION`] significant digits.
    ///
    /// Returns `None` for negative or non-finite input.
    pub fn from_f64(value: f64) -> Option<Hz> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let scaled = (value * SCALE as f64).floor();
        if scaled >= u64::MAX as f64 {
            return None;
        }
        Some(Hz(scaled as u64).floor_to_precision())
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / SCALE as f64
    }

    /// Drops every digit past the 7th significant one (floor rounding).
    pub fn floor_to_precision(self) -> Hz {
        let available = self.integer_digits() + SCALE_DIGITS;
        let step = 10_u64.pow(available.saturating_sub(PRECISION));
        Hz(self.0 / step * step)
    }

    /// `self / other * 100`, rounded to the nearest integer (halves round up).
    pub fn percent_of(self, other: Hz) -> u64 {
        if other.0 == 0 {
            return u64::MAX;
        }
        let numerator = self.0 as u128 * 200 + other.0 as u128;
        (numerator / (2 * other.0 as u128)) as u64
    }

    fn integer_digits(self) -> u32 {
        let whole = self.0 / SCALE;
        if whole == 0 { 1 } else { whole.ilog10() + 1 }
    }

    /// Number of fractional digits shown when printing 7 significant digits.
    fn display_decimals(self) -> u32 {
        PRECISION.saturating_sub(self.integer_digits()).min(SCALE_DIGITS)
    }
}

impl fmt::Display for Hz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decimals = self.display_decimals();
        let whole = self.0 / SCALE;
        if decimals == 0 {
            return write!(f, "{whole}");
        }
        let fraction = (self.0 % SCALE) / 10_u64.pow(SCALE_DIGITS - decimals);
        write!(f, "{whole}.{fraction:0width$}", width = decimals as usize)
    }
}

impl From<Hz> for f64 {
    fn from(value: Hz) -> f64 {
        value.to_f64()
    }
}

impl Add for Hz {
    type Output = Hz;

    fn add(self, rhs: Hz) -> Hz {
        Hz(self.0 + rhs.0)
    }
}

impl Mul<u64> for Hz {
    type Output = Hz;

    fn mul(self, rhs: u64) -> Hz {
        Hz(self.0 * rhs)
    }
}

impl FromStr for Hz {
    type Err = Error;

    /// Parses a plain decimal such as `"523.2511"`.
    fn from_str(text: &str) -> Result<Self> {
        parse_scaled(text.trim())
            .map(Hz)
            .ok_or_else(|| Error::InvalidFrequency(text.to_string()))
    }
}

/// Table literals; malformed text fails the build.
const fn hz(text: &str) -> Hz {
    match parse_scaled(text) {
        Some(scaled) => Hz(scaled),
        None => panic!("invalid frequency literal"),
    }
}

/// A4, the tuning reference.
pub const CONCERT_A: Hz = hz("440.0000");
/// C4.
pub const MIDDLE_C: Hz = hz("261.6256");
/// C0, the lowest note in the table.
pub const LOWEST_NOTE: Hz = hz("16.35160");
/// B10, the highest note in the table.
pub const HIGHEST_NOTE: Hz = hz("31608.50");

pub const OCTAVE_COUNT: usize = 11;

/// Reference frequencies indexed by `[PitchClass::index()][octave]`.
pub const FREQ_TABLE: [[Hz; OCTAVE_COUNT]; 12] = [
    //    octave 0          octave 1          octave 2          octave 3          octave 4          octave 5          octave 6          octave 7          octave 8          octave 9          octave 10
    [hz("16.35160"), hz("32.70320"), hz("65.40639"), hz("130.8128"), hz("261.6256"), hz("523.2511"), hz("1046.502"), hz("2093.005"), hz("4186.009"), hz("8372.018"), hz("16744.04")], // C
    [hz("17.32391"), hz("34.64783"), hz("69.29566"), hz("138.5913"), hz("277.1826"), hz("554.3653"), hz("1108.731"), hz("2217.461"), hz("4434.922"), hz("8869.844"), hz("17739.69")], // C♯
    [hz("18.35405"), hz("36.70810"), hz("73.41619"), hz("146.8324"), hz("293.6648"), hz("587.3295"), hz("1174.659"), hz("2349.318"), hz("4698.636"), hz("9397.273"), hz("18794.55")], // D
    [hz("19.44544"), hz("38.89087"), hz("77.78175"), hz("155.5635"), hz("311.1270"), hz("622.2540"), hz("1244.508"), hz("2489.016"), hz("4978.032"), hz("9956.063"), hz("19912.13")], // D♯
    [hz("20.60172"), hz("41.20344"), hz("82.40689"), hz("164.8138"), hz("329.6276"), hz("659.2551"), hz("1318.510"), hz("2637.020"), hz("5274.041"), hz("10548.08"), hz("21096.16")], // E
    [hz("21.82676"), hz("43.65353"), hz("87.30706"), hz("174.6141"), hz("349.2282"), hz("698.4565"), hz("1396.913"), hz("2793.826"), hz("5587.652"), hz("11175.30"), hz("22350.61")], // F
    [hz("23.12465"), hz("46.24930"), hz("92.49861"), hz("184.9972"), hz("369.9944"), hz("739.9888"), hz("1479.978"), hz("2959.955"), hz("5919.911"), hz("11839.82"), hz("23679.64")], // F♯
    [hz("24.49971"), hz("48.99943"), hz("97.99886"), hz("195.9977"), hz("391.9954"), hz("783.9909"), hz("1567.982"), hz("3135.963"), hz("6271.927"), hz("12543.85"), hz("25087.71")], // G
    [hz("25.95654"), hz("51.91309"), hz("103.8262"), hz("207.6523"), hz("415.3047"), hz("830.6094"), hz("1661.219"), hz("3322.438"), hz("6644.875"), hz("13289.75"), hz("26579.50")], // G♯
    [hz("27.50000"), hz("55.00000"), hz("110.0000"), hz("220.0000"), hz("440.0000"), hz("880.0000"), hz("1760.000"), hz("3520.000"), hz("7040.000"), hz("14080.00"), hz("28160.00")], // A
    [hz("29.13524"), hz("58.27047"), hz("116.5409"), hz("233.0819"), hz("466.1638"), hz("932.3275"), hz("1864.655"), hz("3729.310"), hz("7458.620"), hz("14917.24"), hz("29834.48")], // A♯
    [hz("30.86771"), hz("61.73541"), hz("123.4708"), hz("246.9417"), hz("493.8833"), hz("987.7666"), hz("1975.533"), hz("3951.066"), hz("7902.133"), hz("15804.27"), hz("31608.50")], // B
];

/// Iterates the table in canonical scan order: by pitch class, then ascending octave.
pub fn table_entries() -> impl Iterator<Item = (PitchClass, u8, Hz)> {
    PitchClass::ALL.into_iter().flat_map(|pitch| {
        FREQ_TABLE[pitch.index()]
            .into_iter()
            .enumerate()
            .map(move |(octave, freq)| (pitch, octave as u8, freq))
    })
}

/// Rounds to the nearest integer, sending exact halves toward negative infinity.
fn round_half_down(value: f64) -> f64 {
    (value - 0.5).ceil()
}

/// Snaps a frequency to the closest reference frequency in the table.
///
/// The frequency is first quantized to a whole number of semitones from
/// middle C. The candidate rebuilt from that count is then compared with
/// every table entry by percentage, so the returned value is always one of
/// the table constants.
///
/// # Errors
/// * `Error::OutOfRange` if the frequency is below C0 or above B10
pub fn standardize(frequency: f64) -> Result<Hz> {
    if !(LOWEST_NOTE.to_f64()..=HIGHEST_NOTE.to_f64()).contains(&frequency) {
        return Err(Error::OutOfRange(frequency));
    }

    let middle_c = MIDDLE_C.to_f64();
    let semitones = round_half_down(12.0 * (frequency / middle_c).log2());
    let candidate = Hz::from_f64(middle_c * 2.0_f64.powf(semitones / 12.0))
        .ok_or(Error::OutOfRange(frequency))?;

    let mut best: Option<(u64, Hz)> = None;
    for (_, _, table_freq) in table_entries() {
        let deviation = candidate.percent_of(table_freq).abs_diff(100);
        if best.is_none_or(|(closest, _)| deviation < closest) {
            best = Some((deviation, table_freq));
        }
    }

    best.map(|(_, freq)| freq).ok_or(Error::LookupFailed(candidate))
}

/// Returns the note whose reference frequency is closest to `frequency`.
///
/// # Errors
/// * `Error::OutOfRange` if the frequency is outside C0..=B10
/// * `Error::LookupFailed` if the standardized value has no table entry
pub fn frequency_to_note(frequency: f64) -> Result<Note> {
    let standard = standardize(frequency)?;
    Note::all()
        .iter()
        .copied()
        .find(|note| note.frequency() == standard)
        .ok_or(Error::LookupFailed(standard))
}

/// Calculates the deviation from a target frequency in cents.
///
/// Positive values are sharp, negative values flat.
pub fn calculate_cents_deviation(freq: f64, target_freq: f64) -> f64 {
    1200.0 * (freq / target_freq).log2()
}

//! # Note Model
//!
//! Notes on the 12-tone scale, named with sharps only (`C♯`, never `D♭`),
//! in octaves 0 through 10. Flat and natural spellings are accepted on
//! input and normalized to the canonical sharp names.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::error::{Error, Result};
use crate::tuning::{FREQ_TABLE, HIGHEST_NOTE, Hz, OCTAVE_COUNT};

pub const SHARP_SYMBOL: char = '♯';
pub const SHARP_SYMBOL_ALT: char = '#';
pub const FLAT_SYMBOL: char = '♭';
pub const FLAT_SYMBOL_ALT: char = 'b';
pub const NATURAL_SYMBOL: char = '♮';

/// The 12 canonical note names, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

/// Flat spellings that have a sharp equivalent in the table.
///
/// C♭ and F♭ are intentionally absent, so those spellings are rejected.
const FLAT_TO_SHARP: [(PitchClass, PitchClass); 5] = [
    (PitchClass::D, PitchClass::CSharp),
    (PitchClass::E, PitchClass::DSharp),
    (PitchClass::G, PitchClass::FSharp),
    (PitchClass::A, PitchClass::GSharp),
    (PitchClass::B, PitchClass::ASharp),
];

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Row of this pitch class in the frequency table.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C♯",
            PitchClass::D => "D",
            PitchClass::DSharp => "D♯",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F♯",
            PitchClass::G => "G",
            PitchClass::GSharp => "G♯",
            PitchClass::A => "A",
            PitchClass::ASharp => "A♯",
            PitchClass::B => "B",
        }
    }

    fn from_letter(letter: char) -> Option<PitchClass> {
        match letter {
            'C' => Some(PitchClass::C),
            'D' => Some(PitchClass::D),
            'E' => Some(PitchClass::E),
            'F' => Some(PitchClass::F),
            'G' => Some(PitchClass::G),
            'A' => Some(PitchClass::A),
            'B' => Some(PitchClass::B),
            _ => None,
        }
    }

    fn sharpened(self) -> Option<PitchClass> {
        match self {
            PitchClass::C => Some(PitchClass::CSharp),
            PitchClass::D => Some(PitchClass::DSharp),
            PitchClass::F => Some(PitchClass::FSharp),
            PitchClass::G => Some(PitchClass::GSharp),
            PitchClass::A => Some(PitchClass::ASharp),
            _ => None,
        }
    }

    fn flattened(self) -> Option<PitchClass> {
        FLAT_TO_SHARP
            .iter()
            .find(|(natural, _)| *natural == self)
            .map(|&(_, sharp)| sharp)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accidental {
    Sharp,
    Flat,
    Natural,
}

impl Accidental {
    fn from_symbol(symbol: char) -> Option<Accidental> {
        match symbol {
            SHARP_SYMBOL | SHARP_SYMBOL_ALT => Some(Accidental::Sharp),
            FLAT_SYMBOL | FLAT_SYMBOL_ALT => Some(Accidental::Flat),
            NATURAL_SYMBOL => Some(Accidental::Natural),
            _ => None,
        }
    }
}

impl FromStr for PitchClass {
    type Err = Error;

    /// Normalizes a spelling such as `"Db"`, `"C#"` or `"G♮"` to its canonical name.
    fn from_str(name: &str) -> Result<Self> {
        let invalid = || Error::InvalidNote(name.to_string());

        let mut chars = name.chars();
        let natural = chars
            .next()
            .and_then(PitchClass::from_letter)
            .ok_or_else(invalid)?;
        let accidental = match chars.next() {
            Some(symbol) => Some(Accidental::from_symbol(symbol).ok_or_else(invalid)?),
            None => None,
        };
        if chars.next().is_some() {
            return Err(invalid());
        }

        match accidental {
            None | Some(Accidental::Natural) => Ok(natural),
            Some(Accidental::Sharp) => natural.sharpened().ok_or_else(invalid),
            Some(Accidental::Flat) => natural.flattened().ok_or_else(invalid),
        }
    }
}

/// An octave number between 0 and 10 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Octave(u8);

impl Octave {
    pub const MIN: Octave = Octave(0);
    pub const MAX: Octave = Octave(OCTAVE_COUNT as u8 - 1);

    pub fn new(value: i64) -> Result<Octave> {
        if (Self::MIN.0 as i64..=Self::MAX.0 as i64).contains(&value) {
            Ok(Octave(value as u8))
        } else {
            Err(Error::InvalidOctave(value.to_string()))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Octave> {
        (Self::MIN.0..=Self::MAX.0).map(Octave)
    }
}

impl fmt::Display for Octave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! octave_from_int {
    ($($int:ty),*) => {
        $(
            impl TryFrom<$int> for Octave {
                type Error = Error;

                fn try_from(value: $int) -> Result<Self> {
                    i64::try_from(value)
                        .map_err(|_| Error::InvalidOctave(value.to_string()))
                        .and_then(Octave::new)
                }
            }
        )*
    };
}

octave_from_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Fractional octaves are truncated toward zero (3.3 becomes 3).
impl TryFrom<f64> for Octave {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::InvalidOctave(value.to_string()));
        }
        Octave::new(value.trunc() as i64)
    }
}

impl TryFrom<f32> for Octave {
    type Error = Error;

    fn try_from(value: f32) -> Result<Self> {
        Octave::try_from(value as f64)
    }
}

impl TryFrom<&str> for Octave {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        value
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::InvalidOctave(format!("\"{value}\"")))
            .and_then(Octave::new)
    }
}

impl TryFrom<String> for Octave {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Octave::try_from(value.as_str())
    }
}

/// A note on the standard 12-note scale within octaves 0 to 10.
///
/// The string form joins the name and the octave, e.g. `F♯3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    pitch: PitchClass,
    octave: Octave,
}

/// All 132 notes in table scan order (C0..C10, C♯0..C♯10, ... B10).
static ALL_NOTES: Lazy<Vec<Note>> = Lazy::new(|| {
    PitchClass::ALL
        .into_iter()
        .flat_map(|pitch| Octave::all().map(move |octave| Note::from_parts(pitch, octave)))
        .collect()
});

impl Note {
    /// Creates a note from a spelling and anything convertible to an [`Octave`].
    ///
    /// # Errors
    /// * `Error::InvalidNote` if the name cannot be normalized to a canonical name
    /// * `Error::InvalidOctave` if the octave is not an integer in 0..=10
    pub fn new<O>(name: &str, octave: O) -> Result<Note>
    where
        O: TryInto<Octave>,
        Error: From<O::Error>,
    {
        let pitch = name.parse::<PitchClass>()?;
        let octave = octave.try_into()?;
        Ok(Note { pitch, octave })
    }

    pub const fn from_parts(pitch: PitchClass, octave: Octave) -> Note {
        Note { pitch, octave }
    }

    pub fn all() -> &'static [Note] {
        &ALL_NOTES
    }

    pub const fn pitch(&self) -> PitchClass {
        self.pitch
    }

    pub const fn octave(&self) -> Octave {
        self.octave
    }

    /// Canonical name without the octave, e.g. `"C♯"`.
    pub const fn name(&self) -> &'static str {
        self.pitch.name()
    }

    /// Reference frequency taken verbatim from the table.
    pub const fn frequency(&self) -> Hz {
        FREQ_TABLE[self.pitch.index()][self.octave.0 as usize]
    }

    /// Harmonic frequencies of this note, lowest first, excluding the note itself.
    ///
    /// Starts at twice the fundamental and steps by the fundamental while the
    /// value stays below B10. Every step is truncated to 7 significant digits.
    pub fn harmonics(&self) -> Vec<Hz> {
        let fundamental = self.frequency();
        let mut harmonics = Vec::new();

        let mut freq = (fundamental * 2).floor_to_precision();
        while freq < HIGHEST_NOTE {
            harmonics.push(freq);
            freq = (freq + fundamental).floor_to_precision();
        }

        harmonics
    }

    /// The same pitch class in every higher octave, up to octave 10.
    pub fn octave_series(&self) -> Vec<Note> {
        Octave::all()
            .filter(|octave| *octave > self.octave)
            .map(|octave| Note::from_parts(self.pitch, octave))
            .collect()
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch, self.octave)
    }
}

impl FromStr for Note {
    type Err = Error;

    /// Parses text like `"A4"`, `"C#10"`, `"Bb3"` or `"E♮0"`.
    fn from_str(text: &str) -> Result<Self> {
        let invalid = || Error::InvalidNote(text.to_string());

        let mut chars = text.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        if PitchClass::from_letter(letter).is_none() {
            return Err(invalid());
        }

        let mut name_len = letter.len_utf8();
        if let Some(symbol) = chars.next().filter(|c| Accidental::from_symbol(*c).is_some()) {
            name_len += symbol.len_utf8();
        }

        let (name, octave) = text.split_at(name_len);
        let octave_is_valid =
            octave == "10" || (octave.len() == 1 && octave.as_bytes()[0].is_ascii_digit());
        if !octave_is_valid {
            return Err(invalid());
        }

        Note::new(name, octave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols() {
        assert_eq!(PitchClass::ALL.len(), 12);
        let names: Vec<&str> = PitchClass::ALL.iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            ["C", "C♯", "D", "D♯", "E", "F", "F♯", "G", "G♯", "A", "A♯", "B"]
        );
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "C♯NNN", "Dc5", "bogus", "c", "H", "E♯", "B#", "C♯♯"] {
            assert!(
                matches!(Note::new(name, 1), Err(Error::InvalidNote(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_octaves() {
        assert!(matches!(Note::new("C", -1), Err(Error::InvalidOctave(_))));
        assert!(matches!(Note::new("C", 11), Err(Error::InvalidOctave(_))));
        assert!(matches!(Note::new("C", "aaa"), Err(Error::InvalidOctave(_))));
        assert!(matches!(Note::new("C", "3.3"), Err(Error::InvalidOctave(_))));
        assert!(matches!(Note::new("C", f64::NAN), Err(Error::InvalidOctave(_))));
        assert!(matches!(Note::new("C", u64::MAX), Err(Error::InvalidOctave(_))));
    }

    #[test]
    fn test_octave_coercion() {
        let note = Note::new("C", "5").unwrap();
        assert_eq!(note.pitch(), PitchClass::C);
        assert_eq!(note.octave().get(), 5);
        assert_eq!(note.frequency(), "523.2511".parse::<Hz>().unwrap());
        assert_eq!(note.frequency().to_string(), "523.2511");
        assert_eq!(note.to_string(), "C5");

        let note = Note::new("F♯", 3.3).unwrap();
        assert_eq!(note.name(), "F♯");
        assert_eq!(note.octave().get(), 3);
        assert_eq!(note.frequency().to_string(), "184.9972");
        assert_eq!(note.to_string(), "F♯3");

        let octave = Octave::new(7).unwrap();
        assert_eq!(Note::new("A", octave).unwrap().to_string(), "A7");
    }

    #[test]
    fn test_every_note_and_octave() {
        for pitch in PitchClass::ALL {
            for octave in 0..=10u8 {
                let note = Note::new(pitch.name(), octave).unwrap();
                assert_eq!(note.to_string(), format!("{pitch}{octave}"));
                assert_eq!(note.frequency(), FREQ_TABLE[pitch.index()][octave as usize]);

                let ascii = pitch.name().replace(SHARP_SYMBOL, "#");
                assert_eq!(Note::new(&ascii, octave).unwrap(), note);
            }
        }
    }

    #[test]
    fn test_flat_spellings() {
        let pairs = [("D", "C♯"), ("E", "D♯"), ("G", "F♯"), ("A", "G♯"), ("B", "A♯")];
        for (letter, sharp) in pairs {
            let want = Note::new(sharp, 3).unwrap();
            assert_eq!(Note::new(&format!("{letter}♭"), 3).unwrap(), want);
            assert_eq!(Note::new(&format!("{letter}b"), 3).unwrap(), want);
            assert_eq!(want.to_string(), format!("{sharp}3"));
        }
    }

    #[test]
    fn test_unsupported_flats() {
        for octave in 0..=10 {
            for name in ["C♭", "Cb", "F♭", "Fb"] {
                assert!(matches!(Note::new(name, octave), Err(Error::InvalidNote(_))));
            }
        }
    }

    #[test]
    fn test_natural_spellings() {
        for letter in ["C", "D", "E", "F", "G", "A", "B"] {
            let natural = Note::new(&format!("{letter}♮"), 6).unwrap();
            assert_eq!(natural, Note::new(letter, 6).unwrap());
            assert_eq!(natural.to_string(), format!("{letter}6"));
        }
    }

    #[test]
    fn test_harmonics_c5() {
        let want: Vec<Hz> = [
            "1046.502", "1569.753", "2093.004", "2616.255", "3139.506", "3662.757", "4186.008",
            "4709.259", "5232.510", "5755.761", "6279.012", "6802.263", "7325.514", "7848.765",
            "8372.016", "8895.267", "9418.518", "9941.769", "10465.02", "10988.27", "11511.52",
            "12034.77", "12558.02", "13081.27", "13604.52", "14127.77", "14651.02", "15174.27",
            "15697.52", "16220.77", "16744.02", "17267.27", "17790.52", "18313.77", "18837.02",
            "19360.27", "19883.52", "20406.77", "20930.02", "21453.27", "21976.52", "22499.77",
            "23023.02", "23546.27", "24069.52", "24592.77", "25116.02", "25639.27", "26162.52",
            "26685.77", "27209.02", "27732.27", "28255.52", "28778.77", "29302.02", "29825.27",
            "30348.52", "30871.77", "31395.02",
        ]
        .into_iter()
        .map(|text| text.parse::<Hz>().unwrap())
        .collect();

        let note = Note::new("C", 5).unwrap();
        let harmonics = note.harmonics();
        assert_eq!(harmonics, want);
        assert_eq!(harmonics[0], (note.frequency() * 2).floor_to_precision());
        assert!(harmonics.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(harmonics.iter().all(|freq| *freq < HIGHEST_NOTE));
    }

    #[test]
    fn test_harmonics_g_sharp_8() {
        let note = Note::new("G♯", 8).unwrap();
        let harmonics: Vec<String> = note.harmonics().iter().map(Hz::to_string).collect();
        assert_eq!(harmonics, ["13289.75", "19934.62", "26579.49"]);
    }

    #[test]
    fn test_harmonics_top_note() {
        assert!(Note::new("B", 10).unwrap().harmonics().is_empty());
    }

    #[test]
    fn test_octave_series() {
        for note in Note::all() {
            let start = note.octave().get();
            let series = note.octave_series();
            assert_eq!(series.len(), 10 - start as usize);
            for (j, octave_note) in series.iter().enumerate() {
                let want_octave = start + j as u8 + 1;
                assert_eq!(octave_note.pitch(), note.pitch());
                assert_eq!(octave_note.octave().get(), want_octave);
                assert_eq!(
                    octave_note.frequency(),
                    FREQ_TABLE[note.pitch().index()][want_octave as usize]
                );
                assert_eq!(octave_note.to_string(), format!("{}{want_octave}", note.name()));
            }
        }
    }

    #[test]
    fn test_parse_invalid() {
        for text in ["", "C", "C♯100", "Dc5", "C11", "C-1", "c4", "A 4", "A04"] {
            assert!(
                matches!(text.parse::<Note>(), Err(Error::InvalidNote(_))),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_every_note() {
        for note in Note::all() {
            let text = note.to_string();
            let parsed: Note = text.parse().unwrap();
            assert_eq!(parsed, *note);
            assert_eq!(parsed.to_string(), text);
        }
    }

    #[test]
    fn test_parse_accidentals() {
        assert_eq!("Db5".parse::<Note>().unwrap().to_string(), "C♯5");
        assert_eq!("E♭5".parse::<Note>().unwrap().to_string(), "D♯5");
        assert_eq!("Gb5".parse::<Note>().unwrap().to_string(), "F♯5");
        assert_eq!("A♭5".parse::<Note>().unwrap().to_string(), "G♯5");
        assert_eq!("Bb5".parse::<Note>().unwrap().to_string(), "A♯5");
        assert_eq!("F#2".parse::<Note>().unwrap().to_string(), "F♯2");
        assert_eq!("B♮10".parse::<Note>().unwrap().to_string(), "B10");

        for text in ["C♭5", "Cb5", "F♭5", "Fb5"] {
            assert!(matches!(text.parse::<Note>(), Err(Error::InvalidNote(_))));
        }
    }

    #[test]
    fn test_all_notes_scan_order() {
        let all = Note::all();
        assert_eq!(all.len(), 132);
        assert_eq!(all[0].to_string(), "C0");
        assert_eq!(all[10].to_string(), "C10");
        assert_eq!(all[11].to_string(), "C♯0");
        assert_eq!(all[131].to_string(), "B10");
    }
}

// Note names - pitch class plus octave in scientific pitch notation
// "C4" is middle C (MIDI 60), "A4" is 440 Hz

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Errors produced when parsing a note name such as "G3"
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteParseError {
    #[error("empty note name")]
    Empty,

    #[error("invalid pitch letter in '{0}'")]
    InvalidLetter(String),

    #[error("invalid octave in '{0}'")]
    InvalidOctave(String),
}

/// A pitch class plus octave
///
/// Stored as a semitone index (0 = C .. 11 = B) and a signed octave, so
/// enharmonic spellings ("A#3" / "Bb3") compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteName {
    pitch_class: u8,
    octave: i8,
}

impl NoteName {
    /// Creates a note from a semitone index (wrapped into 0..12) and an octave
    pub fn new(pitch_class: u8, octave: i8) -> Self {
        Self {
            pitch_class: pitch_class % 12,
            octave,
        }
    }

    /// Builds a note from a MIDI note number (60 = C4)
    pub fn from_midi(midi: i32) -> Self {
        let pitch_class = midi.rem_euclid(12) as u8;
        let octave = (midi.div_euclid(12) - 1).clamp(i8::MIN as i32, i8::MAX as i32) as i8;
        Self {
            pitch_class,
            octave,
        }
    }

    /// MIDI note number, unclamped (notes below C-1 go negative)
    pub fn midi_number(&self) -> i32 {
        (self.octave as i32 + 1) * 12 + self.pitch_class as i32
    }

    /// Equal-tempered frequency in Hz, A4 = 440 Hz
    pub fn frequency(&self) -> f32 {
        440.0 * 2_f32.powf((self.midi_number() as f32 - 69.0) / 12.0)
    }

    /// Shift by whole octaves, saturating at the octave range
    pub fn transpose_octaves(&self, octaves: i8) -> Self {
        Self {
            pitch_class: self.pitch_class,
            octave: self.octave.saturating_add(octaves),
        }
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", NOTE_NAMES[self.pitch_class as usize], self.octave)
    }
}

impl FromStr for NoteName {
    type Err = NoteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let letter = chars.next().ok_or(NoteParseError::Empty)?;

        let base: i32 = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(NoteParseError::InvalidLetter(s.to_string())),
        };

        let rest = &s[letter.len_utf8()..];
        let (accidental, octave_str) = match rest.chars().next() {
            Some('#') => (1, &rest[1..]),
            Some('b') => (-1, &rest[1..]),
            _ => (0, rest),
        };

        let octave: i32 = octave_str
            .parse()
            .map_err(|_| NoteParseError::InvalidOctave(s.to_string()))?;

        if !(i8::MIN as i32..=i8::MAX as i32).contains(&octave) {
            return Err(NoteParseError::InvalidOctave(s.to_string()));
        }

        // Cb and B# cross the octave boundary
        let midi = (octave + 1) * 12 + base + accidental;
        Ok(Self::from_midi(midi))
    }
}

impl TryFrom<String> for NoteName {
    type Error = NoteParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NoteName> for String {
    fn from(note: NoteName) -> Self {
        note.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(s: &str) -> NoteName {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(note("C4").to_string(), "C4");
        assert_eq!(note("G3").to_string(), "G3");
        assert_eq!(note("C#5").to_string(), "C#5");
        assert_eq!(note("C-1").to_string(), "C-1");
    }

    #[test]
    fn test_enharmonic_spellings_are_equal() {
        assert_eq!(note("Bb3"), note("A#3"));
        assert_eq!(note("Cb4"), note("B3"));
        assert_eq!(note("B#3"), note("C4"));
    }

    #[test]
    fn test_midi_numbers() {
        // Middle C (C4) = MIDI note 60
        assert_eq!(note("C4").midi_number(), 60);
        // A4 (440 Hz) = MIDI note 69
        assert_eq!(note("A4").midi_number(), 69);
        assert_eq!(note("C2").midi_number(), 36);
        assert_eq!(NoteName::from_midi(73), note("C#5"));
    }

    #[test]
    fn test_frequency() {
        assert!((note("A4").frequency() - 440.0).abs() < 0.01);
        assert!((note("A3").frequency() - 220.0).abs() < 0.01);
        assert!((note("C4").frequency() - 261.63).abs() < 0.01);
    }

    #[test]
    fn test_transpose_octaves() {
        assert_eq!(note("E4").transpose_octaves(1), note("E5"));
        assert_eq!(note("E4").transpose_octaves(-2), note("E2"));
        assert_eq!(note("E4").transpose_octaves(0), note("E4"));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<NoteName>(), Err(NoteParseError::Empty));
        assert!(matches!(
            "H2".parse::<NoteName>(),
            Err(NoteParseError::InvalidLetter(_))
        ));
        assert!(matches!(
            "C".parse::<NoteName>(),
            Err(NoteParseError::InvalidOctave(_))
        ));
        assert!(matches!(
            "Gx3".parse::<NoteName>(),
            Err(NoteParseError::InvalidOctave(_))
        ));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&note("G3")).unwrap();
        assert_eq!(json, "\"G3\"");

        let back: NoteName = serde_json::from_str("\"Bb2\"").unwrap();
        assert_eq!(back, note("A#2"));

        assert!(serde_json::from_str::<NoteName>("\"Q9\"").is_err());
    }
}

// Voices - named note channels with their note tables

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::note::NoteName;
use super::timeline::NoteValue;
use crate::synth::oscillator::WaveformType;

/// Synthesis channel identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceId {
    System,
    Player,
    Enemy,
    Bass,
    Melody,
}

impl VoiceId {
    pub const ALL: [VoiceId; 5] = [
        VoiceId::System,
        VoiceId::Player,
        VoiceId::Enemy,
        VoiceId::Bass,
        VoiceId::Melody,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            VoiceId::System => "system",
            VoiceId::Player => "player",
            VoiceId::Enemy => "enemy",
            VoiceId::Bass => "bass",
            VoiceId::Melody => "melody",
        }
    }
}

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("note table must contain at least one note")]
pub struct EmptyNoteTable;

/// Ordered, non-empty note sequence
///
/// Non-emptiness is checked on construction and deserialization, which keeps
/// modulo lookup total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NoteName>", into = "Vec<NoteName>")]
pub struct NoteTable(Vec<NoteName>);

impl NoteTable {
    pub fn new(notes: Vec<NoteName>) -> Result<Self, EmptyNoteTable> {
        if notes.is_empty() {
            return Err(EmptyNoteTable);
        }
        Ok(Self(notes))
    }

    /// Parses a list of note names; panics on bad input, meant for built-in tables
    pub fn from_names(names: &[&str]) -> Self {
        let notes = names
            .iter()
            .map(|name| {
                name.parse::<NoteName>()
                    .unwrap_or_else(|e| panic!("built-in note table: {e}"))
            })
            .collect();
        Self::new(notes).unwrap_or_else(|e| panic!("built-in note table: {e}"))
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Entry at `index` wrapped into the table, negative indices count from the end
    pub fn wrapped(&self, index: i64) -> NoteName {
        let len = self.0.len() as i64;
        self.0[index.rem_euclid(len) as usize]
    }

    pub fn notes(&self) -> &[NoteName] {
        &self.0
    }
}

impl TryFrom<Vec<NoteName>> for NoteTable {
    type Error = EmptyNoteTable;

    fn try_from(notes: Vec<NoteName>) -> Result<Self, Self::Error> {
        Self::new(notes)
    }
}

impl From<NoteTable> for Vec<NoteName> {
    fn from(table: NoteTable) -> Self {
        table.0
    }
}

/// A voice: note table, octave shift and dynamics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    pub id: VoiceId,
    pub notes: NoteTable,
    /// Octaves added to every table entry
    #[serde(default)]
    pub octave_offset: i8,
    /// Velocity per unit of tempo
    pub velocity_scale: f64,
    /// Upper bound of the tempo-derived velocity
    pub velocity_cap: f64,
    #[serde(default)]
    pub note_value: NoteValue,
    #[serde(default)]
    pub waveform: WaveformType,
}

impl Voice {
    pub fn new(id: VoiceId, notes: NoteTable) -> Self {
        Self {
            id,
            notes,
            octave_offset: 0,
            velocity_scale: 0.2,
            velocity_cap: 0.5,
            note_value: NoteValue::default(),
            waveform: WaveformType::default(),
        }
    }

    pub fn with_octave_offset(mut self, octaves: i8) -> Self {
        self.octave_offset = octaves;
        self
    }

    pub fn with_velocity(mut self, scale: f64, cap: f64) -> Self {
        self.velocity_scale = scale;
        self.velocity_cap = cap;
        self
    }

    pub fn with_note_value(mut self, note_value: NoteValue) -> Self {
        self.note_value = note_value;
        self
    }

    pub fn with_waveform(mut self, waveform: WaveformType) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn table_len(&self) -> usize {
        self.notes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_rejected() {
        assert_eq!(NoteTable::new(Vec::new()), Err(EmptyNoteTable));
        assert!(serde_json::from_str::<NoteTable>("[]").is_err());
    }

    #[test]
    fn test_wrapped_lookup() {
        let table = NoteTable::from_names(&["C3", "E3", "G3"]);
        assert_eq!(table.wrapped(0).to_string(), "C3");
        assert_eq!(table.wrapped(4).to_string(), "E3");
        assert_eq!(table.wrapped(-1).to_string(), "G3");
        assert_eq!(table.wrapped(-3).to_string(), "C3");
        assert_eq!(table.wrapped(i64::MIN), table.wrapped(1));
    }

    #[test]
    fn test_voice_deserializes_with_defaults() {
        let json = r#"{ "id": "bass", "notes": ["C2", "G2"],
            "velocity_scale": 0.3, "velocity_cap": 0.6 }"#;
        let voice: Voice = serde_json::from_str(json).unwrap();

        assert_eq!(voice.id, VoiceId::Bass);
        assert_eq!(voice.table_len(), 2);
        assert_eq!(voice.octave_offset, 0);
        assert_eq!(voice.note_value, NoteValue::EIGHTH);
        assert_eq!(voice.waveform, WaveformType::Sine);
    }

    #[test]
    fn test_voice_id_display() {
        let names: Vec<String> = VoiceId::ALL.iter().map(|v| v.to_string()).collect();
        assert_eq!(names, ["system", "player", "enemy", "bass", "melody"]);
    }
}

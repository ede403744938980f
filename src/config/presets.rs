// Built-in sequencer presets

use std::fmt;
use std::str::FromStr;

use super::{ConfigError, Cue, SequencerConfig};
use crate::sequencer::timeline::NoteValue;
use crate::sequencer::voice::{NoteTable, Voice, VoiceId};
use crate::synth::envelope::AdsrParams;
use crate::synth::oscillator::WaveformType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Per-event voices, bass line on obstacles with a melody layered on top
    Layered,
    /// One synth: a C4 blip on start and C2 on game over, nothing in between
    Minimal,
}

impl Preset {
    pub fn config(&self) -> SequencerConfig {
        match self {
            Preset::Layered => layered(),
            Preset::Minimal => minimal(),
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "layered" => Ok(Preset::Layered),
            "minimal" => Ok(Preset::Minimal),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preset::Layered => f.write_str("layered"),
            Preset::Minimal => f.write_str("minimal"),
        }
    }
}

/// Two bars of I-V-vi-iii-IV-I-IV-V in the bass, a descending answer in the
/// melody; `spawns` starts two steps before the downbeat
pub fn layered() -> SequencerConfig {
    SequencerConfig {
        reset_offset: -2,
        cue_velocity: 0.1,
        cue_note_value: NoteValue::EIGHTH,
        base_bpm: 120.0,
        envelope: AdsrParams::pluck(),
        voices: vec![
            Voice::new(VoiceId::System, NoteTable::from_names(&["C4"]))
                .with_waveform(WaveformType::Triangle),
            Voice::new(VoiceId::Player, NoteTable::from_names(&["C5", "E5", "G5", "E5"]))
                .with_velocity(0.25, 0.6)
                .with_note_value(NoteValue::SIXTEENTH)
                .with_waveform(WaveformType::Square),
            Voice::new(VoiceId::Enemy, NoteTable::from_names(&["G3", "F3", "E3", "D3"]))
                .with_velocity(0.2, 0.5)
                .with_waveform(WaveformType::Saw),
            Voice::new(
                VoiceId::Bass,
                NoteTable::from_names(&["C3", "G2", "A2", "E2", "F2", "C2", "F2", "G2"]),
            )
            .with_velocity(0.3, 0.7)
            .with_note_value(NoteValue::QUARTER)
            .with_waveform(WaveformType::Triangle),
            Voice::new(
                VoiceId::Melody,
                NoteTable::from_names(&["E4", "D4", "C4", "B3", "A3", "G3", "A3", "B3"]),
            )
            .with_octave_offset(1)
            .with_velocity(0.15, 0.4),
        ],
        start_cues: vec![
            Cue::new(VoiceId::System, "C4"),
            Cue::new(VoiceId::Bass, "C2"),
        ],
        over_cues: vec![
            Cue::new(VoiceId::System, "C2"),
            Cue::new(VoiceId::Enemy, "G1"),
            Cue::new(VoiceId::Bass, "C1"),
        ],
        jump_voice: Some(VoiceId::Player),
        obstacle_voice: Some(VoiceId::Bass),
        layer_voice: Some(VoiceId::Melody),
    }
}

pub fn minimal() -> SequencerConfig {
    SequencerConfig {
        reset_offset: 0,
        cue_velocity: 1.0,
        cue_note_value: NoteValue::EIGHTH,
        base_bpm: 120.0,
        envelope: AdsrParams::pluck(),
        voices: vec![Voice::new(VoiceId::System, NoteTable::from_names(&["C4"]))],
        start_cues: vec![Cue::new(VoiceId::System, "C4")],
        over_cues: vec![Cue::new(VoiceId::System, "C2")],
        jump_voice: None,
        obstacle_voice: None,
        layer_voice: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_from_str() {
        assert_eq!("layered".parse::<Preset>().unwrap(), Preset::Layered);
        assert_eq!("Minimal".parse::<Preset>().unwrap(), Preset::Minimal);
        assert!(matches!(
            "loud".parse::<Preset>(),
            Err(ConfigError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_layered_offset_and_roles() {
        let config = Preset::Layered.config();
        assert_eq!(config.reset_offset, -2);
        assert_eq!(config.obstacle_voice, Some(VoiceId::Bass));
        assert_eq!(config.voice(VoiceId::Bass).unwrap().table_len(), 8);
    }
}

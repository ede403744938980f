// Audio commands - sequencer -> sound emitter

use serde::{Deserialize, Serialize};

use crate::sequencer::note::NoteName;
use crate::sequencer::timeline::NoteValue;
use crate::sequencer::voice::VoiceId;

/// Request to play a note on a voice
///
/// With a `duration` this is an attack-then-release, without one a bare
/// attack. `start_time` is in seconds on the emitter's clock; `None` means
/// "now". `tempo` is the game speed multiplier the duration resolves at.
/// Timing semantics belong to the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioCommand {
    pub voice: VoiceId,
    pub note: NoteName,
    pub duration: Option<NoteValue>,
    pub start_time: Option<f64>,
    pub velocity: f64,
    #[serde(default = "base_speed")]
    pub tempo: f64,
}

fn base_speed() -> f64 {
    1.0
}

impl AudioCommand {
    pub fn attack_release(
        voice: VoiceId,
        note: NoteName,
        duration: NoteValue,
        velocity: f64,
    ) -> Self {
        Self {
            voice,
            note,
            duration: Some(duration),
            start_time: None,
            velocity,
            tempo: base_speed(),
        }
    }

    pub fn attack(voice: VoiceId, note: NoteName, velocity: f64) -> Self {
        Self {
            voice,
            note,
            duration: None,
            start_time: None,
            velocity,
            tempo: base_speed(),
        }
    }

    /// Same command resolved at a game speed multiplier
    pub fn with_tempo(mut self, tempo: f64) -> Self {
        self.tempo = tempo;
        self
    }

    /// Same command scheduled at `seconds`
    pub fn at(mut self, seconds: f64) -> Self {
        self.start_time = Some(seconds);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tempo_defaults_to_base_speed() {
        let command = AudioCommand::attack(VoiceId::System, "C4".parse().unwrap(), 0.5);
        assert_eq!(command.tempo, 1.0);
        assert_eq!(command.with_tempo(2.5).tempo, 2.5);

        let json = r#"{"voice":"bass","note":"C2","duration":"4n",
            "start_time":null,"velocity":0.3}"#;
        let decoded: AudioCommand = serde_json::from_str(json).unwrap();
        assert_eq!(decoded.tempo, 1.0);
        assert_eq!(decoded.duration, Some(NoteValue::QUARTER));
    }
}

// Sequencer configuration
//
// Everything the note policy needs: voices and their tables, the spawn reset
// offset, the fixed start/game-over cues, and which voice answers which
// event. Stored as RON; see `presets` for the built-in variants.

pub mod presets;

pub use presets::Preset;

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sequencer::note::NoteName;
use crate::sequencer::timeline::{NoteValue, Tempo};
use crate::sequencer::voice::{Voice, VoiceId};
use crate::synth::envelope::AdsrParams;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),

    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),

    #[error("Voice '{0}' is declared more than once")]
    DuplicateVoice(VoiceId),

    #[error("Voice '{0}' is referenced but not declared")]
    MissingVoice(VoiceId),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown preset '{0}' (expected 'layered' or 'minimal')")]
    UnknownPreset(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Fixed note played on a voice at session start or game over
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    pub voice: VoiceId,
    pub note: NoteName,
}

impl Cue {
    pub fn new(voice: VoiceId, note: &str) -> Self {
        let note = note
            .parse()
            .unwrap_or_else(|e| panic!("built-in cue note: {e}"));
        Self { voice, note }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencerConfig {
    /// Value `spawns` takes at game start; negative values act as a pre-game lead-in
    pub reset_offset: i64,
    /// Fixed low velocity for start and game-over cues
    pub cue_velocity: f64,
    #[serde(default)]
    pub cue_note_value: NoteValue,
    /// Tempo at game speed 1.0, used to resolve note values to seconds
    pub base_bpm: f64,
    #[serde(default = "AdsrParams::pluck")]
    pub envelope: AdsrParams,
    pub voices: Vec<Voice>,
    #[serde(default)]
    pub start_cues: Vec<Cue>,
    #[serde(default)]
    pub over_cues: Vec<Cue>,
    /// Voice answering `playerJumped`
    #[serde(default)]
    pub jump_voice: Option<VoiceId>,
    /// Voice answering `obstacleSpawned`
    #[serde(default)]
    pub obstacle_voice: Option<VoiceId>,
    /// Voice layered over obstacles once `spawns` passes the obstacle table length
    #[serde(default)]
    pub layer_voice: Option<VoiceId>,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        presets::layered()
    }
}

impl SequencerConfig {
    pub fn voice(&self, id: VoiceId) -> Option<&Voice> {
        self.voices.iter().find(|voice| voice.id == id)
    }

    pub fn base_tempo(&self) -> Tempo {
        Tempo::new(self.base_bpm)
    }

    /// Check cross references and numeric parameters
    pub fn validate(&self) -> ConfigResult<()> {
        let mut seen = BTreeSet::new();
        for voice in &self.voices {
            if !seen.insert(voice.id) {
                return Err(ConfigError::DuplicateVoice(voice.id));
            }
            if !voice.velocity_scale.is_finite() || !voice.velocity_cap.is_finite() {
                return Err(ConfigError::InvalidParameter(format!(
                    "voice '{}' velocity parameters must be finite",
                    voice.id
                )));
            }
        }

        let referenced = self
            .start_cues
            .iter()
            .chain(&self.over_cues)
            .map(|cue| cue.voice)
            .chain(self.jump_voice)
            .chain(self.obstacle_voice)
            .chain(self.layer_voice);
        for id in referenced {
            if !seen.contains(&id) {
                return Err(ConfigError::MissingVoice(id));
            }
        }

        if !self.cue_velocity.is_finite() {
            return Err(ConfigError::InvalidParameter(
                "cue_velocity must be finite".to_string(),
            ));
        }
        if !Tempo::is_valid_bpm(self.base_bpm) {
            return Err(ConfigError::InvalidParameter(format!(
                "base_bpm {} outside [{}, {}]",
                self.base_bpm,
                Tempo::MIN_BPM,
                Tempo::MAX_BPM
            )));
        }

        Ok(())
    }

    pub fn from_ron_str(text: &str) -> ConfigResult<Self> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> ConfigResult<String> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Load and validate a RON config file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_ron_str(&text)?;
        tracing::info!(
            path = %path.display(),
            voices = config.voices.len(),
            "Loaded sequencer config"
        );
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }
}

// Sequencer - note tables, selection policy and session dispatch

pub mod note;
pub mod policy;
pub mod session;
pub mod timeline;
pub mod voice;

pub use note::NoteName;
pub use policy::{compute_velocity, select_note};
pub use session::{Phase, SessionState, on_event};
pub use timeline::{NoteValue, Tempo};
pub use voice::{NoteTable, Voice, VoiceId};

use crate::config::{ConfigError, SequencerConfig};
use crate::event::GameEvent;
use crate::messaging::command::AudioCommand;

/// A validated configuration bundled with the pure dispatch functions
#[derive(Debug, Clone)]
pub struct NoteSequencer {
    config: SequencerConfig,
}

impl NoteSequencer {
    pub fn new(config: SequencerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn initial_state(&self) -> SessionState {
        SessionState::idle(&self.config)
    }

    /// Note for a configured voice, `None` if the voice is not declared
    pub fn select_note(&self, voice: VoiceId, spawn_index: i64) -> Option<NoteName> {
        self.config
            .voice(voice)
            .map(|voice| select_note(voice, spawn_index))
    }

    pub fn on_event(
        &self,
        event: &GameEvent,
        state: SessionState,
    ) -> (Vec<AudioCommand>, SessionState) {
        on_event(&self.config, event, state)
    }
}

impl Default for NoteSequencer {
    fn default() -> Self {
        Self {
            config: SequencerConfig::default(),
        }
    }
}

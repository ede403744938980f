// Arcade Chime - procedural audio cues for game events
//
// Library exports for the replay binary, tests and benchmarks

pub mod audio;
pub mod bridge;
pub mod config;
pub mod emitter;
pub mod event;
pub mod logging;
pub mod messaging;
pub mod sequencer;
pub mod synth;

// Re-export commonly used types for convenience
pub use audio::export::{ExportSettings, export_wav, render_event_lines, render_event_log};
pub use bridge::AudioBridge;
pub use config::{ConfigError, Preset, SequencerConfig};
pub use emitter::{ChannelEmitter, RecordingEmitter, SoundEmitter};
pub use event::{AudioMessage, EventError, GameEvent};
pub use messaging::channels::{create_command_channel, create_event_channel};
pub use messaging::command::AudioCommand;
pub use messaging::notification::Diagnostic;
pub use sequencer::{
    NoteName, NoteSequencer, NoteValue, Phase, SessionState, Voice, VoiceId, compute_velocity,
    on_event, select_note,
};
pub use synth::renderer::SynthRenderer;

// Sound emitters - where audio commands go
//
// The sequencer never talks to an audio engine directly; it hands commands to
// a `SoundEmitter`. Emission is fire-and-forget: an emitter that cannot keep
// up drops commands instead of failing the caller.

use ringbuf::traits::Producer;

use crate::messaging::channels::CommandProducer;
use crate::messaging::command::AudioCommand;
use crate::messaging::notification::{Diagnostic, DiagnosticCategory};

pub trait SoundEmitter {
    fn emit(&mut self, command: &AudioCommand);

    /// Problems seen since the last call (dropped commands and the like)
    fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        Vec::new()
    }
}

impl<E: SoundEmitter + ?Sized> SoundEmitter for &mut E {
    fn emit(&mut self, command: &AudioCommand) {
        (**self).emit(command);
    }

    fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        (**self).take_diagnostics()
    }
}

impl<E: SoundEmitter + ?Sized> SoundEmitter for Box<E> {
    fn emit(&mut self, command: &AudioCommand) {
        (**self).emit(command);
    }

    fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        (**self).take_diagnostics()
    }
}

/// Keeps every command it receives, in order
#[derive(Debug, Default, Clone)]
pub struct RecordingEmitter {
    commands: Vec<AudioCommand>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[AudioCommand] {
        &self.commands
    }

    pub fn take(&mut self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl SoundEmitter for RecordingEmitter {
    fn emit(&mut self, command: &AudioCommand) {
        self.commands.push(*command);
    }
}

/// Forwards commands to an audio thread through the command ringbuffer
pub struct ChannelEmitter {
    producer: CommandProducer,
    dropped: u64,
    pending: Vec<Diagnostic>,
}

impl ChannelEmitter {
    pub fn new(producer: CommandProducer) -> Self {
        Self {
            producer,
            dropped: 0,
            pending: Vec::new(),
        }
    }

    /// Commands lost because the ringbuffer was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl SoundEmitter for ChannelEmitter {
    fn emit(&mut self, command: &AudioCommand) {
        if self.producer.try_push(*command).is_err() {
            self.dropped += 1;
            tracing::warn!(
                voice = %command.voice,
                note = %command.note,
                dropped = self.dropped,
                "Command channel full, dropping audio command"
            );
            self.pending.push(Diagnostic::warning(
                DiagnosticCategory::Channel,
                format!("command channel full, dropped {} {}", command.voice, command.note),
            ));
        }
    }

    fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.pending)
    }
}

// AudioBridge - glue between the game's event channel and a sound emitter
//
// Owns the session state so nothing else can mutate it. Records are handled
// one at a time in arrival order; a record that cannot be decoded is logged,
// turned into a diagnostic and dropped. Diagnostics are kept up to
// `MAX_DIAGNOSTICS`, oldest first out; long-lived owners should drain them
// with `take_diagnostics`.

use ringbuf::traits::Consumer;

use crate::emitter::SoundEmitter;
use crate::event::{AudioMessage, EventError, GameEvent, parse_record};
use crate::messaging::channels::EventConsumer;
use crate::messaging::notification::{Diagnostic, DiagnosticCategory};
use crate::sequencer::{NoteSequencer, SessionState};

/// Diagnostics retained before the oldest are discarded
pub const MAX_DIAGNOSTICS: usize = 256;

pub struct AudioBridge<E: SoundEmitter> {
    sequencer: NoteSequencer,
    state: SessionState,
    emitter: E,
    diagnostics: Vec<Diagnostic>,
    discarded_diagnostics: u64,
}

impl<E: SoundEmitter> AudioBridge<E> {
    pub fn new(sequencer: NoteSequencer, emitter: E) -> Self {
        let state = sequencer.initial_state();
        Self {
            sequencer,
            state,
            emitter,
            diagnostics: Vec::new(),
            discarded_diagnostics: 0,
        }
    }

    pub fn sequencer(&self) -> &NoteSequencer {
        &self.sequencer
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    pub fn emitter_mut(&mut self) -> &mut E {
        &mut self.emitter
    }

    pub fn into_emitter(self) -> E {
        self.emitter
    }

    /// Dispatch a decoded event, returning how many commands were emitted
    pub fn handle_event(&mut self, event: &GameEvent) -> usize {
        let (commands, next) = self.sequencer.on_event(event, self.state);
        tracing::debug!(
            event = event.tag(),
            tempo = event.tempo(),
            spawns = next.spawns,
            phase = ?next.phase,
            commands = commands.len(),
            "Dispatched game event"
        );

        self.state = next;
        for command in &commands {
            self.emitter.emit(command);
        }
        for diagnostic in self.emitter.take_diagnostics() {
            self.push_diagnostic(diagnostic);
        }
        commands.len()
    }

    pub fn handle_record(&mut self, record: &AudioMessage) -> usize {
        match GameEvent::try_from(record) {
            Ok(event) => self.handle_event(&event),
            Err(err) => {
                self.reject(err);
                0
            }
        }
    }

    /// Decode and handle one JSON line
    pub fn handle_line(&mut self, line: &str) -> usize {
        match parse_record(line) {
            Ok(record) => self.handle_record(&record),
            Err(err) => {
                self.reject(err);
                0
            }
        }
    }

    /// Handle every record currently queued, returns how many were taken
    pub fn drain(&mut self, events: &mut EventConsumer) -> usize {
        let mut handled = 0;
        while let Some(record) = events.try_pop() {
            self.handle_record(&record);
            handled += 1;
        }
        handled
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Diagnostics pushed out by the cap since the bridge was created
    pub fn discarded_diagnostics(&self) -> u64 {
        self.discarded_diagnostics
    }

    fn reject(&mut self, err: EventError) {
        tracing::warn!(error = %err, "Dropping inbound audio event");
        let diagnostic = match err {
            EventError::UnrecognizedEvent(_) => {
                Diagnostic::warning(DiagnosticCategory::Event, err.to_string())
            }
            EventError::Malformed(_) => {
                Diagnostic::error(DiagnosticCategory::Event, err.to_string())
            }
        };
        self.push_diagnostic(diagnostic);
    }

    fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        if self.diagnostics.len() >= MAX_DIAGNOSTICS {
            self.diagnostics.remove(0);
            self.discarded_diagnostics += 1;
        }
        self.diagnostics.push(diagnostic);
    }
}

// Offline renderer - a sound emitter that turns audio commands into samples
//
// Each game voice gets one monophonic synth. Commands are scheduled on a
// timeline (their `start_time`, or the renderer clock when absent) and the
// whole timeline is rendered in one pass.

use std::collections::BTreeMap;

use super::envelope::AdsrParams;
use super::oscillator::WaveformType;
use super::voice::SynthVoice;
use crate::config::SequencerConfig;
use crate::emitter::SoundEmitter;
use crate::messaging::command::AudioCommand;
use crate::sequencer::timeline::Tempo;
use crate::sequencer::voice::VoiceId;

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScheduledNote {
    voice: VoiceId,
    start_frame: u64,
    end_frame: Option<u64>,
    frequency: f32,
    velocity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Edge {
    // Offs sort first so a note ending on the frame another starts does not cut it
    Off,
    On,
}

pub struct SynthRenderer {
    sample_rate: f32,
    tempo: Tempo,
    envelope: AdsrParams,
    waveforms: BTreeMap<VoiceId, WaveformType>,
    notes: Vec<ScheduledNote>,
    clock_seconds: f64,
}

impl SynthRenderer {
    pub fn new(config: &SequencerConfig, sample_rate: f32) -> Self {
        let waveforms = config
            .voices
            .iter()
            .map(|voice| (voice.id, voice.waveform))
            .collect();

        Self {
            sample_rate,
            tempo: config.base_tempo(),
            envelope: config.envelope,
            waveforms,
            notes: Vec::new(),
            clock_seconds: 0.0,
        }
    }

    /// Time used for commands that carry no `start_time`
    pub fn set_clock(&mut self, seconds: f64) {
        self.clock_seconds = seconds.max(0.0);
    }

    pub fn scheduled_notes(&self) -> usize {
        self.notes.len()
    }

    fn seconds_to_frames(&self, seconds: f64) -> u64 {
        (seconds.max(0.0) * self.sample_rate as f64).round() as u64
    }

    /// Frames needed to hear every scheduled note through its release
    pub fn length_frames(&self) -> u64 {
        let release = self.seconds_to_frames(self.envelope.release as f64);
        let held = self.seconds_to_frames(self.tempo.beat_duration_seconds());

        self.notes
            .iter()
            .map(|note| {
                note.end_frame
                    .unwrap_or(note.start_frame.saturating_add(held))
                    .saturating_add(release)
            })
            .max()
            .unwrap_or(0)
    }

    /// Render `frames` mono samples from the start of the timeline
    ///
    /// Rendering does not consume the schedule; calling it twice gives the
    /// same buffer.
    pub fn render(&self, frames: usize) -> Vec<f32> {
        let mut edges: Vec<(u64, Edge, usize)> = Vec::with_capacity(self.notes.len() * 2);
        for (index, note) in self.notes.iter().enumerate() {
            edges.push((note.start_frame, Edge::On, index));
            if let Some(end) = note.end_frame {
                edges.push((end, Edge::Off, index));
            }
        }
        edges.sort();

        let mut voices: BTreeMap<VoiceId, (SynthVoice, Option<usize>)> = BTreeMap::new();
        let mut output = Vec::with_capacity(frames);
        let mut next_edge = 0;

        for frame in 0..frames as u64 {
            while let Some(&(at, edge, index)) = edges.get(next_edge) {
                if at > frame {
                    break;
                }
                next_edge += 1;

                let note = self.notes[index];
                let (voice, playing) = voices.entry(note.voice).or_insert_with(|| {
                    let waveform = self.waveforms.get(&note.voice).copied().unwrap_or_default();
                    (SynthVoice::new(waveform, self.envelope, self.sample_rate), None)
                });

                match edge {
                    Edge::On => {
                        voice.note_on(note.frequency, note.velocity);
                        *playing = Some(index);
                    }
                    // Only release the note that is still sounding on this voice
                    Edge::Off if *playing == Some(index) => {
                        voice.note_off();
                        *playing = None;
                    }
                    Edge::Off => {}
                }
            }

            let sample: f32 = voices.values_mut().map(|(voice, _)| voice.next_sample()).sum();
            output.push(sample);
        }

        output
    }

    /// Render the whole schedule, releases included
    pub fn render_all(&self) -> Vec<f32> {
        self.render(self.length_frames() as usize)
    }
}

impl SoundEmitter for SynthRenderer {
    fn emit(&mut self, command: &AudioCommand) {
        let start_seconds = command.start_time.unwrap_or(self.clock_seconds);
        let start_frame = self.seconds_to_frames(start_seconds);
        // Game speed shortens or stretches the note around the base tempo
        let tempo = self.tempo.scaled(command.tempo);
        let end_frame = command.duration.map(|duration| {
            let held = self.seconds_to_frames(duration.seconds(&tempo)).max(1);
            start_frame.saturating_add(held)
        });

        self.notes.push(ScheduledNote {
            voice: command.voice,
            start_frame,
            end_frame,
            frequency: command.note.frequency(),
            velocity: command.velocity as f32,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::presets;
    use crate::sequencer::timeline::NoteValue;

    const SAMPLE_RATE: f32 = 8000.0;

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
    }

    #[test]
    fn test_empty_schedule_is_silent() {
        let renderer = SynthRenderer::new(&presets::layered(), SAMPLE_RATE);
        assert_eq!(renderer.length_frames(), 0);
        assert!(renderer.render_all().is_empty());
        assert!(renderer.render(100).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_command_renders_at_start_time() {
        let mut renderer = SynthRenderer::new(&presets::layered(), SAMPLE_RATE);
        let command = AudioCommand::attack_release(
            VoiceId::System,
            "A4".parse().unwrap(),
            NoteValue::EIGHTH,
            0.8,
        )
        .at(0.5);
        renderer.emit(&command);

        // 0.5s lead-in, 0.25s eighth note at 120 BPM, 0.3s release
        assert_eq!(renderer.length_frames(), 4000 + 2000 + 2400);

        let samples = renderer.render_all();
        assert!(samples[..4000].iter().all(|&s| s == 0.0));
        assert!(peak(&samples[4000..6000]) > 0.1);
        assert!(samples.last().unwrap().abs() < 1e-3);
    }

    #[test]
    fn test_clock_places_untimed_commands() {
        let mut renderer = SynthRenderer::new(&presets::layered(), SAMPLE_RATE);
        renderer.set_clock(1.0);
        renderer.emit(&AudioCommand::attack_release(
            VoiceId::Bass,
            "C2".parse().unwrap(),
            NoteValue::SIXTEENTH,
            0.5,
        ));

        let samples = renderer.render_all();
        assert!(samples[..8000].iter().all(|&s| s == 0.0));
        assert!(peak(&samples[8000..]) > 0.05);
    }

    #[test]
    fn test_render_is_repeatable() {
        let mut renderer = SynthRenderer::new(&presets::layered(), SAMPLE_RATE);
        for (i, note) in ["C4", "E4", "G4"].iter().enumerate() {
            let command = AudioCommand::attack_release(
                VoiceId::Player,
                note.parse().unwrap(),
                NoteValue::EIGHTH,
                0.5,
            );
            renderer.emit(&command.at(i as f64 * 0.1));
        }

        assert_eq!(renderer.scheduled_notes(), 3);
        assert_eq!(renderer.render_all(), renderer.render_all());
    }

    #[test]
    fn test_negative_velocity_is_silent() {
        let mut renderer = SynthRenderer::new(&presets::layered(), SAMPLE_RATE);
        renderer.emit(&AudioCommand::attack_release(
            VoiceId::Player,
            "C5".parse().unwrap(),
            NoteValue::EIGHTH,
            -0.2,
        ));
        assert_eq!(peak(&renderer.render_all()), 0.0);
    }

    #[test]
    fn test_faster_tempo_gives_shorter_notes() {
        let held_frames = |tempo: f64| {
            let mut renderer = SynthRenderer::new(&presets::layered(), SAMPLE_RATE);
            let command = AudioCommand::attack_release(
                VoiceId::Bass,
                "C3".parse().unwrap(),
                NoteValue::QUARTER,
                0.5,
            );
            renderer.emit(&command.with_tempo(tempo));
            renderer.length_frames()
        };

        // Quarter note at 120 BPM is 0.5s; the 0.3s release is added on top
        assert_eq!(held_frames(1.0), 4000 + 2400);
        assert_eq!(held_frames(2.0), 2000 + 2400);
        assert!(held_frames(3.0) < held_frames(0.5));
        // Non-positive speeds fall back to the base tempo
        assert_eq!(held_frames(0.0), held_frames(1.0));
        assert_eq!(held_frames(-2.0), held_frames(1.0));
    }

    #[test]
    fn test_far_start_time_does_not_overflow() {
        let mut renderer = SynthRenderer::new(&presets::layered(), SAMPLE_RATE);
        let command = AudioCommand::attack_release(
            VoiceId::System,
            "C4".parse().unwrap(),
            NoteValue::EIGHTH,
            0.5,
        );
        renderer.emit(&command.at(f64::INFINITY));
        assert_eq!(renderer.length_frames(), u64::MAX);
    }
}

// Voice - one monophonic synth per game voice (like a single Tone.Synth)

use super::envelope::{AdsrEnvelope, AdsrParams};
use super::oscillator::{Oscillator, WaveformType};

#[derive(Debug, Clone)]
pub struct SynthVoice {
    oscillator: Oscillator,
    envelope: AdsrEnvelope,
    velocity: f32,
}

impl SynthVoice {
    pub fn new(waveform: WaveformType, adsr: AdsrParams, sample_rate: f32) -> Self {
        Self {
            oscillator: Oscillator::new(waveform, sample_rate),
            envelope: AdsrEnvelope::new(adsr, sample_rate),
            velocity: 0.0,
        }
    }

    /// Start a note; a new note steals the voice (monophonic)
    pub fn note_on(&mut self, frequency: f32, velocity: f32) {
        // Negative velocities come straight from the tempo policy, silence them here
        self.velocity = velocity.clamp(0.0, 1.0);
        self.oscillator.set_frequency(frequency);
        self.oscillator.reset();
        self.envelope.note_on();
    }

    pub fn note_off(&mut self) {
        self.envelope.note_off();
    }

    pub fn is_active(&self) -> bool {
        self.envelope.is_active()
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn next_sample(&mut self) -> f32 {
        let gain = self.envelope.process();
        self.oscillator.next_sample() * self.velocity * gain
    }
}

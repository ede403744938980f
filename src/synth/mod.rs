// Synth - oscillators, envelopes and the offline renderer behind the cue voices

pub mod envelope;
pub mod oscillator;
pub mod renderer;
pub mod voice;

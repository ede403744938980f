// ADSR Envelope
//
// Linear Attack-Decay-Sustain-Release shaping for short cue notes.
// Release always ramps from the level reached at note-off down to zero.

use serde::{Deserialize, Serialize};

/// ADSR Envelope parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdsrParams {
    /// Attack time in seconds (0.001 to 5.0)
    pub attack: f32,
    /// Decay time in seconds (0.001 to 5.0)
    pub decay: f32,
    /// Sustain level (0.0 to 1.0)
    pub sustain: f32,
    /// Release time in seconds (0.001 to 5.0)
    pub release: f32,
}

impl AdsrParams {
    /// Create ADSR parameters with clamping
    pub fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack: attack.clamp(0.001, 5.0),
            decay: decay.clamp(0.001, 5.0),
            sustain: sustain.clamp(0.0, 1.0),
            release: release.clamp(0.001, 5.0),
        }
    }

    /// Short plucked envelope used for game cues
    pub fn pluck() -> Self {
        Self::new(0.005, 0.08, 0.5, 0.3)
    }
}

impl Default for AdsrParams {
    fn default() -> Self {
        Self {
            attack: 0.01,
            decay: 0.1,
            sustain: 0.7,
            release: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

#[derive(Debug, Clone)]
pub struct AdsrEnvelope {
    params: AdsrParams,
    stage: Stage,
    level: f32,
    release_from: f32,
    sample_rate: f32,
    // Position inside the current stage, in samples
    elapsed: f32,
}

impl AdsrEnvelope {
    pub fn new(params: AdsrParams, sample_rate: f32) -> Self {
        Self {
            params,
            stage: Stage::Idle,
            level: 0.0,
            release_from: 0.0,
            sample_rate,
            elapsed: 0.0,
        }
    }

    /// Start (or restart) the attack from the current level
    pub fn note_on(&mut self) {
        self.stage = Stage::Attack;
        self.elapsed = 0.0;
    }

    pub fn note_off(&mut self) {
        if self.stage != Stage::Idle {
            self.stage = Stage::Release;
            self.release_from = self.level;
            self.elapsed = 0.0;
        }
    }

    /// Advance one sample and return the gain in [0, 1]
    pub fn process(&mut self) -> f32 {
        let attack = self.params.attack * self.sample_rate;
        let decay = self.params.decay * self.sample_rate;
        let release = self.params.release * self.sample_rate;
        let sustain = self.params.sustain;

        match self.stage {
            Stage::Idle => self.level = 0.0,
            Stage::Attack => {
                // Rise from wherever a retrigger caught us
                let step = 1.0 / attack.max(1.0);
                self.level = (self.level + step).min(1.0);
                if self.level >= 1.0 {
                    self.stage = Stage::Decay;
                    self.elapsed = 0.0;
                }
            }
            Stage::Decay => {
                self.elapsed += 1.0;
                let progress = (self.elapsed / decay.max(1.0)).min(1.0);
                self.level = 1.0 - progress * (1.0 - sustain);
                if progress >= 1.0 {
                    self.stage = Stage::Sustain;
                }
            }
            Stage::Sustain => self.level = sustain,
            Stage::Release => {
                self.elapsed += 1.0;
                let progress = (self.elapsed / release.max(1.0)).min(1.0);
                self.level = self.release_from * (1.0 - progress);
                if progress >= 1.0 {
                    self.stage = Stage::Idle;
                    self.level = 0.0;
                }
            }
        }

        self.level
    }

    /// True until the release has fully decayed
    pub fn is_active(&self) -> bool {
        self.stage != Stage::Idle
    }

    pub fn current_value(&self) -> f32 {
        self.level
    }
}

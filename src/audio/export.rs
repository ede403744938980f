// Audio export - offline replay of a game event log to a WAV file
//
// Events are laid out on a fixed grid (`event_spacing` seconds apart),
// dispatched through an `AudioBridge` whose emitter is a `SynthRenderer`, and
// the rendered buffer is written with hound.

use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::audio::dsp_utils::{flush_denormals_to_zero, soft_clip};
use crate::bridge::AudioBridge;
use crate::event::AudioMessage;
use crate::messaging::notification::Diagnostic;
use crate::sequencer::NoteSequencer;
use crate::synth::renderer::SynthRenderer;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Invalid export settings: {0}")]
    InvalidSettings(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// Sample rate (Hz)
    pub sample_rate: u32,
    /// Bit depth (16 or 24)
    pub bit_depth: u16,
    /// Number of channels (1=mono, 2=stereo)
    pub channels: u16,
    /// Seconds between consecutive events of a replayed log
    pub event_spacing: f64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            bit_depth: 16,
            channels: 1,
            event_spacing: 0.25,
        }
    }
}

impl ExportSettings {
    /// Longest gap allowed between replayed events, in seconds
    pub const MAX_EVENT_SPACING: f64 = 60.0;

    pub fn validate(&self) -> Result<(), ExportError> {
        if self.sample_rate == 0 {
            return Err(ExportError::InvalidSettings("sample rate must be > 0".into()));
        }
        if !matches!(self.bit_depth, 16 | 24) {
            return Err(ExportError::InvalidSettings(format!(
                "bit depth {} (expected 16 or 24)",
                self.bit_depth
            )));
        }
        if !matches!(self.channels, 1 | 2) {
            return Err(ExportError::InvalidSettings(format!(
                "{} channels (expected 1 or 2)",
                self.channels
            )));
        }
        if !(0.0..=Self::MAX_EVENT_SPACING).contains(&self.event_spacing) {
            return Err(ExportError::InvalidSettings(format!(
                "event spacing {} (expected 0 to {} seconds)",
                self.event_spacing,
                Self::MAX_EVENT_SPACING
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub frames: u64,
    pub duration_seconds: f64,
}

/// Result of replaying an event log through the synth
#[derive(Debug, Clone, Default)]
pub struct RenderedLog {
    pub samples: Vec<f32>,
    /// Records taken from the log, including dropped ones
    pub records: usize,
    pub commands: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Replay decoded records, one every `event_spacing` seconds
pub fn render_event_log<I>(
    sequencer: NoteSequencer,
    records: I,
    settings: &ExportSettings,
) -> Result<RenderedLog, ExportError>
where
    I: IntoIterator<Item = AudioMessage>,
{
    settings.validate()?;

    let renderer = SynthRenderer::new(sequencer.config(), settings.sample_rate as f32);
    let mut bridge = AudioBridge::new(sequencer, renderer);
    let mut rendered = RenderedLog::default();

    for (index, record) in records.into_iter().enumerate() {
        bridge.emitter_mut().set_clock(index as f64 * settings.event_spacing);
        rendered.commands += bridge.handle_record(&record);
        rendered.records += 1;
    }

    Ok(finish(bridge, rendered))
}

/// Replay raw JSON lines; blank lines are skipped, bad ones become diagnostics
pub fn render_event_lines<I, S>(
    sequencer: NoteSequencer,
    lines: I,
    settings: &ExportSettings,
) -> Result<RenderedLog, ExportError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    settings.validate()?;

    let renderer = SynthRenderer::new(sequencer.config(), settings.sample_rate as f32);
    let mut bridge = AudioBridge::new(sequencer, renderer);
    let mut rendered = RenderedLog::default();

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        bridge
            .emitter_mut()
            .set_clock(rendered.records as f64 * settings.event_spacing);
        rendered.commands += bridge.handle_line(line);
        rendered.records += 1;
    }

    Ok(finish(bridge, rendered))
}

fn finish(mut bridge: AudioBridge<SynthRenderer>, mut rendered: RenderedLog) -> RenderedLog {
    rendered.diagnostics = bridge.take_diagnostics();
    rendered.samples = bridge.into_emitter().render_all();
    rendered
}

/// Write mono samples to a WAV file (duplicated to both sides when stereo)
pub fn export_wav(
    path: &Path,
    samples: &[f32],
    settings: &ExportSettings,
) -> Result<ExportSummary, ExportError> {
    settings.validate()?;

    let spec = WavSpec {
        channels: settings.channels,
        sample_rate: settings.sample_rate,
        bits_per_sample: settings.bit_depth,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;

    let full_scale = ((1_i32 << (settings.bit_depth - 1)) - 1) as f32;
    for &sample in samples {
        let value = (soft_clip(flush_denormals_to_zero(sample)) * full_scale) as i32;
        for _ in 0..settings.channels {
            if settings.bit_depth == 16 {
                writer.write_sample(value as i16)?;
            } else {
                writer.write_sample(value)?;
            }
        }
    }
    writer.finalize()?;

    let frames = samples.len() as u64;
    let duration_seconds = frames as f64 / settings.sample_rate as f64;
    tracing::info!(
        path = %path.display(),
        frames,
        duration_seconds,
        "Exported WAV"
    );

    Ok(ExportSummary {
        path: path.to_path_buf(),
        frames,
        duration_seconds,
    })
}

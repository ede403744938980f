// Note selection and dynamics - pure functions, no audio engine involved

use super::note::NoteName;
use super::voice::Voice;

/// Note for `voice` at a spawn position
///
/// The table index is `spawn_index mod len`, wrapped so negative positions
/// (the pre-game offset) count back from the end of the table, then the
/// voice's octave offset is applied.
pub fn select_note(voice: &Voice, spawn_index: i64) -> NoteName {
    voice
        .notes
        .wrapped(spawn_index)
        .transpose_octaves(voice.octave_offset)
}

/// Loudness proportional to game speed, clamped to `cap`
///
/// Inputs are not validated: `tempo <= 0` gives a velocity `<= 0`, and a NaN
/// product resolves to `cap` (`f64::min` ignores NaN).
pub fn compute_velocity(tempo: f64, scale: f64, cap: f64) -> f64 {
    (scale * tempo).min(cap)
}

// Timeline - base tempo and note durations
// Note durations use the "8n" / "4n." notation and resolve to seconds at a tempo

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tempo in BPM (Beats Per Minute)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tempo {
    bpm: f64,
}

impl Tempo {
    pub const MIN_BPM: f64 = 20.0;
    pub const MAX_BPM: f64 = 999.0;

    /// Creates a new tempo
    /// BPM must be in range [20.0, 999.0]
    pub fn new(bpm: f64) -> Self {
        assert!(
            Self::is_valid_bpm(bpm),
            "BPM must be between 20 and 999"
        );
        Self { bpm }
    }

    pub fn is_valid_bpm(bpm: f64) -> bool {
        (Self::MIN_BPM..=Self::MAX_BPM).contains(&bpm)
    }

    /// Get BPM value
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Duration of one beat in seconds
    pub fn beat_duration_seconds(&self) -> f64 {
        60.0 / self.bpm
    }

    /// Tempo scaled by a game speed multiplier
    ///
    /// Non-positive or non-finite multipliers leave the tempo unchanged, and the
    /// result is kept inside the valid BPM range.
    pub fn scaled(&self, multiplier: f64) -> Self {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            return *self;
        }
        Self {
            bpm: (self.bpm * multiplier).clamp(Self::MIN_BPM, Self::MAX_BPM),
        }
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::new(120.0)
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} BPM", self.bpm)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid note value '{0}' (expected e.g. \"8n\", \"4n.\" or \"1m\")")]
pub struct NoteValueParseError(pub String);

/// A note duration relative to the beat, written "8n" (eighth note),
/// "4n." (dotted quarter) or "1m" (one 4/4 measure)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NoteValue {
    /// 1/division of a whole note, optionally dotted
    Division { division: u8, dotted: bool },
    /// Whole 4/4 measures
    Measures(u8),
}

impl NoteValue {
    pub const QUARTER: NoteValue = NoteValue::Division {
        division: 4,
        dotted: false,
    };
    pub const EIGHTH: NoteValue = NoteValue::Division {
        division: 8,
        dotted: false,
    };
    pub const SIXTEENTH: NoteValue = NoteValue::Division {
        division: 16,
        dotted: false,
    };

    /// Length in quarter-note beats
    pub fn beats(&self) -> f64 {
        match *self {
            NoteValue::Division { division, dotted } => {
                let beats = 4.0 / division as f64;
                if dotted { beats * 1.5 } else { beats }
            }
            NoteValue::Measures(count) => count as f64 * 4.0,
        }
    }

    /// Length in seconds at the given tempo
    pub fn seconds(&self, tempo: &Tempo) -> f64 {
        self.beats() * tempo.beat_duration_seconds()
    }
}

impl Default for NoteValue {
    fn default() -> Self {
        Self::EIGHTH
    }
}

impl fmt::Display for NoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            NoteValue::Division { division, dotted } => {
                write!(f, "{}n{}", division, if dotted { "." } else { "" })
            }
            NoteValue::Measures(count) => write!(f, "{}m", count),
        }
    }
}

impl FromStr for NoteValue {
    type Err = NoteValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || NoteValueParseError(s.to_string());
        let trimmed = s.trim();

        if let Some(count) = trimmed.strip_suffix('m') {
            let count: u8 = count.parse().map_err(|_| err())?;
            if count == 0 {
                return Err(err());
            }
            return Ok(NoteValue::Measures(count));
        }

        let (body, dotted) = match trimmed.strip_suffix('.') {
            Some(body) => (body, true),
            None => (trimmed, false),
        };
        let division: u8 = body
            .strip_suffix('n')
            .ok_or_else(err)?
            .parse()
            .map_err(|_| err())?;

        if !division.is_power_of_two() || division > 64 {
            return Err(err());
        }

        Ok(NoteValue::Division { division, dotted })
    }
}

impl TryFrom<String> for NoteValue {
    type Error = NoteValueParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NoteValue> for String {
    fn from(value: NoteValue) -> Self {
        value.to_string()
    }
}

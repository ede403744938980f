// Game events - the inbound channel boundary
//
// The game publishes loosely shaped records `{ message, tempo, spawns? }`.
// They are turned into the closed `GameEvent` enum here; anything that does
// not map is an `EventError` and never reaches the sequencer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire tags, as sent by the game
pub mod tags {
    pub const GAME_STARTED: &str = "gameStarted";
    pub const PLAYER_JUMPED: &str = "playerJumped";
    pub const OBSTACLE_SPAWNED: &str = "obstacleSpawned";
    pub const TEMPO_INCREASE: &str = "tempoIncrease";
    pub const TEMPO_DECREASE: &str = "tempoDecrease";
    pub const GAME_OVER: &str = "gameOver";
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("Unknown Message: {0}")]
    UnrecognizedEvent(String),

    #[error("Malformed event record: {0}")]
    Malformed(String),
}

/// Raw record from the game's audio port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioMessage {
    pub message: String,
    pub tempo: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawns: Option<i64>,
}

impl AudioMessage {
    pub fn new(message: impl Into<String>, tempo: f64) -> Self {
        Self {
            message: message.into(),
            tempo,
            spawns: None,
        }
    }

    pub fn with_spawns(mut self, spawns: i64) -> Self {
        self.spawns = Some(spawns);
        self
    }
}

/// Decode one JSON record (one line of an event log)
pub fn parse_record(line: &str) -> Result<AudioMessage, EventError> {
    serde_json::from_str(line).map_err(|e| EventError::Malformed(e.to_string()))
}

/// Game-state event with its tempo (speed multiplier)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    GameStarted { tempo: f64 },
    PlayerJumped { tempo: f64 },
    /// `spawn_index` is the game's own spawn count when it reports one
    ObstacleSpawned { tempo: f64, spawn_index: Option<i64> },
    TempoIncrease { tempo: f64 },
    TempoDecrease { tempo: f64 },
    GameOver { tempo: f64 },
}

impl GameEvent {
    pub fn tempo(&self) -> f64 {
        match *self {
            GameEvent::GameStarted { tempo }
            | GameEvent::PlayerJumped { tempo }
            | GameEvent::ObstacleSpawned { tempo, .. }
            | GameEvent::TempoIncrease { tempo }
            | GameEvent::TempoDecrease { tempo }
            | GameEvent::GameOver { tempo } => tempo,
        }
    }

    /// Wire tag for this event
    pub fn tag(&self) -> &'static str {
        match self {
            GameEvent::GameStarted { .. } => tags::GAME_STARTED,
            GameEvent::PlayerJumped { .. } => tags::PLAYER_JUMPED,
            GameEvent::ObstacleSpawned { .. } => tags::OBSTACLE_SPAWNED,
            GameEvent::TempoIncrease { .. } => tags::TEMPO_INCREASE,
            GameEvent::TempoDecrease { .. } => tags::TEMPO_DECREASE,
            GameEvent::GameOver { .. } => tags::GAME_OVER,
        }
    }

    /// Back to the wire shape
    pub fn to_message(&self) -> AudioMessage {
        let message = AudioMessage::new(self.tag(), self.tempo());
        match *self {
            GameEvent::ObstacleSpawned {
                spawn_index: Some(index),
                ..
            } => message.with_spawns(index),
            _ => message,
        }
    }
}

impl TryFrom<&AudioMessage> for GameEvent {
    type Error = EventError;

    fn try_from(record: &AudioMessage) -> Result<Self, Self::Error> {
        let tempo = record.tempo;
        let event = match record.message.as_str() {
            tags::GAME_STARTED => GameEvent::GameStarted { tempo },
            tags::PLAYER_JUMPED => GameEvent::PlayerJumped { tempo },
            tags::OBSTACLE_SPAWNED => GameEvent::ObstacleSpawned {
                tempo,
                spawn_index: record.spawns,
            },
            tags::TEMPO_INCREASE => GameEvent::TempoIncrease { tempo },
            tags::TEMPO_DECREASE => GameEvent::TempoDecrease { tempo },
            tags::GAME_OVER => GameEvent::GameOver { tempo },
            other => return Err(EventError::UnrecognizedEvent(other.to_string())),
        };
        Ok(event)
    }
}

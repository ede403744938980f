// Session state and event dispatch
//
// Two phases: Idle (before the first gameStarted, after gameOver) and Running.
// `on_event` is pure: the caller owns the state and passes it back in.

use serde::{Deserialize, Serialize};

use super::policy::{compute_velocity, select_note};
use super::voice::{Voice, VoiceId};
use crate::config::{Cue, SequencerConfig};
use crate::event::GameEvent;
use crate::messaging::command::AudioCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Running,
}

/// Per-session counter plus phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: Phase,
    /// Obstacle position; starts at the configured reset offset
    pub spawns: i64,
}

impl SessionState {
    /// Idle state as it would be right after a reset
    pub fn idle(config: &SequencerConfig) -> Self {
        Self {
            phase: Phase::Idle,
            spawns: config.reset_offset,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}

/// Map one game event to audio commands and the next state
pub fn on_event(
    config: &SequencerConfig,
    event: &GameEvent,
    state: SessionState,
) -> (Vec<AudioCommand>, SessionState) {
    match *event {
        GameEvent::GameStarted { .. } => {
            let next = SessionState {
                phase: Phase::Running,
                spawns: config.reset_offset,
            };
            (cue_commands(config, &config.start_cues), next)
        }

        GameEvent::GameOver { .. } => {
            (cue_commands(config, &config.over_cues), SessionState::idle(config))
        }

        GameEvent::PlayerJumped { tempo } => {
            if !state.is_running() {
                tracing::debug!("playerJumped while idle, ignored");
                return (Vec::new(), state);
            }

            let commands = role_voice(config, config.jump_voice)
                .map(|voice| vec![tempo_command(voice, state.spawns, tempo)])
                .unwrap_or_default();
            (commands, state)
        }

        GameEvent::ObstacleSpawned { tempo, spawn_index } => {
            if !state.is_running() {
                tracing::debug!("obstacleSpawned while idle, ignored");
                return (Vec::new(), state);
            }

            // A count reported by the game wins over our own increment
            let spawns = match spawn_index {
                Some(index) => config.reset_offset.saturating_add(index),
                None => state.spawns.saturating_add(1),
            };
            let next = SessionState { spawns, ..state };

            let mut commands = Vec::with_capacity(2);
            if let Some(obstacle) = role_voice(config, config.obstacle_voice) {
                commands.push(tempo_command(obstacle, spawns, tempo));

                if spawns > obstacle.table_len() as i64 {
                    if let Some(layer) = role_voice(config, config.layer_voice) {
                        commands.push(tempo_command(layer, spawns, tempo));
                    }
                }
            }
            (commands, next)
        }

        // Reserved: accepted, no sound yet
        GameEvent::TempoIncrease { .. } | GameEvent::TempoDecrease { .. } => (Vec::new(), state),
    }
}

fn role_voice(config: &SequencerConfig, role: Option<VoiceId>) -> Option<&Voice> {
    role.and_then(|id| config.voice(id))
}

fn tempo_command(voice: &Voice, spawns: i64, tempo: f64) -> AudioCommand {
    AudioCommand::attack_release(
        voice.id,
        select_note(voice, spawns),
        voice.note_value,
        compute_velocity(tempo, voice.velocity_scale, voice.velocity_cap),
    )
    .with_tempo(tempo)
}

fn cue_commands(config: &SequencerConfig, cues: &[Cue]) -> Vec<AudioCommand> {
    cues.iter()
        .map(|cue| {
            AudioCommand::attack_release(
                cue.voice,
                cue.note,
                config.cue_note_value,
                config.cue_velocity,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::presets;

    fn notes(commands: &[AudioCommand]) -> Vec<String> {
        commands.iter().map(|c| c.note.to_string()).collect()
    }

    #[test]
    fn test_game_started_resets_and_runs() {
        let config = presets::layered();
        let dirty = SessionState {
            phase: Phase::Running,
            spawns: 41,
        };

        let (commands, state) = on_event(&config, &GameEvent::GameStarted { tempo: 1.0 }, dirty);

        assert_eq!(
            state,
            SessionState {
                phase: Phase::Running,
                spawns: -2
            }
        );
        assert_eq!(notes(&commands), ["C4", "C2"]);
        assert!(commands.iter().all(|c| c.velocity == config.cue_velocity));
        assert!(commands.iter().all(|c| c.duration == Some(config.cue_note_value)));
    }

    #[test]
    fn test_obstacles_follow_offset() {
        let config = presets::layered();
        let start = GameEvent::GameStarted { tempo: 1.0 };
        let (_, state) = on_event(&config, &start, SessionState::default());

        let spawn = |n| GameEvent::ObstacleSpawned {
            tempo: 1.0,
            spawn_index: Some(n),
        };
        let (first, state) = on_event(&config, &spawn(1), state);
        assert_eq!(state.spawns, -1);
        let (second, state) = on_event(&config, &spawn(2), state);
        assert_eq!(state.spawns, 0);

        // Bass table: C3 G2 A2 E2 F2 C2 F2 G2
        assert_eq!(notes(&first), ["G2"]);
        assert_eq!(notes(&second), ["C3"]);
    }

    #[test]
    fn test_obstacle_without_index_increments() {
        let config = presets::layered();
        let running = SessionState {
            phase: Phase::Running,
            spawns: 3,
        };
        let event = GameEvent::ObstacleSpawned {
            tempo: 1.0,
            spawn_index: None,
        };
        let (commands, state) = on_event(&config, &event, running);
        assert_eq!(state.spawns, 4);
        assert_eq!(notes(&commands), ["F2"]);
        assert_eq!(commands[0].velocity, 0.3);
    }

    #[test]
    fn test_melody_layers_after_bass_table() {
        let config = presets::layered();
        let at = |spawns| SessionState {
            phase: Phase::Running,
            spawns,
        };
        let event = GameEvent::ObstacleSpawned {
            tempo: 1.0,
            spawn_index: None,
        };

        let (commands, _) = on_event(&config, &event, at(7));
        assert_eq!(commands.len(), 1, "spawns == table length is not past it");

        let (commands, state) = on_event(&config, &event, at(8));
        assert_eq!(state.spawns, 9);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1].voice, VoiceId::Melody);
        // Melody index 9 % 8 = 1 -> D4, one octave up
        assert_eq!(commands[1].note.to_string(), "D5");
    }

    #[test]
    fn test_player_jump_uses_spawns_and_tempo() {
        let config = presets::layered();
        let running = SessionState {
            phase: Phase::Running,
            spawns: 2,
        };

        let (commands, state) = on_event(&config, &GameEvent::PlayerJumped { tempo: 2.0 }, running);
        assert_eq!(state, running);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].voice, VoiceId::Player);
        assert_eq!(commands[0].note.to_string(), "G5");
        assert_eq!(commands[0].velocity, 0.5);
        assert_eq!(commands[0].tempo, 2.0);

        let (commands, _) = on_event(&config, &GameEvent::PlayerJumped { tempo: 10.0 }, running);
        assert_eq!(commands[0].velocity, 0.6);
    }

    #[test]
    fn test_non_positive_tempo_passes_through() {
        let config = presets::layered();
        let running = SessionState {
            phase: Phase::Running,
            spawns: 0,
        };

        let (commands, _) = on_event(&config, &GameEvent::PlayerJumped { tempo: 0.0 }, running);
        assert_eq!(commands[0].velocity, 0.0);

        let event = GameEvent::ObstacleSpawned {
            tempo: -2.0,
            spawn_index: None,
        };
        let (commands, state) = on_event(&config, &event, running);
        assert_eq!(state.spawns, 1);
        // Bass scale 0.3: -0.6 stays under the cap and is not raised to zero
        assert_eq!(commands[0].velocity, -0.6);
        assert_eq!(commands[0].tempo, -2.0);
    }

    #[test]
    fn test_cues_stay_at_base_speed() {
        let config = presets::layered();
        let (start, state) =
            on_event(&config, &GameEvent::GameStarted { tempo: 3.0 }, SessionState::default());
        let (over, _) = on_event(&config, &GameEvent::GameOver { tempo: 0.5 }, state);

        assert!(start.iter().chain(&over).all(|c| c.tempo == 1.0));
    }

    #[test]
    fn test_idle_tolerates_gameplay_events() {
        let config = presets::layered();
        let idle = SessionState::idle(&config);

        for event in [
            GameEvent::PlayerJumped { tempo: 1.0 },
            GameEvent::ObstacleSpawned {
                tempo: 1.0,
                spawn_index: Some(5),
            },
            GameEvent::TempoIncrease { tempo: 1.0 },
            GameEvent::TempoDecrease { tempo: 1.0 },
        ] {
            let (commands, state) = on_event(&config, &event, idle);
            assert!(commands.is_empty(), "{:?}", event);
            assert_eq!(state, idle);
        }
    }

    #[test]
    fn test_tempo_changes_are_noops_while_running() {
        let config = presets::layered();
        let running = SessionState {
            phase: Phase::Running,
            spawns: 5,
        };
        for event in [
            GameEvent::TempoIncrease { tempo: 3.0 },
            GameEvent::TempoDecrease { tempo: 0.5 },
        ] {
            let (commands, state) = on_event(&config, &event, running);
            assert!(commands.is_empty());
            assert_eq!(state, running);
        }
    }

    #[test]
    fn test_game_over_is_state_independent() {
        let config = presets::layered();
        let event = GameEvent::GameOver { tempo: 1.0 };

        let (from_idle, idle_next) = on_event(&config, &event, SessionState::idle(&config));
        let running = SessionState {
            phase: Phase::Running,
            spawns: 1234,
        };
        let (from_running, running_next) = on_event(&config, &event, running);

        assert_eq!(from_idle, from_running);
        assert_eq!(notes(&from_idle), ["C2", "G1", "C1"]);
        assert_eq!(idle_next, SessionState::idle(&config));
        assert_eq!(running_next, SessionState::idle(&config));
    }

    #[test]
    fn test_minimal_preset_only_cues() {
        let config = presets::minimal();
        let (start, state) =
            on_event(&config, &GameEvent::GameStarted { tempo: 1.0 }, SessionState::default());
        assert_eq!(notes(&start), ["C4"]);

        let (jump, state) = on_event(&config, &GameEvent::PlayerJumped { tempo: 1.0 }, state);
        assert!(jump.is_empty());
        let event = GameEvent::ObstacleSpawned {
            tempo: 1.0,
            spawn_index: None,
        };
        let (spawn, state) = on_event(&config, &event, state);
        assert!(spawn.is_empty());
        assert_eq!(state.spawns, 1);

        let (over, _) = on_event(&config, &GameEvent::GameOver { tempo: 1.0 }, state);
        assert_eq!(notes(&over), ["C2"]);
    }
}

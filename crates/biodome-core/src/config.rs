//! Engine configuration.

use std::time::Duration;

use biodome_logic::constants::{MAX_PLAYERS, READY_PLAYERS_TO_START, ROUND_DURATION_SECS};

#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Countdown length once the game starts.
    pub round_duration: Duration,
    /// Ready players (with a room) needed to fire the start transition.
    pub ready_to_start: usize,
    /// Maximum concurrent players.
    pub max_players: usize,
    /// Spawn the real countdown thread on game start. Tests and the
    /// headless harness leave this off and drive deadline handling by hand.
    pub spawn_countdown: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_duration: Duration::from_secs(ROUND_DURATION_SECS),
            ready_to_start: READY_PLAYERS_TO_START,
            max_players: MAX_PLAYERS,
            spawn_countdown: true,
        }
    }
}

impl GameConfig {
    /// Defaults with the countdown thread disabled.
    pub fn headless() -> Self {
        Self {
            spawn_countdown: false,
            ..Self::default()
        }
    }
}

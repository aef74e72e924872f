//! Per-game limits and setup knobs.

use std::path::PathBuf;

use chrono::Duration;

use crate::game_state::chess_rules::PIECES_PER_PLAYER;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Moves after which the game is drawn. Also the history capacity.
    pub max_turns: usize,
    /// Full rounds without capture or pawn move before the game is drawn.
    pub no_progress_rounds: u32,
    pub repetition_limit: u32,
    pub pieces_per_player: usize,
    /// Where the pattern cache lives; `None` always rebuilds.
    pub cache_dir: Option<PathBuf>,
    /// Clock budget per player for the whole game.
    pub turn_time: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_turns: 120,
            no_progress_rounds: 50,
            repetition_limit: 3,
            pieces_per_player: PIECES_PER_PLAYER,
            cache_dir: None,
            turn_time: Duration::seconds(600),
        }
    }
}

impl GameConfig {
    /// Moves without progress that draw a game of `players` participants.
    #[inline]
    pub fn no_progress_limit(&self, players: usize) -> u32 {
        self.no_progress_rounds.saturating_mul(players as u32)
    }
}

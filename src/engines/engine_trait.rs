//! Search contract for automated players.
//!
//! The controller hands an engine a read-only game plus a budget and gets a
//! move back. Engines copy the game for anything they simulate.

use crate::game_state::chess_types::Move;
use crate::game_state::game_state::GameState;

#[derive(Debug, Clone, Default)]
pub struct GoParams {
    /// Overrides the engine's configured simulation budget.
    pub simulations: Option<u64>,
    /// Overrides the engine's configured move time.
    pub movetime_ms: Option<u64>,
    /// Time left on the mover's clock; engines never plan past it.
    pub remaining_ms: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    pub best_move: Option<Move>,
    pub info_lines: Vec<String>,
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn new_game(&mut self) {}

    fn set_option(&mut self, _name: &str, _value: &str) -> Result<(), String> {
        Ok(())
    }

    /// `best_move` is `None` only when the game offers no legal move.
    fn choose_move(&mut self, game_state: &GameState, params: &GoParams) -> Result<EngineOutput, String>;
}

pub(crate) fn parse_option<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, String> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| format!("invalid {name} value '{value}'"))
}

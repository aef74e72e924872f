use crate::game_state::chess_types::Move;
use crate::game_state::position::Position;

/// Source of moves for one team on a position. Implementations may mutate
/// the position while probing but must leave it as they found it.
pub trait MoveGenerator: Send + Sync {
    fn generate_moves(&self, position: &mut Position, team: usize) -> Vec<Move>;
}

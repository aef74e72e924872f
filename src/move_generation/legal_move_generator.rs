//! Full legal move generation pipeline.
//!
//! Generates pseudo-legal moves, applies each candidate, and drops those that
//! leave the mover's own king attacked. Castling also needs every tile on the
//! king's path to be safe.

use crate::game_state::chess_types::{Move, PieceSlot};
use crate::game_state::position::Position;
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_move_checks::{is_in_check, is_king_attacked_on};
use crate::move_generation::move_generator::MoveGenerator;
use crate::move_generation::pseudo_legal::generate_pseudo_legal;

pub struct LegalMoveGenerator;

/// Unfiltered generator; handy for checking the filter against.
pub struct PseudoLegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn generate_moves(&self, position: &mut Position, team: usize) -> Vec<Move> {
        legal_moves(position, team)
    }
}

impl MoveGenerator for PseudoLegalMoveGenerator {
    fn generate_moves(&self, position: &mut Position, team: usize) -> Vec<Move> {
        let mut out = Vec::with_capacity(64);
        generate_pseudo_legal(position, team, &mut out);
        out
    }
}

pub fn legal_moves(position: &mut Position, team: usize) -> Vec<Move> {
    let mut pseudo = Vec::with_capacity(64);
    generate_pseudo_legal(position, team, &mut pseudo);
    filter_legal(position, team, pseudo)
}

/// Keep the moves after which `team` is not in check. The position is
/// restored before returning.
pub fn filter_legal(position: &mut Position, team: usize, pseudo_legal: Vec<Move>) -> Vec<Move> {
    let mut legal = Vec::with_capacity(pseudo_legal.len());
    for mv in pseudo_legal {
        if mv.castle_side().is_some() && !castle_path_is_safe(position, mv, team) {
            continue;
        }
        let record = make_move(position, mv);
        let exposed = is_in_check(position, team);
        unmake_move(position, &record);
        if !exposed {
            legal.push(mv);
        }
    }
    legal
}

/// Start tile, transit tiles and destination all unattacked.
fn castle_path_is_safe(position: &mut Position, mv: Move, team: usize) -> bool {
    let Some(path) = mv
        .castle_side()
        .and_then(|side| position.board().castling(team, side))
        .map(|rule| rule.king_path.clone())
    else {
        return false;
    };
    let king: PieceSlot = mv.piece;
    path.into_iter()
        .all(|tile| !is_king_attacked_on(position, king, tile, team))
}

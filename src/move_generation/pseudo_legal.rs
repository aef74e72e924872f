//! Pseudo-legal move generation from the flattened pattern table.
//!
//! Sliders stop at the first occupied tile on each ray, capturing it when it
//! holds an enemy piece. Rays that share a prefix after a pentagon would
//! otherwise yield the same destination twice; a per-piece tile set drops the
//! repeats. Castling is emitted here when the structural conditions hold; the
//! attacked-path test belongs to the legality filter.

use crate::board::tile::{TileId, TileSet};
use crate::game_state::chess_rules::CastleSide;
use crate::game_state::chess_types::{
    Move, PieceKind, PieceRecord, PieceSlot, FLAG_CAPTURE, FLAG_CASTLE_KING_SIDE,
    FLAG_CASTLE_QUEEN_SIDE, FLAG_PAWN_MOVE, FLAG_PROMOTION,
};
use crate::game_state::position::Position;
use crate::patterns::pattern_table::PatternKind;

/// Every pseudo-legal move of `team`, appended to `out`.
pub fn generate_pseudo_legal(position: &Position, team: usize, out: &mut Vec<Move>) {
    for (slot, piece) in position.team_pieces(team) {
        match piece.kind {
            PieceKind::Tower => slider_moves(position, slot, piece, &[PatternKind::Tower], out),
            PieceKind::Bishop => slider_moves(position, slot, piece, &[PatternKind::Bishop], out),
            PieceKind::Queen => slider_moves(
                position,
                slot,
                piece,
                &[PatternKind::Tower, PatternKind::Bishop],
                out,
            ),
            PieceKind::Knight => jump_moves(position, slot, piece, PatternKind::Knight, out),
            PieceKind::King => {
                jump_moves(position, slot, piece, PatternKind::King, out);
                castle_moves(position, slot, piece, out);
            }
            PieceKind::Pawn => pawn_moves(position, slot, piece, out),
        }
    }
}

/// Convenience wrapper returning a fresh vector.
pub fn pseudo_legal_moves(position: &Position, team: usize) -> Vec<Move> {
    let mut out = Vec::with_capacity(64);
    generate_pseudo_legal(position, team, &mut out);
    out
}

#[inline]
fn is_enemy(piece: &PieceRecord, owner: u8) -> bool {
    piece.owner != owner
}

fn slider_moves(position: &Position, slot: PieceSlot, piece: &PieceRecord, kinds: &[PatternKind], out: &mut Vec<Move>) {
    let patterns = &position.board().patterns;
    let mut seen = TileSet::new();
    for &kind in kinds {
        for ray in patterns.rays(piece.tile, kind) {
            for &to in ray {
                match position.piece_at(to) {
                    None => {
                        if seen.insert(to) {
                            out.push(Move::new(slot, piece.tile, to, 0));
                        }
                    }
                    Some(target) => {
                        if is_enemy(target, piece.owner) && seen.insert(to) {
                            out.push(Move::new(slot, piece.tile, to, FLAG_CAPTURE));
                        }
                        break;
                    }
                }
            }
        }
    }
}

fn jump_moves(position: &Position, slot: PieceSlot, piece: &PieceRecord, kind: PatternKind, out: &mut Vec<Move>) {
    for &to in position.board().patterns.targets(piece.tile, kind) {
        match position.piece_at(to) {
            None => out.push(Move::new(slot, piece.tile, to, 0)),
            Some(target) if is_enemy(target, piece.owner) => {
                out.push(Move::new(slot, piece.tile, to, FLAG_CAPTURE));
            }
            Some(_) => {}
        }
    }
}

fn pawn_moves(position: &Position, slot: PieceSlot, piece: &PieceRecord, out: &mut Vec<Move>) {
    let patterns = &position.board().patterns;
    let team = piece.owner;
    let promote = |to: TileId| {
        if patterns.is_promotion_tile(team as usize, to) {
            FLAG_PROMOTION
        } else {
            0
        }
    };

    let mut seen = TileSet::new();
    for ray in patterns.rays(piece.tile, PatternKind::PawnMove(team)) {
        for &to in ray {
            if position.occupant(to).is_some() {
                break;
            }
            if seen.insert(to) {
                out.push(Move::new(slot, piece.tile, to, FLAG_PAWN_MOVE | promote(to)));
            }
        }
    }

    for &to in patterns.targets(piece.tile, PatternKind::PawnAttack(team)) {
        if let Some(target) = position.piece_at(to) {
            if is_enemy(target, team) && seen.insert(to) {
                out.push(Move::new(
                    slot,
                    piece.tile,
                    to,
                    FLAG_PAWN_MOVE | FLAG_CAPTURE | promote(to),
                ));
            }
        }
    }
}

/// King and rook unmoved on their home tiles and nothing in between.
fn castle_moves(position: &Position, slot: PieceSlot, king: &PieceRecord, out: &mut Vec<Move>) {
    if king.has_moved {
        return;
    }
    let board = position.board();
    for side in CastleSide::BOTH {
        let Some(rule) = board.castling(king.owner as usize, side) else {
            continue;
        };
        if king.tile != rule.king_from {
            continue;
        }
        let rook_ready = position.piece_at(rule.rook_from).is_some_and(|rook| {
            rook.kind == PieceKind::Tower && rook.owner == king.owner && !rook.has_moved
        });
        if !rook_ready || rule.between.iter().any(|t| position.occupant(*t).is_some()) {
            continue;
        }
        let flag = match side {
            CastleSide::King => FLAG_CASTLE_KING_SIDE,
            CastleSide::Queen => FLAG_CASTLE_QUEEN_SIDE,
        };
        out.push(Move::new(slot, rule.king_from, rule.king_to, flag));
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use super::*;
    use crate::board::board::Board;
    use crate::board::topology::{BoardSize, Variant};
    use crate::game_state::position::position_from_names;

    fn normal() -> Arc<Board> {
        Board::build(BoardSize::EIGHT, Variant::Normal, None).expect("board should build")
    }

    fn wormhole() -> Arc<Board> {
        Board::build(BoardSize::EIGHT, Variant::Wormhole, None).expect("board should build")
    }

    fn destinations(board: &Board, moves: &[Move], from: &str) -> BTreeSet<String> {
        let from = board.tile_id(from).expect("origin should exist");
        moves
            .iter()
            .filter(|m| m.from == from)
            .map(|m| board.tile_name(m.to).to_owned())
            .collect()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn tower_stops_at_first_piece_and_captures_only_enemies() {
        let b = normal();
        let pos = position_from_names(
            &b,
            &[
                (0, PieceKind::King, "h1"),
                (0, PieceKind::Tower, "a1"),
                (0, PieceKind::Pawn, "c1"),
                (1, PieceKind::King, "h8"),
                (1, PieceKind::Knight, "a4"),
            ],
            &[0, 1],
        );
        let moves = pseudo_legal_moves(&pos, 0);
        assert_eq!(destinations(&b, &moves, "a1"), set(&["a2", "a3", "a4", "b1"]));
        let a4 = b.tile_id("a4").expect("a4 should exist");
        assert!(moves.iter().any(|m| m.to == a4 && m.is_capture()));
    }

    #[test]
    fn knight_ignores_blockers() {
        let b = normal();
        let pos = position_from_names(
            &b,
            &[
                (0, PieceKind::King, "h1"),
                (0, PieceKind::Knight, "b1"),
                (0, PieceKind::Pawn, "a2"),
                (0, PieceKind::Pawn, "b2"),
                (0, PieceKind::Pawn, "c2"),
                (1, PieceKind::King, "h8"),
            ],
            &[0, 1],
        );
        let moves = pseudo_legal_moves(&pos, 0);
        assert_eq!(destinations(&b, &moves, "b1"), set(&["a3", "c3", "d2"]));
    }

    #[test]
    fn pawn_pushes_never_capture_and_diagonals_need_a_target() {
        let b = normal();
        let pos = position_from_names(
            &b,
            &[
                (0, PieceKind::King, "h1"),
                (0, PieceKind::Pawn, "e2"),
                (1, PieceKind::King, "h8"),
                (1, PieceKind::Pawn, "e4"),
                (1, PieceKind::Bishop, "d3"),
            ],
            &[0, 1],
        );
        let moves = pseudo_legal_moves(&pos, 0);
        assert_eq!(destinations(&b, &moves, "e2"), set(&["e3", "d3"]));
    }

    #[test]
    fn pawn_reaching_last_row_is_flagged_for_promotion() {
        let b = normal();
        let pos = position_from_names(
            &b,
            &[(0, PieceKind::King, "h1"), (0, PieceKind::Pawn, "a7"), (1, PieceKind::King, "h8")],
            &[0, 1],
        );
        let moves = pseudo_legal_moves(&pos, 0);
        let a8 = b.tile_id("a8").expect("a8 should exist");
        let push = moves.iter().find(|m| m.to == a8).expect("a7-a8 should be generated");
        assert!(push.is_promotion());
    }

    #[test]
    fn queen_rays_through_a_pentagon_are_not_duplicated() {
        let b = wormhole();
        let pos = position_from_names(
            &b,
            &[(0, PieceKind::King, "h1_T"), (0, PieceKind::Queen, "c2_T"), (3, PieceKind::King, "h8_B")],
            &[0, 3],
        );
        let moves = pseudo_legal_moves(&pos, 0);
        let c2 = b.tile_id("c2_T").expect("c2_T should exist");
        let from_queen: Vec<&Move> = moves.iter().filter(|m| m.from == c2).collect();
        let unique: BTreeSet<TileId> = from_queen.iter().map(|m| m.to).collect();
        assert_eq!(unique.len(), from_queen.len());
        let names = destinations(&b, &moves, "c2_T");
        for expected in ["c8_T", "c1_B", "a3_B", "d4_1_B"] {
            assert!(names.contains(expected), "queen on c2_T should reach {expected}");
        }
    }

    #[test]
    fn castling_requires_unmoved_pieces_and_an_empty_path() {
        let b = normal();
        let mut pos = position_from_names(
            &b,
            &[
                (0, PieceKind::King, "e1"),
                (0, PieceKind::Tower, "h1"),
                (0, PieceKind::Tower, "a1"),
                (0, PieceKind::Knight, "b1"),
                (1, PieceKind::King, "e8"),
            ],
            &[0, 1],
        );
        let castles: Vec<CastleSide> = pseudo_legal_moves(&pos, 0)
            .iter()
            .filter_map(|m| m.castle_side())
            .collect();
        assert_eq!(castles, vec![CastleSide::King]);

        let rook = pos.occupant(b.tile_id("h1").expect("h1 should exist")).expect("rook should stand on h1");
        pos.piece_mut(rook).has_moved = true;
        assert!(pseudo_legal_moves(&pos, 0).iter().all(|m| m.castle_side().is_none()));
    }
}

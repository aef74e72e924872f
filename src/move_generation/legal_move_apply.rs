//! Make/unmake on the flat position.
//!
//! `make_move` returns the record `unmake_move` needs; records must be undone
//! in strict LIFO order.

use crate::game_state::chess_types::{Move, PieceKind};
use crate::game_state::position::Position;
use crate::game_state::undo_state::{CastleRecord, MoveRecord};

pub fn make_move(position: &mut Position, mv: Move) -> MoveRecord {
    let mover = *position.piece(mv.piece);
    debug_assert!(!mover.captured, "moving a captured piece");
    debug_assert_eq!(mover.tile, mv.from, "move origin does not match piece tile");

    let owner = mover.owner as usize;
    let promotes = mover.kind == PieceKind::Pawn && position.board().patterns.is_promotion_tile(owner, mv.to);
    let castle_tiles = mv
        .castle_side()
        .and_then(|side| position.board().castling(owner, side))
        .map(|rule| (rule.rook_from, rule.rook_to));

    let captured = position.occupant(mv.to).filter(|s| *s != mv.piece);
    let mut eliminated = None;
    if let Some(slot) = captured {
        let victim = position.piece_mut(slot);
        debug_assert!(!victim.captured, "capturing an already captured piece");
        debug_assert_ne!(victim.owner, mover.owner, "capturing an own piece");
        victim.captured = true;
        let (kind, victim_owner) = (victim.kind, victim.owner);
        if kind == PieceKind::King && position.is_alive(victim_owner as usize) {
            position.set_alive(victim_owner as usize, false);
            eliminated = Some(victim_owner);
        }
    }

    let new_kind = if promotes { PieceKind::Queen } else { mover.kind };
    position.set_occupant(mv.from, None);
    position.set_occupant(mv.to, Some(mv.piece));
    {
        let piece = position.piece_mut(mv.piece);
        piece.tile = mv.to;
        piece.has_moved = true;
        piece.kind = new_kind;
    }

    let castle = castle_tiles.and_then(|(rook_from, rook_to)| {
        let rook = position.occupant(rook_from)?;
        let rook_had_moved = position.piece(rook).has_moved;
        position.set_occupant(rook_from, None);
        position.set_occupant(rook_to, Some(rook));
        let piece = position.piece_mut(rook);
        piece.tile = rook_to;
        piece.has_moved = true;
        Some(CastleRecord {
            rook,
            rook_from,
            rook_to,
            rook_had_moved,
        })
    });
    debug_assert_eq!(castle.is_some(), mv.castle_side().is_some(), "castling without a rook");

    MoveRecord {
        mv,
        prior_has_moved: mover.has_moved,
        prior_kind: mover.kind,
        new_kind,
        captured,
        castle,
        eliminated,
    }
}

pub fn unmake_move(position: &mut Position, record: &MoveRecord) {
    let mv = record.mv;

    if let Some(castle) = record.castle {
        position.set_occupant(castle.rook_to, None);
        position.set_occupant(castle.rook_from, Some(castle.rook));
        let rook = position.piece_mut(castle.rook);
        rook.tile = castle.rook_from;
        rook.has_moved = castle.rook_had_moved;
    }

    position.set_occupant(mv.to, None);
    position.set_occupant(mv.from, Some(mv.piece));
    {
        let piece = position.piece_mut(mv.piece);
        piece.tile = mv.from;
        piece.kind = record.prior_kind;
        piece.has_moved = record.prior_has_moved;
    }

    if let Some(slot) = record.captured {
        position.piece_mut(slot).captured = false;
        position.set_occupant(mv.to, Some(slot));
    }
    if let Some(team) = record.eliminated {
        position.set_alive(team as usize, true);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::board::board::Board;
    use crate::board::topology::{BoardSize, Variant};
    use crate::game_state::chess_types::FLAG_CASTLE_QUEEN_SIDE;
    use crate::game_state::position::position_from_names;
    use crate::move_generation::pseudo_legal::pseudo_legal_moves;
    use crate::search::zobrist::{compute_hash, update_hash};

    fn wormhole() -> Arc<Board> {
        Board::build(BoardSize::EIGHT, Variant::Wormhole, None).expect("board should build")
    }

    #[test]
    fn every_pseudo_legal_move_is_exactly_reversible() {
        let b = wormhole();
        let mut pos = position_from_names(
            &b,
            &[
                (0, PieceKind::King, "e1_T"),
                (0, PieceKind::Tower, "a1_T"),
                (0, PieceKind::Queen, "c2_T"),
                (0, PieceKind::Pawn, "d7_T"),
                (0, PieceKind::Knight, "d4_T"),
                (3, PieceKind::King, "e8_B"),
                (3, PieceKind::Pawn, "c3_B"),
                (3, PieceKind::Bishop, "d4_1_B"),
            ],
            &[0, 3],
        );
        let before = pos.clone();
        let hash = compute_hash(&pos);

        for mv in pseudo_legal_moves(&pos, 0) {
            let record = make_move(&mut pos, mv);
            let after = update_hash(hash, &record, &pos);
            assert_eq!(after, compute_hash(&pos), "incremental hash should match after {mv:?}");
            assert_eq!(update_hash(after, &record, &pos), hash);
            unmake_move(&mut pos, &record);
            assert_eq!(pos, before, "unmake should restore the position after {mv:?}");
        }
    }

    #[test]
    fn promotion_turns_a_pawn_into_a_queen_and_back() {
        let b = wormhole();
        let mut pos = position_from_names(
            &b,
            &[(0, PieceKind::King, "h1_T"), (0, PieceKind::Pawn, "a7_T"), (3, PieceKind::King, "h8_B")],
            &[0, 3],
        );
        let a8 = b.tile_id("a8_T").expect("a8_T should exist");
        let mv = pseudo_legal_moves(&pos, 0)
            .into_iter()
            .find(|m| m.to == a8)
            .expect("a7_T-a8_T should be generated");
        let record = make_move(&mut pos, mv);
        assert_eq!(pos.piece(mv.piece).kind, PieceKind::Queen);
        assert_eq!(record.prior_kind, PieceKind::Pawn);
        unmake_move(&mut pos, &record);
        assert_eq!(pos.piece(mv.piece).kind, PieceKind::Pawn);
    }

    #[test]
    fn capturing_a_king_eliminates_until_undone() {
        let b = wormhole();
        let mut pos = position_from_names(
            &b,
            &[
                (0, PieceKind::King, "h1_T"),
                (0, PieceKind::Tower, "a2_T"),
                (1, PieceKind::King, "a8_T"),
                (3, PieceKind::King, "h8_B"),
            ],
            &[0, 1, 3],
        );
        let a8 = b.tile_id("a8_T").expect("a8_T should exist");
        let mv = pseudo_legal_moves(&pos, 0)
            .into_iter()
            .find(|m| m.to == a8)
            .expect("tower should reach the black king");
        let record = make_move(&mut pos, mv);
        assert_eq!(record.eliminated, Some(1));
        assert!(!pos.is_alive(1));
        unmake_move(&mut pos, &record);
        assert!(pos.is_alive(1));
    }

    #[test]
    fn castling_moves_king_and_rook_together() {
        let b = wormhole();
        let mut pos = position_from_names(
            &b,
            &[(0, PieceKind::King, "e1_T"), (0, PieceKind::Tower, "a1_T"), (3, PieceKind::King, "h8_B")],
            &[0, 3],
        );
        let before = pos.clone();
        let mv = pseudo_legal_moves(&pos, 0)
            .into_iter()
            .find(|m| m.flags & FLAG_CASTLE_QUEEN_SIDE != 0)
            .expect("queen side castle should be generated");
        let record = make_move(&mut pos, mv);

        let c1 = b.tile_id("c1_T").expect("c1_T should exist");
        let d1 = b.tile_id("d1_T").expect("d1_T should exist");
        assert_eq!(pos.piece_at(c1).map(|p| p.kind), Some(PieceKind::King));
        assert_eq!(pos.piece_at(d1).map(|p| p.kind), Some(PieceKind::Tower));
        unmake_move(&mut pos, &record);
        assert_eq!(pos, before);
    }
}

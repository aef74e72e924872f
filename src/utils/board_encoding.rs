//! Compact per-tile occupancy encoding for external evaluators.
//!
//! One `i8` per tile id: `-1` when empty, otherwise
//! `piece_kind_index * 4 + owner`. Eliminated players' pieces are encoded like
//! any other.

use crate::game_state::chess_rules::MAX_TEAMS;
use crate::game_state::chess_types::{PieceKind, PIECE_KIND_COUNT};
use crate::game_state::position::Position;

pub const EMPTY_TILE: i8 = -1;

#[inline]
pub const fn encode_piece(kind: PieceKind, owner: u8) -> i8 {
    (kind.index() * MAX_TEAMS + owner as usize) as i8
}

/// Inverse of `encode_piece`; `None` for `EMPTY_TILE` or out-of-range codes.
pub fn decode_piece(code: i8) -> Option<(PieceKind, u8)> {
    if code < 0 {
        return None;
    }
    let code = code as usize;
    let kind = *PieceKind::ALL.get(code / MAX_TEAMS)?;
    Some((kind, (code % MAX_TEAMS) as u8))
}

pub fn encode_position(position: &Position) -> Vec<i8> {
    let mut out = vec![EMPTY_TILE; position.board().tile_count()];
    for (_, piece) in position.live_pieces() {
        out[piece.tile as usize] = encode_piece(piece.kind, piece.owner);
    }
    out
}

/// Number of distinct non-empty codes.
pub const CODE_COUNT: usize = PIECE_KIND_COUNT * MAX_TEAMS;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board::Board;
    use crate::board::topology::{BoardSize, Variant};
    use crate::game_state::position::position_from_names;

    #[test]
    fn encoding_marks_each_occupied_tile() {
        let b = Board::build(BoardSize::EIGHT, Variant::Wormhole, None).expect("board should build");
        let pos = position_from_names(&b, &[(0, PieceKind::King, "e1_T"), (3, PieceKind::Queen, "d4_2_B")], &[0, 3]);
        let encoded = encode_position(&pos);
        assert_eq!(encoded.len(), 144);
        assert_eq!(encoded.iter().filter(|c| **c != EMPTY_TILE).count(), 2);

        let queen_tile = b.tile_id("d4_2_B").expect("d4_2_B should exist") as usize;
        assert_eq!(encoded[queen_tile], 5 * 4 + 3);
        assert_eq!(decode_piece(encoded[queen_tile]), Some((PieceKind::Queen, 3)));
        assert!(decode_piece(CODE_COUNT as i8).is_none());
    }
}

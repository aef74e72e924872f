//! Zobrist hashing for repetition tracking and search memoization.
//!
//! One key per `(piece kind, owner, tile)`, drawn from a fixed seed so hashes
//! are stable across runs. Only piece placement is hashed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::tile::TileId;
use crate::game_state::chess_rules::MAX_TEAMS;
use crate::game_state::chess_types::{PieceKind, PIECE_KIND_COUNT};
use crate::game_state::position::Position;
use crate::game_state::undo_state::MoveRecord;

const ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZobristKeys {
    tile_count: usize,
    keys: Vec<u64>,
}

impl ZobristKeys {
    pub fn new(tile_count: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let keys = (0..PIECE_KIND_COUNT * MAX_TEAMS * tile_count)
            .map(|_| rng.random::<u64>())
            .collect();
        Self { tile_count, keys }
    }

    #[inline]
    pub fn key(&self, kind: PieceKind, owner: u8, tile: TileId) -> u64 {
        let row = kind.index() * MAX_TEAMS + owner as usize;
        self.keys[row * self.tile_count + tile as usize]
    }
}

/// Full recompute over every piece still on the board.
pub fn compute_hash(position: &Position) -> u64 {
    let keys = &position.board().zobrist;
    position
        .live_pieces()
        .fold(0u64, |h, (_, p)| h ^ keys.key(p.kind, p.owner, p.tile))
}

/// Incremental update for one made move. Applying it a second time with the
/// same record undoes it, so the same call serves make and undo.
pub fn update_hash(hash: u64, record: &MoveRecord, position: &Position) -> u64 {
    let keys = &position.board().zobrist;
    let owner = position.piece(record.mv.piece).owner;
    let mut h = hash;
    h ^= keys.key(record.prior_kind, owner, record.mv.from);
    h ^= keys.key(record.new_kind, owner, record.mv.to);

    if let Some(slot) = record.captured {
        let victim = position.piece(slot);
        h ^= keys.key(victim.kind, victim.owner, record.mv.to);
    }
    if let Some(castle) = &record.castle {
        h ^= keys.key(PieceKind::Tower, owner, castle.rook_from);
        h ^= keys.key(PieceKind::Tower, owner, castle.rook_to);
    }
    h
}

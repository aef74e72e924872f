use crate::board::tile::TileId;
use crate::game_state::chess_types::{GameStatus, Move, PieceKind, PieceSlot};

/// Rook half of a castling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastleRecord {
    pub rook: PieceSlot,
    pub rook_from: TileId,
    pub rook_to: TileId,
    pub rook_had_moved: bool,
}

/// Everything `unmake_move` needs to restore the position exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub mv: Move,
    pub prior_has_moved: bool,
    pub prior_kind: PieceKind,
    /// Kind after the move; differs from `prior_kind` on promotion.
    pub new_kind: PieceKind,
    pub captured: Option<PieceSlot>,
    pub castle: Option<CastleRecord>,
    /// Team knocked out by this move capturing its king.
    pub eliminated: Option<u8>,
}

/// Committed history entry: the move plus the game counters it replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoState {
    pub record: MoveRecord,
    pub prev_hash: u64,
    pub prev_moves_without_progress: u32,
    pub prev_turn: usize,
    pub prev_status: GameStatus,
    /// Bit per team checkmated or stalemated out while the turn advanced.
    pub settled_out: u8,
}

//! Core value types: teams, piece kinds, piece records and moves.

use std::fmt;
use std::str::FromStr;

use crate::board::tile::TileId;
use crate::chess_errors::ConfigurationError;
use crate::game_state::chess_rules::CastleSide;

/// Index into the piece array.
pub type PieceSlot = u8;

/// Team colors in seat order. The numeric index doubles as the owner id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamColor {
    White,
    Black,
    Blue,
    Red,
}

impl TeamColor {
    pub const ALL: [TeamColor; 4] = [TeamColor::White, TeamColor::Black, TeamColor::Blue, TeamColor::Red];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            TeamColor::White => 0,
            TeamColor::Black => 1,
            TeamColor::Blue => 2,
            TeamColor::Red => 3,
        }
    }

    #[inline]
    pub fn from_index(index: usize) -> Option<TeamColor> {
        TeamColor::ALL.get(index).copied()
    }
}

impl fmt::Display for TeamColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TeamColor::White => "white",
            TeamColor::Black => "black",
            TeamColor::Blue => "blue",
            TeamColor::Red => "red",
        };
        f.write_str(name)
    }
}

impl FromStr for TeamColor {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "white" => Ok(TeamColor::White),
            "black" => Ok(TeamColor::Black),
            "blue" => Ok(TeamColor::Blue),
            "red" => Ok(TeamColor::Red),
            _ => Err(ConfigurationError::UnknownColor(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Tower,
    Knight,
    Bishop,
    King,
    Pawn,
    Queen,
}

pub const PIECE_KIND_COUNT: usize = 6;

impl PieceKind {
    pub const ALL: [PieceKind; PIECE_KIND_COUNT] = [
        PieceKind::Tower,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::King,
        PieceKind::Pawn,
        PieceKind::Queen,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Tower => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::King => 3,
            PieceKind::Pawn => 4,
            PieceKind::Queen => 5,
        }
    }

    #[inline]
    pub const fn is_minor(self) -> bool {
        matches!(self, PieceKind::Knight | PieceKind::Bishop)
    }

    pub const fn symbol(self) -> char {
        match self {
            PieceKind::Tower => 'R',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::King => 'K',
            PieceKind::Pawn => 'P',
            PieceKind::Queen => 'Q',
        }
    }
}

impl FromStr for PieceKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tower" | "rook" => Ok(PieceKind::Tower),
            "knight" => Ok(PieceKind::Knight),
            "bishop" => Ok(PieceKind::Bishop),
            "king" => Ok(PieceKind::King),
            "pawn" => Ok(PieceKind::Pawn),
            "queen" => Ok(PieceKind::Queen),
            _ => Err(ConfigurationError::UnknownPiece(s.to_owned())),
        }
    }
}

/// One slot of the piece array. Captured pieces keep their last tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceRecord {
    pub kind: PieceKind,
    pub owner: u8,
    pub tile: TileId,
    pub has_moved: bool,
    pub captured: bool,
}

pub const FLAG_CAPTURE: u8 = 1 << 0;
pub const FLAG_PROMOTION: u8 = 1 << 1;
pub const FLAG_CASTLE_KING_SIDE: u8 = 1 << 2;
pub const FLAG_CASTLE_QUEEN_SIDE: u8 = 1 << 3;
pub const FLAG_PAWN_MOVE: u8 = 1 << 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub piece: PieceSlot,
    pub from: TileId,
    pub to: TileId,
    pub flags: u8,
}

impl Move {
    #[inline]
    pub const fn new(piece: PieceSlot, from: TileId, to: TileId, flags: u8) -> Self {
        Self {
            piece,
            from,
            to,
            flags,
        }
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.flags & FLAG_CAPTURE != 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.flags & FLAG_PROMOTION != 0
    }

    #[inline]
    pub const fn castle_side(self) -> Option<CastleSide> {
        if self.flags & FLAG_CASTLE_KING_SIDE != 0 {
            Some(CastleSide::King)
        } else if self.flags & FLAG_CASTLE_QUEEN_SIDE != 0 {
            Some(CastleSide::Queen)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    MaxTurns,
    InsufficientMaterial,
    Repetition,
    NoProgress,
    Stalemate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    PlayerWon(usize),
    Draw(DrawReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EliminationReason {
    Checkmate,
    Stalemate,
    KingCaptured,
    Timeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_names_parse_case_insensitively() {
        assert_eq!("Tower".parse::<PieceKind>().expect("Tower should parse"), PieceKind::Tower);
        assert_eq!("rook".parse::<PieceKind>().expect("rook should parse"), PieceKind::Tower);
        assert!("Archbishop".parse::<PieceKind>().is_err());
        assert_eq!("RED".parse::<TeamColor>().expect("RED should parse"), TeamColor::Red);
    }

    #[test]
    fn move_flags_decode() {
        let mv = Move::new(4, 10, 12, FLAG_CASTLE_QUEEN_SIDE);
        assert_eq!(mv.castle_side(), Some(CastleSide::Queen));
        assert!(!mv.is_capture());
        let cap = Move::new(1, 2, 3, FLAG_CAPTURE | FLAG_PROMOTION);
        assert!(cap.is_capture() && cap.is_promotion());
    }
}

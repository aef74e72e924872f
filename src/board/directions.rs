//! Compass directions and the default continue-straight relation.
//!
//! A tile stores up to ten neighbor slots: the eight compass points plus two
//! extra slots that only pentagon junctions fill.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    UpLeft,
    Up,
    UpRight,
    Left,
    Right,
    DownLeft,
    Down,
    DownRight,
    AdditionalStraight,
    AdditionalDiagonal,
}

pub const DIRECTION_COUNT: usize = 10;

impl Direction {
    pub const ALL: [Direction; DIRECTION_COUNT] = [
        Direction::UpLeft,
        Direction::Up,
        Direction::UpRight,
        Direction::Left,
        Direction::Right,
        Direction::DownLeft,
        Direction::Down,
        Direction::DownRight,
        Direction::AdditionalStraight,
        Direction::AdditionalDiagonal,
    ];

    pub const COMPASS: [Direction; 8] = [
        Direction::UpLeft,
        Direction::Up,
        Direction::UpRight,
        Direction::Left,
        Direction::Right,
        Direction::DownLeft,
        Direction::Down,
        Direction::DownRight,
    ];

    pub const ORTHOGONAL: [Direction; 4] =
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Direction::UpLeft => 0,
            Direction::Up => 1,
            Direction::UpRight => 2,
            Direction::Left => 3,
            Direction::Right => 4,
            Direction::DownLeft => 5,
            Direction::Down => 6,
            Direction::DownRight => 7,
            Direction::AdditionalStraight => 8,
            Direction::AdditionalDiagonal => 9,
        }
    }

    /// Reverse compass direction. The two extra slots have no fixed reverse.
    #[inline]
    pub const fn opposite(self) -> Option<Direction> {
        match self {
            Direction::UpLeft => Some(Direction::DownRight),
            Direction::Up => Some(Direction::Down),
            Direction::UpRight => Some(Direction::DownLeft),
            Direction::Left => Some(Direction::Right),
            Direction::Right => Some(Direction::Left),
            Direction::DownLeft => Some(Direction::UpRight),
            Direction::Down => Some(Direction::Up),
            Direction::DownRight => Some(Direction::UpLeft),
            Direction::AdditionalStraight | Direction::AdditionalDiagonal => None,
        }
    }

    /// Grid step `(d_row, d_col)` on the top sheet.
    ///
    /// The bottom sheet is seen from below, so its columns are mirrored.
    #[inline]
    pub const fn grid_step(self, bottom_side: bool) -> Option<(i8, i8)> {
        let (dr, dc) = match self {
            Direction::UpLeft => (1, -1),
            Direction::Up => (1, 0),
            Direction::UpRight => (1, 1),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::DownLeft => (-1, -1),
            Direction::Down => (-1, 0),
            Direction::DownRight => (-1, 1),
            Direction::AdditionalStraight | Direction::AdditionalDiagonal => return None,
        };
        if bottom_side {
            Some((dr, -dc))
        } else {
            Some((dr, dc))
        }
    }

    pub fn from_short(name: &str) -> Option<Direction> {
        match name {
            "UL" => Some(Direction::UpLeft),
            "UP" => Some(Direction::Up),
            "UR" => Some(Direction::UpRight),
            "L" => Some(Direction::Left),
            "R" => Some(Direction::Right),
            "DL" => Some(Direction::DownLeft),
            "DOWN" => Some(Direction::Down),
            "DR" => Some(Direction::DownRight),
            "S" => Some(Direction::AdditionalStraight),
            "DG" => Some(Direction::AdditionalDiagonal),
            _ => None,
        }
    }
}

/// Sheet of the wormhole board a tile lives on. Normal boards only use `Top`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Top,
    Bottom,
}

impl Side {
    #[inline]
    pub const fn suffix(self) -> char {
        match self {
            Side::Top => 'T',
            Side::Bottom => 'B',
        }
    }

    #[inline]
    pub fn from_suffix(c: char) -> Option<Side> {
        match c {
            'T' => Some(Side::Top),
            'B' => Some(Side::Bottom),
            _ => None,
        }
    }

    #[inline]
    pub const fn flipped(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
        }
    }
}

//! Per-team rule tables: pawn travel, promotion rows and castling.
//!
//! Teams are numbered 0..4 (white, black, blue, red). White and black start on
//! the top sheet, blue and red on the bottom sheet.

use crate::board::directions::{Direction, Side};
use crate::board::tile::{Tile, TileId};
use crate::board::topology::{Topology, Variant};

pub const MAX_TEAMS: usize = 4;
pub const PIECES_PER_PLAYER: usize = 16;

/// Which end row of a sheet a promotion entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeRow {
    First,
    Last,
}

/// Promotion entry. `None` matches the single sheet of a normal board.
type PromotionRow = (EdgeRow, Option<Side>);

struct PawnRule {
    start_side: Side,
    starts_low: bool,
    forward: Direction,
    promotion: &'static [PromotionRow],
}

const PAWN_RULES: [PawnRule; MAX_TEAMS] = [
    PawnRule {
        start_side: Side::Top,
        starts_low: true,
        forward: Direction::Up,
        promotion: &[
            (EdgeRow::Last, Some(Side::Top)),
            (EdgeRow::First, Some(Side::Bottom)),
            (EdgeRow::Last, Some(Side::Bottom)),
            (EdgeRow::Last, None),
        ],
    },
    PawnRule {
        start_side: Side::Top,
        starts_low: false,
        forward: Direction::Down,
        promotion: &[
            (EdgeRow::First, Some(Side::Top)),
            (EdgeRow::Last, Some(Side::Bottom)),
            (EdgeRow::First, Some(Side::Bottom)),
            (EdgeRow::First, None),
        ],
    },
    PawnRule {
        start_side: Side::Bottom,
        starts_low: true,
        forward: Direction::Up,
        promotion: &[
            (EdgeRow::Last, Some(Side::Top)),
            (EdgeRow::First, Some(Side::Top)),
            (EdgeRow::Last, Some(Side::Bottom)),
        ],
    },
    PawnRule {
        start_side: Side::Bottom,
        starts_low: false,
        forward: Direction::Down,
        promotion: &[
            (EdgeRow::First, Some(Side::Top)),
            (EdgeRow::Last, Some(Side::Top)),
            (EdgeRow::First, Some(Side::Bottom)),
        ],
    },
];

/// Row from which a team's pawns may advance two tiles.
#[inline]
pub fn pawn_first_row(team: usize, rows: u8) -> u8 {
    if PAWN_RULES[team].starts_low {
        2
    } else {
        rows - 1
    }
}

/// Whether a pawn of `team` standing on `tile` may still double step.
pub fn pawn_on_first_row(team: usize, tile: &Tile, rows: u8) -> bool {
    tile.side == PAWN_RULES[team].start_side && tile.row == pawn_first_row(team, rows)
}

/// Quadrant of a tile: lower/upper half of the top sheet are 0/1, of the
/// bottom sheet 2/3. Each team's home quadrant is its own number.
#[inline]
fn quadrant(tile: &Tile, rows: u8) -> usize {
    let upper = usize::from(tile.row > rows / 2);
    match tile.side {
        Side::Top => upper,
        Side::Bottom => 2 + upper,
    }
}

/// Forward direction of a team's pawn on `tile`.
///
/// Entering a foreign quadrant of matching parity reverses travel; any other
/// foreign quadrant restores the team's base direction.
pub fn pawn_forward(team: usize, tile: &Tile, rows: u8) -> Direction {
    let base = PAWN_RULES[team].forward;
    let q = quadrant(tile, rows);
    if q != team && team % 2 == q % 2 {
        match base {
            Direction::Up => Direction::Down,
            _ => Direction::Up,
        }
    } else {
        base
    }
}

#[inline]
pub fn pawn_attack_directions(forward: Direction) -> [Direction; 2] {
    match forward {
        Direction::Up => [Direction::UpLeft, Direction::UpRight],
        _ => [Direction::DownLeft, Direction::DownRight],
    }
}

/// First and last rows of either sheet never hold a pawn pattern.
#[inline]
pub fn is_pawn_dead_row(tile: &Tile, rows: u8) -> bool {
    tile.row == 1 || tile.row == rows
}

/// Whether `tile` promotes a pawn of `team`. Loop duplicates never do.
pub fn is_promotion_tile(team: usize, tile: &Tile, variant: Variant, rows: u8) -> bool {
    if tile.loop_tile {
        return false;
    }
    PAWN_RULES[team].promotion.iter().any(|(edge, side)| {
        let row = match edge {
            EdgeRow::First => 1,
            EdgeRow::Last => rows,
        };
        let side_matches = match (variant, side) {
            (Variant::Normal, None) => true,
            (Variant::Wormhole, Some(s)) => *s == tile.side,
            _ => false,
        };
        side_matches && tile.row == row
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::King, CastleSide::Queen];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            CastleSide::King => 0,
            CastleSide::Queen => 1,
        }
    }
}

/// Castling geometry resolved to tile ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastlingRule {
    pub king_from: TileId,
    pub king_to: TileId,
    pub rook_from: TileId,
    pub rook_to: TileId,
    /// Tiles strictly between king and rook, in order away from the king.
    pub between: Vec<TileId>,
    /// Tiles the king stands on or crosses; none may be attacked.
    pub king_path: Vec<TileId>,
}

/// Castling rules for one team, or `None` when the board lacks any of the
/// named tiles.
pub fn resolve_castling(topology: &Topology, team: usize) -> Option<[CastlingRule; 2]> {
    let home_row = if PAWN_RULES[team].starts_low { 1 } else { topology.size.rows };
    let side = PAWN_RULES[team].start_side;
    if topology.variant == Variant::Normal && side == Side::Bottom {
        return None;
    }
    let at = |col: char| {
        let c = (col as u8).checked_sub(b'a')?;
        topology
            .cell_name(c, home_row, side)
            .and_then(|n| topology.tile_id(&n))
    };

    let king_from = at('e')?;
    let king_side = CastlingRule {
        king_from,
        king_to: at('g')?,
        rook_from: at('h')?,
        rook_to: at('f')?,
        between: vec![at('f')?, at('g')?],
        king_path: vec![king_from, at('f')?, at('g')?],
    };
    let queen_side = CastlingRule {
        king_from,
        king_to: at('c')?,
        rook_from: at('a')?,
        rook_to: at('d')?,
        between: vec![at('d')?, at('c')?, at('b')?],
        king_path: vec![king_from, at('d')?, at('c')?],
    };
    Some([king_side, queen_side])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::topology::BoardSize;

    fn wormhole() -> Topology {
        Topology::build(BoardSize::EIGHT, Variant::Wormhole).expect("board should build")
    }

    fn tile<'a>(t: &'a Topology, name: &str) -> &'a Tile {
        t.tile(t.tile_id(name).unwrap_or_else(|| panic!("{name} should exist")))
    }

    #[test]
    fn pawns_reverse_in_same_parity_quadrant() {
        let t = wormhole();
        assert_eq!(pawn_forward(0, tile(&t, "a3_T"), 8), Direction::Up);
        assert_eq!(pawn_forward(0, tile(&t, "a6_T"), 8), Direction::Up);
        assert_eq!(pawn_forward(0, tile(&t, "a3_B"), 8), Direction::Down);
        assert_eq!(pawn_forward(0, tile(&t, "a6_B"), 8), Direction::Up);
        assert_eq!(pawn_forward(3, tile(&t, "a6_T"), 8), Direction::Up);
        assert_eq!(pawn_forward(3, tile(&t, "a6_B"), 8), Direction::Down);
    }

    #[test]
    fn promotion_rows_follow_team_tables() {
        let t = wormhole();
        assert!(is_promotion_tile(0, tile(&t, "c8_T"), Variant::Wormhole, 8));
        assert!(is_promotion_tile(0, tile(&t, "c1_B"), Variant::Wormhole, 8));
        assert!(!is_promotion_tile(0, tile(&t, "c1_T"), Variant::Wormhole, 8));
        assert!(is_promotion_tile(3, tile(&t, "h1_T"), Variant::Wormhole, 8));

        let normal = Topology::build(BoardSize::EIGHT, Variant::Normal).expect("board should build");
        assert!(is_promotion_tile(0, tile(&normal, "a8"), Variant::Normal, 8));
        assert!(is_promotion_tile(1, tile(&normal, "a1"), Variant::Normal, 8));
        assert!(!is_promotion_tile(1, tile(&normal, "a8"), Variant::Normal, 8));
    }

    #[test]
    fn castling_resolves_on_eight_and_not_on_six() {
        let t = wormhole();
        let rules = resolve_castling(&t, 2).expect("blue should castle on 8x8");
        assert_eq!(t.name(rules[0].king_from), "e1_B");
        assert_eq!(t.name(rules[1].rook_to), "d1_B");
        assert_eq!(rules[1].between.len(), 3);

        let six = Topology::build(BoardSize::SIX, Variant::Wormhole).expect("board should build");
        assert!(resolve_castling(&six, 0).is_none());
    }
}

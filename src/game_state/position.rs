//! Flat position state: piece array plus tile occupancy.
//!
//! Team `t` owns slots `t * pieces_per_player ..` up to its piece count. The
//! occupancy array is the inverse map for every piece not captured.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::board::board::Board;
use crate::board::tile::TileId;
use crate::chess_errors::{ConfigResult, ConfigurationError};
use crate::game_state::chess_rules::MAX_TEAMS;
use crate::game_state::chess_types::{PieceKind, PieceRecord, PieceSlot};

/// A piece to put on the board when a position is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub team: usize,
    pub kind: PieceKind,
    pub tile: TileId,
    pub has_moved: bool,
}

#[derive(Clone)]
pub struct Position {
    board: Arc<Board>,
    pieces: Vec<PieceRecord>,
    counts: [u8; MAX_TEAMS],
    occupancy: Vec<Option<PieceSlot>>,
    alive: [bool; MAX_TEAMS],
    pieces_per_player: usize,
}

impl Position {
    /// Place pieces and mark `playing` teams alive. Rejects pieces of teams
    /// not playing, overlapping tiles and teams with more than
    /// `pieces_per_player` pieces.
    pub fn new(
        board: Arc<Board>,
        placements: &[Placement],
        playing: &[usize],
        pieces_per_player: usize,
    ) -> ConfigResult<Self> {
        let mut pieces: Vec<PieceRecord> = (0..MAX_TEAMS * pieces_per_player)
            .map(|slot| PieceRecord {
                kind: PieceKind::Pawn,
                owner: (slot / pieces_per_player) as u8,
                tile: 0,
                has_moved: true,
                captured: true,
            })
            .collect();
        let mut counts = [0u8; MAX_TEAMS];
        let mut occupancy = vec![None; board.tile_count()];

        for p in placements {
            if p.team >= MAX_TEAMS || !playing.contains(&p.team) {
                return Err(ConfigurationError::TeamNotPlaying(p.team));
            }
            if occupancy[p.tile as usize].is_some() {
                return Err(ConfigurationError::DuplicateTile(board.tile_name(p.tile).to_owned()));
            }
            if counts[p.team] as usize >= pieces_per_player {
                return Err(ConfigurationError::TooManyPieces {
                    team: p.team,
                    limit: pieces_per_player,
                });
            }
            let slot = p.team * pieces_per_player + counts[p.team] as usize;
            counts[p.team] += 1;
            pieces[slot] = PieceRecord {
                kind: p.kind,
                owner: p.team as u8,
                tile: p.tile,
                has_moved: p.has_moved,
                captured: false,
            };
            occupancy[p.tile as usize] = Some(slot as PieceSlot);
        }

        let mut alive = [false; MAX_TEAMS];
        for &team in playing {
            if team < MAX_TEAMS {
                alive[team] = true;
            }
        }

        Ok(Self {
            board,
            pieces,
            counts,
            occupancy,
            alive,
            pieces_per_player,
        })
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn shared_board(&self) -> &Arc<Board> {
        &self.board
    }

    #[inline]
    pub fn piece(&self, slot: PieceSlot) -> &PieceRecord {
        &self.pieces[slot as usize]
    }

    #[inline]
    pub(crate) fn piece_mut(&mut self, slot: PieceSlot) -> &mut PieceRecord {
        &mut self.pieces[slot as usize]
    }

    #[inline]
    pub fn occupant(&self, tile: TileId) -> Option<PieceSlot> {
        self.occupancy[tile as usize]
    }

    #[inline]
    pub(crate) fn set_occupant(&mut self, tile: TileId, slot: Option<PieceSlot>) {
        self.occupancy[tile as usize] = slot;
    }

    /// Piece standing on `tile`, if any.
    #[inline]
    pub fn piece_at(&self, tile: TileId) -> Option<&PieceRecord> {
        self.occupant(tile).map(|s| self.piece(s))
    }

    #[inline]
    pub fn team_slots(&self, team: usize) -> Range<usize> {
        let start = team * self.pieces_per_player;
        start..start + self.counts[team] as usize
    }

    /// Non-captured pieces of one team.
    pub fn team_pieces(&self, team: usize) -> impl Iterator<Item = (PieceSlot, &PieceRecord)> + '_ {
        self.team_slots(team)
            .map(move |s| (s as PieceSlot, &self.pieces[s]))
            .filter(|(_, p)| !p.captured)
    }

    /// Non-captured pieces of every team.
    pub fn live_pieces(&self) -> impl Iterator<Item = (PieceSlot, &PieceRecord)> + '_ {
        (0..MAX_TEAMS).flat_map(move |t| self.team_pieces(t))
    }

    #[inline]
    pub fn is_alive(&self, team: usize) -> bool {
        self.alive.get(team).copied().unwrap_or(false)
    }

    #[inline]
    pub(crate) fn set_alive(&mut self, team: usize, alive: bool) {
        self.alive[team] = alive;
    }

    pub fn king_slot(&self, team: usize) -> Option<PieceSlot> {
        self.team_pieces(team)
            .find(|(_, p)| p.kind == PieceKind::King)
            .map(|(s, _)| s)
    }

    #[inline]
    pub fn king_tile(&self, team: usize) -> Option<TileId> {
        self.king_slot(team).map(|s| self.piece(s).tile)
    }

    #[inline]
    pub fn pieces_per_player(&self) -> usize {
        self.pieces_per_player
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.board, &other.board)
            && self.pieces == other.pieces
            && self.counts == other.counts
            && self.occupancy == other.occupancy
            && self.alive == other.alive
    }
}

impl Eq for Position {}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for (_, p) in self.live_pieces() {
            list.entry(&format_args!(
                "{}{:?}@{}",
                p.owner,
                p.kind,
                self.board.tile_name(p.tile)
            ));
        }
        list.finish()
    }
}

/// Test fixture: build a position from `(team, kind, tile name)` triples.
#[cfg(test)]
pub(crate) fn position_from_names(
    board: &Arc<Board>,
    pieces: &[(usize, PieceKind, &str)],
    playing: &[usize],
) -> Position {
    let placements: Vec<Placement> = pieces
        .iter()
        .map(|(team, kind, name)| Placement {
            team: *team,
            kind: *kind,
            tile: board.tile_id(name).unwrap_or_else(|| panic!("{name} should exist")),
            has_moved: false,
        })
        .collect();
    Position::new(Arc::clone(board), &placements, playing, crate::game_state::chess_rules::PIECES_PER_PLAYER)
        .expect("fixture position should build")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::topology::{BoardSize, Variant};

    fn board() -> Arc<Board> {
        Board::build(BoardSize::EIGHT, Variant::Normal, None).expect("board should build")
    }

    fn place(board: &Board, team: usize, kind: PieceKind, name: &str) -> Placement {
        Placement {
            team,
            kind,
            tile: board.tile_id(name).unwrap_or_else(|| panic!("{name} should exist")),
            has_moved: false,
        }
    }

    #[test]
    fn pieces_land_in_team_ranges_and_occupancy_inverts() {
        let b = board();
        let placements = [
            place(&b, 0, PieceKind::King, "e1"),
            place(&b, 1, PieceKind::King, "e8"),
            place(&b, 1, PieceKind::Queen, "d8"),
        ];
        let pos = Position::new(b.clone(), &placements, &[0, 1], 16).expect("position should build");
        assert_eq!(pos.team_slots(1), 16..18);
        let d8 = b.tile_id("d8").expect("d8 should exist");
        assert_eq!(pos.occupant(d8), Some(17));
        assert_eq!(pos.piece(17).kind, PieceKind::Queen);
        assert_eq!(pos.king_tile(0), b.tile_id("e1"));
        assert_eq!(pos.live_pieces().count(), 3);
    }

    #[test]
    fn overlapping_and_overfull_placements_are_rejected() {
        let b = board();
        let clash = [place(&b, 0, PieceKind::King, "e1"), place(&b, 1, PieceKind::King, "e1")];
        assert!(matches!(
            Position::new(b.clone(), &clash, &[0, 1], 16),
            Err(ConfigurationError::DuplicateTile(_))
        ));

        let crowd = [place(&b, 0, PieceKind::King, "e1"), place(&b, 0, PieceKind::Pawn, "e2")];
        assert!(matches!(
            Position::new(b, &crowd, &[0], 1),
            Err(ConfigurationError::TooManyPieces { team: 0, limit: 1 })
        ));
    }
}

//! Attack detection traced outward from the target tile.
//!
//! Rather than enumerating enemy moves, every attacker class is probed by
//! walking its own pattern from the tile under test. Only living enemies
//! attack.

use crate::board::tile::TileId;
use crate::game_state::chess_types::{PieceKind, PieceSlot};
use crate::game_state::position::Position;
use crate::patterns::pattern_table::PatternKind;

#[inline]
fn is_live_enemy(position: &Position, owner: u8, team: usize) -> bool {
    owner as usize != team && position.is_alive(owner as usize)
}

/// First piece met along any ray of `kind` from `tile` that belongs to a
/// living enemy of `team` and is one of `attackers`.
fn slider_attack(position: &Position, tile: TileId, team: usize, kind: PatternKind, attackers: [PieceKind; 2]) -> bool {
    let patterns = &position.board().patterns;
    for ray in patterns.rays(tile, kind) {
        for &step in ray {
            let Some(piece) = position.piece_at(step) else {
                continue;
            };
            if is_live_enemy(position, piece.owner, team) && attackers.contains(&piece.kind) {
                return true;
            }
            break;
        }
    }
    false
}

fn jump_attack(position: &Position, tile: TileId, team: usize, kind: PatternKind, attacker: PieceKind) -> bool {
    position
        .board()
        .patterns
        .targets(tile, kind)
        .iter()
        .filter_map(|t| position.piece_at(*t))
        .any(|p| p.kind == attacker && is_live_enemy(position, p.owner, team))
}

fn pawn_attack(position: &Position, tile: TileId, team: usize) -> bool {
    let patterns = &position.board().patterns;
    patterns
        .targets(tile, PatternKind::KingPawnProbe)
        .iter()
        .filter_map(|t| position.piece_at(*t))
        .filter(|p| p.kind == PieceKind::Pawn && is_live_enemy(position, p.owner, team))
        .any(|p| {
            patterns
                .targets(p.tile, PatternKind::PawnAttack(p.owner))
                .contains(&tile)
        })
}

/// Whether a living enemy of `team` attacks `tile`.
pub fn is_tile_attacked(position: &Position, tile: TileId, team: usize) -> bool {
    slider_attack(position, tile, team, PatternKind::Tower, [PieceKind::Tower, PieceKind::Queen])
        || slider_attack(position, tile, team, PatternKind::Bishop, [PieceKind::Bishop, PieceKind::Queen])
        || jump_attack(position, tile, team, PatternKind::Knight, PieceKind::Knight)
        || jump_attack(position, tile, team, PatternKind::King, PieceKind::King)
        || pawn_attack(position, tile, team)
}

pub fn is_in_check(position: &Position, team: usize) -> bool {
    let Some(king) = position.king_tile(team) else {
        debug_assert!(!position.is_alive(team), "living team {team} has no king");
        return false;
    };
    is_tile_attacked(position, king, team)
}

/// Whether the king of `team` would be attacked standing on `tile`. The king
/// is lifted off its own tile for the probe, then put back.
pub fn is_king_attacked_on(position: &mut Position, king: PieceSlot, tile: TileId, team: usize) -> bool {
    let home = position.piece(king).tile;
    if home == tile {
        return is_tile_attacked(position, tile, team);
    }
    debug_assert!(position.occupant(tile).is_none(), "king probe onto an occupied tile");
    position.set_occupant(home, None);
    position.set_occupant(tile, Some(king));
    position.piece_mut(king).tile = tile;

    let attacked = is_tile_attacked(position, tile, team);

    position.piece_mut(king).tile = home;
    position.set_occupant(tile, None);
    position.set_occupant(home, Some(king));
    attacked
}

#[cfg(test)]
mod tests {
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

    #[test]
    fn sliders_are_blocked_by_the_first_piece() {
        let b = normal();
        let open = position_from_names(
            &b,
            &[(0, PieceKind::King, "e1"), (1, PieceKind::King, "a8"), (1, PieceKind::Tower, "e8")],
            &[0, 1],
        );
        assert!(is_in_check(&open, 0));

        let blocked = position_from_names(
            &b,
            &[
                (0, PieceKind::King, "e1"),
                (0, PieceKind::Knight, "e4"),
                (1, PieceKind::King, "a8"),
                (1, PieceKind::Tower, "e8"),
            ],
            &[0, 1],
        );
        assert!(!is_in_check(&blocked, 0));
    }

    #[test]
    fn pawns_attack_only_forward_diagonals() {
        let b = normal();
        let pos = position_from_names(
            &b,
            &[(0, PieceKind::King, "e4"), (1, PieceKind::King, "a8"), (1, PieceKind::Pawn, "d5")],
            &[0, 1],
        );
        assert!(is_in_check(&pos, 0));

        let behind = position_from_names(
            &b,
            &[(0, PieceKind::King, "e4"), (1, PieceKind::King, "a8"), (1, PieceKind::Pawn, "d3")],
            &[0, 1],
        );
        assert!(!is_in_check(&behind, 0));
    }

    #[test]
    fn knights_jump_over_blockers() {
        let b = normal();
        let pos = position_from_names(
            &b,
            &[
                (0, PieceKind::King, "e1"),
                (0, PieceKind::Pawn, "e2"),
                (0, PieceKind::Pawn, "f2"),
                (0, PieceKind::Pawn, "d2"),
                (1, PieceKind::King, "a8"),
                (1, PieceKind::Knight, "f3"),
            ],
            &[0, 1],
        );
        assert!(is_in_check(&pos, 0));
    }

    #[test]
    fn eliminated_players_never_give_check() {
        let b = wormhole();
        let mut pos = position_from_names(
            &b,
            &[
                (0, PieceKind::King, "e1_T"),
                (1, PieceKind::King, "e8_T"),
                (2, PieceKind::King, "e1_B"),
                (2, PieceKind::Queen, "e4_T"),
            ],
            &[0, 1, 2],
        );
        assert!(is_in_check(&pos, 0));
        pos.set_alive(2, false);
        assert!(!is_in_check(&pos, 0));
    }

    #[test]
    fn attacks_thread_through_the_pentagon() {
        // c2_T up: c3_T, then via d4_1 onto the bottom sheet down to c1_B.
        let b = wormhole();
        let pos = position_from_names(
            &b,
            &[
                (0, PieceKind::King, "c1_B"),
                (1, PieceKind::King, "h8_T"),
                (1, PieceKind::Tower, "c2_T"),
            ],
            &[0, 1],
        );
        let c1_b = b.tile_id("c1_B").expect("c1_B should exist");
        let tower_reaches = b
            .patterns
            .rays(b.tile_id("c2_T").expect("c2_T should exist"), PatternKind::Tower)
            .any(|ray| ray.contains(&c1_b));
        assert!(tower_reaches);
        assert!(is_in_check(&pos, 0));
    }
}

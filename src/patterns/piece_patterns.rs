//! Per-piece pattern construction for a single origin tile.
//!
//! Sliders yield rays. Jumpers yield one flat target list, deduplicated, with
//! the origin removed.

use crate::board::directions::Direction;
use crate::board::tile::{TileId, TileSet};
use crate::board::tile_names::shift_tile_name;
use crate::board::topology::{Topology, Variant};
use crate::board::wormhole_wiring::{mirror_side, KNIGHT_LOOP_JUMPS};
use crate::chess_errors::{ConfigResult, ConfigurationError};
use crate::game_state::chess_rules::{
    is_pawn_dead_row, is_promotion_tile, pawn_attack_directions, pawn_forward, pawn_on_first_row,
};
use crate::patterns::ray_tracer::{trace_preorder, trace_rays};

pub const TOWER_REACH: usize = 10;
pub const BISHOP_REACH: usize = 8;

fn slider_rays(topology: &Topology, origin: TileId, directions: &[Direction], reach: usize) -> Vec<Vec<TileId>> {
    let tile = topology.tile(origin);
    directions
        .iter()
        .filter_map(|d| tile.neighbor(*d))
        .flat_map(|first| trace_rays(topology, origin, first, reach))
        .collect()
}

fn dedup_targets(origin: TileId, candidates: impl IntoIterator<Item = TileId>) -> Vec<TileId> {
    let mut seen = TileSet::new();
    seen.insert(origin);
    candidates.into_iter().filter(|t| seen.insert(*t)).collect()
}

pub fn tower_rays(topology: &Topology, origin: TileId) -> Vec<Vec<TileId>> {
    let mut dirs = Direction::ORTHOGONAL.to_vec();
    if topology.tile(origin).pentagon {
        dirs.push(Direction::AdditionalStraight);
    }
    slider_rays(topology, origin, &dirs, TOWER_REACH)
}

pub fn bishop_rays(topology: &Topology, origin: TileId) -> Vec<Vec<TileId>> {
    let mut dirs = Direction::DIAGONAL.to_vec();
    if topology.tile(origin).pentagon {
        dirs.push(Direction::AdditionalDiagonal);
    }
    slider_rays(topology, origin, &dirs, BISHOP_REACH)
}

pub fn king_targets(topology: &Topology, origin: TileId) -> Vec<TileId> {
    let tile = topology.tile(origin);
    let extra: &[Direction] = if tile.pentagon {
        &[Direction::AdditionalDiagonal, Direction::AdditionalStraight]
    } else {
        &[]
    };
    dedup_targets(
        origin,
        Direction::COMPASS
            .iter()
            .chain(extra)
            .filter_map(|d| tile.neighbor(*d)),
    )
}

/// Tiles from which an enemy pawn could strike the king on `origin`.
pub fn pawn_probe_targets(topology: &Topology, origin: TileId) -> Vec<TileId> {
    let tile = topology.tile(origin);
    let extra: &[Direction] = if tile.pentagon {
        &[Direction::AdditionalDiagonal]
    } else {
        &[]
    };
    dedup_targets(
        origin,
        Direction::DIAGONAL
            .iter()
            .chain(extra)
            .filter_map(|d| tile.neighbor(*d)),
    )
}

/// Two steps along `first`, one along `second`, and one along `first`, two
/// along `second`, following the relation graph on every step.
fn knight_leg(topology: &Topology, origin: TileId, first: &[Direction], second: &[Direction], out: &mut Vec<TileId>) {
    let tile = topology.tile(origin);
    for d1 in first {
        let Some(next) = tile.neighbor(*d1) else {
            continue;
        };

        let walked = trace_preorder(topology, origin, next, 2);
        if let Some(&two_away) = walked.get(1) {
            let two_away = topology.tile(two_away);
            out.extend(second.iter().filter_map(|d2| two_away.neighbor(*d2)));
        }

        let next_tile = topology.tile(next);
        for d2 in second {
            let Some(side_step) = next_tile.neighbor(*d2) else {
                continue;
            };
            let walked = trace_preorder(topology, next, side_step, 2);
            if walked.len() > 1 {
                out.extend_from_slice(&walked[1..]);
            }
        }
    }
}

pub fn knight_targets(topology: &Topology, origin: TileId) -> ConfigResult<Vec<TileId>> {
    let tile = topology.tile(origin);
    if topology.variant == Variant::Wormhole && tile.loop_tile {
        return knight_loop_targets(topology, origin);
    }

    let horizontal = [Direction::Left, Direction::Right];
    let mut vertical = vec![Direction::Up, Direction::Down];
    let mut out = Vec::new();
    knight_leg(topology, origin, &horizontal, &vertical, &mut out);
    if tile.pentagon {
        vertical.push(Direction::AdditionalStraight);
    }
    knight_leg(topology, origin, &vertical, &horizontal, &mut out);
    Ok(dedup_targets(origin, out))
}

fn knight_loop_targets(topology: &Topology, origin: TileId) -> ConfigResult<Vec<TileId>> {
    let shift = topology.wiring_shift();
    let name = topology.name(origin);

    for (key, jumps) in KNIGHT_LOOP_JUMPS {
        for bottom in [false, true] {
            let key_name = if bottom { mirror_side(key) } else { key.to_string() };
            let shifted = shift_tile_name(&key_name, shift)
                .ok_or_else(|| ConfigurationError::Wiring(key_name.clone()))?;
            if shifted != name {
                continue;
            }
            let mut out = Vec::with_capacity(jumps.len());
            for jump in *jumps {
                let jump_name = if bottom { mirror_side(jump) } else { jump.to_string() };
                let target = shift_tile_name(&jump_name, shift)
                    .and_then(|n| topology.tile_id(&n))
                    .ok_or_else(|| ConfigurationError::Wiring(jump_name.clone()))?;
                out.push(target);
            }
            return Ok(dedup_targets(origin, out));
        }
    }
    Err(ConfigurationError::Wiring(format!("no knight table for {name}")))
}

/// Forward rays of a pawn of `team` on `origin`. Empty on dead rows and on
/// the team's own promotion tiles.
pub fn pawn_move_rays(topology: &Topology, origin: TileId, team: usize) -> Vec<Vec<TileId>> {
    let rows = topology.size.rows;
    let tile = topology.tile(origin);
    if is_pawn_dead_row(tile, rows) || is_promotion_tile(team, tile, topology.variant, rows) {
        return Vec::new();
    }
    let reach = if pawn_on_first_row(team, tile, rows) { 2 } else { 1 };
    let mut dirs = vec![pawn_forward(team, tile, rows)];
    if tile.pentagon {
        dirs.push(Direction::AdditionalStraight);
    }
    slider_rays(topology, origin, &dirs, reach)
}

pub fn pawn_attack_targets(topology: &Topology, origin: TileId, team: usize) -> Vec<TileId> {
    let rows = topology.size.rows;
    let tile = topology.tile(origin);
    if is_pawn_dead_row(tile, rows) || is_promotion_tile(team, tile, topology.variant, rows) {
        return Vec::new();
    }
    let forward = pawn_forward(team, tile, rows);
    let mut dirs = pawn_attack_directions(forward).to_vec();
    if tile.pentagon {
        if let Some(back) = forward.opposite() {
            if tile.relation_allows(back, forward) {
                dirs.push(Direction::AdditionalDiagonal);
            }
        }
    }
    dedup_targets(origin, dirs.iter().filter_map(|d| tile.neighbor(*d)))
}

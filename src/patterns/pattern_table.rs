//! Flattened movement pattern table.
//!
//! Three offset levels: `(tile, kind)` selects a range of rays, each ray
//! selects a range of target tiles. Jump kinds store a single ray, so their
//! targets are one contiguous slice. Nothing here allocates after the build.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::tile::{TileId, TileSet};
use crate::board::topology::Topology;
use crate::chess_errors::ConfigResult;
use crate::game_state::chess_rules::{is_promotion_tile, MAX_TEAMS};
use crate::patterns::piece_patterns::{
    bishop_rays, king_targets, knight_targets, pawn_attack_targets, pawn_move_rays,
    pawn_probe_targets, tower_rays,
};

/// Pattern slots stored per tile. Queens reuse the tower and bishop slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Tower,
    Bishop,
    Knight,
    King,
    /// Diagonal neighbors of a king, where an attacking pawn would stand.
    KingPawnProbe,
    PawnMove(u8),
    PawnAttack(u8),
}

pub const PATTERN_KINDS: usize = 5 + 2 * MAX_TEAMS;

impl PatternKind {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PatternKind::Tower => 0,
            PatternKind::Bishop => 1,
            PatternKind::Knight => 2,
            PatternKind::King => 3,
            PatternKind::KingPawnProbe => 4,
            PatternKind::PawnMove(team) => 5 + team as usize,
            PatternKind::PawnAttack(team) => 5 + MAX_TEAMS + team as usize,
        }
    }

    pub fn all() -> impl Iterator<Item = PatternKind> {
        [
            PatternKind::Tower,
            PatternKind::Bishop,
            PatternKind::Knight,
            PatternKind::King,
            PatternKind::KingPawnProbe,
        ]
        .into_iter()
        .chain((0..MAX_TEAMS as u8).map(PatternKind::PawnMove))
        .chain((0..MAX_TEAMS as u8).map(PatternKind::PawnAttack))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternTable {
    tile_count: usize,
    /// `tile * PATTERN_KINDS + kind` -> first ray index; one trailing entry.
    pattern_offsets: Vec<u32>,
    /// ray index -> first target index; one trailing entry.
    ray_offsets: Vec<u32>,
    targets: Vec<TileId>,
    promotion_zones: Vec<Vec<TileId>>,
    promotion_masks: Vec<TileSet>,
}

impl PatternTable {
    pub fn build(topology: &Topology) -> ConfigResult<Self> {
        let tile_count = topology.tile_count();
        let mut pattern_offsets = Vec::with_capacity(tile_count * PATTERN_KINDS + 1);
        let mut ray_offsets = vec![0u32];
        let mut targets = Vec::new();

        for tile in topology.tiles() {
            let origin = tile.id;
            for kind in PatternKind::all() {
                pattern_offsets.push((ray_offsets.len() - 1) as u32);
                let rays = match kind {
                    PatternKind::Tower => tower_rays(topology, origin),
                    PatternKind::Bishop => bishop_rays(topology, origin),
                    PatternKind::Knight => vec![knight_targets(topology, origin)?],
                    PatternKind::King => vec![king_targets(topology, origin)],
                    PatternKind::KingPawnProbe => vec![pawn_probe_targets(topology, origin)],
                    PatternKind::PawnMove(team) => pawn_move_rays(topology, origin, team as usize),
                    PatternKind::PawnAttack(team) => {
                        vec![pawn_attack_targets(topology, origin, team as usize)]
                    }
                };
                for ray in rays.into_iter().filter(|r| !r.is_empty()) {
                    targets.extend_from_slice(&ray);
                    ray_offsets.push(targets.len() as u32);
                }
            }
        }
        pattern_offsets.push((ray_offsets.len() - 1) as u32);

        let rows = topology.size.rows;
        let promotion_zones: Vec<Vec<TileId>> = (0..MAX_TEAMS)
            .map(|team| {
                topology
                    .tiles()
                    .iter()
                    .filter(|t| is_promotion_tile(team, t, topology.variant, rows))
                    .map(|t| t.id)
                    .collect()
            })
            .collect();
        let promotion_masks = promotion_zones
            .iter()
            .map(|zone| zone.iter().copied().collect())
            .collect();

        debug!(
            tiles = tile_count,
            rays = ray_offsets.len() - 1,
            targets = targets.len(),
            "built pattern table"
        );

        Ok(Self {
            tile_count,
            pattern_offsets,
            ray_offsets,
            targets,
            promotion_zones,
            promotion_masks,
        })
    }

    #[inline]
    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    #[inline]
    fn ray_range(&self, tile: TileId, kind: PatternKind) -> (usize, usize) {
        let slot = tile as usize * PATTERN_KINDS + kind.index();
        (
            self.pattern_offsets[slot] as usize,
            self.pattern_offsets[slot + 1] as usize,
        )
    }

    /// Rays for a sliding kind, in travel order.
    #[inline]
    pub fn rays(&self, tile: TileId, kind: PatternKind) -> Rays<'_> {
        let (next, end) = self.ray_range(tile, kind);
        Rays {
            table: self,
            next,
            end,
        }
    }

    /// Every target of `(tile, kind)` as one slice; the natural view for jumps.
    #[inline]
    pub fn targets(&self, tile: TileId, kind: PatternKind) -> &[TileId] {
        let (first, last) = self.ray_range(tile, kind);
        let start = self.ray_offsets[first] as usize;
        let end = self.ray_offsets[last] as usize;
        &self.targets[start..end]
    }

    #[inline]
    pub fn promotion_zone(&self, team: usize) -> &[TileId] {
        &self.promotion_zones[team]
    }

    #[inline]
    pub fn is_promotion_tile(&self, team: usize, tile: TileId) -> bool {
        self.promotion_masks[team].contains(tile)
    }
}

pub struct Rays<'a> {
    table: &'a PatternTable,
    next: usize,
    end: usize,
}

impl<'a> Iterator for Rays<'a> {
    type Item = &'a [TileId];

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let start = self.table.ray_offsets[self.next] as usize;
        let stop = self.table.ray_offsets[self.next + 1] as usize;
        self.next += 1;
        Some(&self.table.targets[start..stop])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.next;
        (n, Some(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::topology::{BoardSize, Variant};

    #[test]
    fn kinds_cover_every_slot_once() {
        let mut seen = vec![false; PATTERN_KINDS];
        for kind in PatternKind::all() {
            assert!(!seen[kind.index()], "{kind:?} should map to a fresh slot");
            seen[kind.index()] = true;
        }
        assert!(seen.into_iter().all(|s| s));
    }

    #[test]
    fn lookups_match_direct_construction() {
        let t = Topology::build(BoardSize::EIGHT, Variant::Wormhole).expect("board should build");
        let table = PatternTable::build(&t).expect("patterns should build");
        for tile in [0u8, 27, 28, 100, 143] {
            let expected: Vec<Vec<TileId>> = tower_rays(&t, tile);
            let got: Vec<Vec<TileId>> = table.rays(tile, PatternKind::Tower).map(<[TileId]>::to_vec).collect();
            assert_eq!(got, expected, "tower rays for tile {tile}");
            assert_eq!(
                table.targets(tile, PatternKind::Knight),
                knight_targets(&t, tile).expect("knight pattern should build").as_slice()
            );
        }
    }

    #[test]
    fn promotion_zones_are_edge_rows() {
        let t = Topology::build(BoardSize::EIGHT, Variant::Normal).expect("board should build");
        let table = PatternTable::build(&t).expect("patterns should build");
        assert_eq!(table.promotion_zone(0).len(), 8);
        let a8 = t.tile_id("a8").expect("a8 should exist");
        assert!(table.is_promotion_tile(0, a8));
        assert!(!table.is_promotion_tile(1, a8));
        assert!(table.promotion_zone(2).is_empty());
    }
}

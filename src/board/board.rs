//! Immutable per-configuration data shared by every game copy.

use std::path::Path;
use std::sync::Arc;

use crate::board::tile::TileId;
use crate::board::topology::{BoardSize, Topology, Variant};
use crate::chess_errors::ConfigResult;
use crate::game_state::chess_rules::{resolve_castling, CastleSide, CastlingRule, MAX_TEAMS};
use crate::game_state::chess_types::Move;
use crate::patterns::pattern_cache::{load_or_build, PatternBundle};
use crate::patterns::pattern_table::PatternTable;
use crate::search::zobrist::ZobristKeys;

#[derive(Debug)]
pub struct Board {
    pub topology: Topology,
    pub patterns: PatternTable,
    pub zobrist: ZobristKeys,
    castling: Vec<Option<[CastlingRule; 2]>>,
}

impl Board {
    /// Build (or load from `cache_dir`) the board for `(size, variant)`.
    pub fn build(size: BoardSize, variant: Variant, cache_dir: Option<&Path>) -> ConfigResult<Arc<Board>> {
        Ok(Arc::new(Board::from_bundle(load_or_build(cache_dir, size, variant)?)))
    }

    pub fn from_bundle(bundle: PatternBundle) -> Self {
        let PatternBundle { topology, patterns } = bundle;
        let zobrist = ZobristKeys::new(topology.tile_count());
        let castling = (0..MAX_TEAMS).map(|team| resolve_castling(&topology, team)).collect();
        Self {
            topology,
            patterns,
            zobrist,
            castling,
        }
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.topology.variant
    }

    #[inline]
    pub fn size(&self) -> BoardSize {
        self.topology.size
    }

    #[inline]
    pub fn tile_count(&self) -> usize {
        self.topology.tile_count()
    }

    #[inline]
    pub fn tile_id(&self, name: &str) -> Option<TileId> {
        self.topology.tile_id(name)
    }

    #[inline]
    pub fn tile_name(&self, tile: TileId) -> &str {
        self.topology.name(tile)
    }

    #[inline]
    pub fn castling(&self, team: usize, side: CastleSide) -> Option<&CastlingRule> {
        self.castling
            .get(team)
            .and_then(Option::as_ref)
            .map(|rules| &rules[side.index()])
    }

    /// `from-to` in tile names, e.g. `e2_T-e4_T`.
    pub fn describe_move(&self, mv: Move) -> String {
        format!("{}-{}", self.tile_name(mv.from), self.tile_name(mv.to))
    }
}

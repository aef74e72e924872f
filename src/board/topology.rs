//! Board topology builder.
//!
//! Tiles are laid out side by side, column by column, row by row; each loop
//! cell is followed directly by its two duplicates. Grid adjacency is wired
//! first, then pentagons get their extra slots, then the fixed centre tables
//! overwrite whatever the grid guessed.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::directions::{Direction, Side, DIRECTION_COUNT};
use crate::board::tile::{PentagonRelation, Tile, TileId, MAX_TILES};
use crate::board::tile_names::{shift_tile_name, tile_name};
use crate::board::wormhole_wiring::{
    ConnectionTable, BOTTOM_CONNECTIONS, PENTAGON_RELATIONS, TOP_CONNECTIONS,
};
use crate::chess_errors::{ConfigResult, ConfigurationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    Normal,
    Wormhole,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Normal => write!(f, "normal"),
            Variant::Wormhole => write!(f, "wormhole"),
        }
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(Variant::Normal),
            "wormhole" => Ok(Variant::Wormhole),
            other => Err(format!("unknown variant `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSize {
    pub rows: u8,
    pub cols: u8,
}

impl BoardSize {
    pub const EIGHT: BoardSize = BoardSize { rows: 8, cols: 8 };
    pub const SIX: BoardSize = BoardSize { rows: 6, cols: 6 };

    pub const fn square(n: u8) -> Self {
        Self { rows: n, cols: n }
    }
}

/// Placement of the irregular centre for one board size.
struct CentreLayout {
    pentagons: [(u8, u8); 4],
    loop_cols: [u8; 2],
    loop_rows: [u8; 2],
    /// Offset applied to the 8x8 wiring tables.
    shift: i8,
}

fn centre_layout(size: BoardSize) -> Option<CentreLayout> {
    match (size.rows, size.cols) {
        (8, 8) => Some(CentreLayout {
            pentagons: [(2, 3), (2, 6), (5, 3), (5, 6)],
            loop_cols: [3, 4],
            loop_rows: [4, 5],
            shift: 0,
        }),
        (6, 6) => Some(CentreLayout {
            pentagons: [(1, 2), (4, 2), (1, 5), (4, 5)],
            loop_cols: [2, 3],
            loop_rows: [3, 4],
            shift: -1,
        }),
        _ => None,
    }
}

/// Immutable tile graph for one `(size, variant)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub size: BoardSize,
    pub variant: Variant,
    tiles: Vec<Tile>,
    index: HashMap<String, TileId>,
}

impl Topology {
    pub fn build(size: BoardSize, variant: Variant) -> ConfigResult<Self> {
        let layout = centre_layout(size).ok_or_else(|| ConfigurationError::UnsupportedBoard {
            rows: size.rows,
            cols: size.cols,
            variant: variant.to_string(),
        })?;

        let mut topology = Topology {
            size,
            variant,
            tiles: Vec::new(),
            index: HashMap::new(),
        };
        topology.create_tiles(&layout)?;
        topology.connect_grid();
        if variant == Variant::Wormhole {
            topology.connect_pentagons();
            topology.apply_connection_table(TOP_CONNECTIONS, layout.shift)?;
            topology.apply_connection_table(BOTTOM_CONNECTIONS, layout.shift)?;
            topology.apply_pentagon_relations(layout.shift)?;
        }

        debug!(
            rows = size.rows,
            cols = size.cols,
            %variant,
            tiles = topology.tiles.len(),
            "built board topology"
        );
        Ok(topology)
    }

    #[inline]
    pub fn tile(&self, id: TileId) -> &Tile {
        &self.tiles[id as usize]
    }

    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[inline]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn tile_id(&self, name: &str) -> Option<TileId> {
        self.index.get(name).copied()
    }

    #[inline]
    pub fn name(&self, id: TileId) -> &str {
        &self.tiles[id as usize].name
    }

    pub fn sides(&self) -> &'static [Side] {
        match self.variant {
            Variant::Normal => &[Side::Top],
            Variant::Wormhole => &[Side::Top, Side::Bottom],
        }
    }

    /// Offset from the 8x8 names used by the fixed centre tables.
    pub fn wiring_shift(&self) -> i8 {
        centre_layout(self.size).map_or(0, |l| l.shift)
    }

    /// Canonical name of a grid cell, or `None` when off the board.
    pub fn cell_name(&self, col: u8, row: u8, side: Side) -> Option<String> {
        if col >= self.size.cols || row == 0 || row > self.size.rows {
            return None;
        }
        let side = match self.variant {
            Variant::Normal => None,
            Variant::Wormhole => Some(side),
        };
        Some(tile_name(col, row, None, side))
    }

    fn create_tiles(&mut self, layout: &CentreLayout) -> ConfigResult<()> {
        let wormhole = self.variant == Variant::Wormhole;
        for &side in self.sides() {
            for col in 0..self.size.cols {
                for row in 1..=self.size.rows {
                    let is_loop = wormhole
                        && layout.loop_cols.contains(&col)
                        && layout.loop_rows.contains(&row);
                    let pentagon = wormhole && layout.pentagons.contains(&(col, row));
                    let side_tag = wormhole.then_some(side);

                    self.push_tile(tile_name(col, row, None, side_tag), row, col, side, pentagon, is_loop)?;
                    if is_loop {
                        for idx in 1..=2 {
                            self.push_tile(
                                tile_name(col, row, Some(idx), side_tag),
                                row,
                                col,
                                side,
                                false,
                                true,
                            )?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn push_tile(
        &mut self,
        name: String,
        row: u8,
        col: u8,
        side: Side,
        pentagon: bool,
        loop_tile: bool,
    ) -> ConfigResult<()> {
        if self.tiles.len() >= MAX_TILES {
            return Err(ConfigurationError::UnsupportedBoard {
                rows: self.size.rows,
                cols: self.size.cols,
                variant: self.variant.to_string(),
            });
        }
        let id = self.tiles.len() as TileId;
        self.index.insert(name.clone(), id);
        self.tiles.push(Tile {
            id,
            name,
            row,
            col,
            side,
            pentagon,
            loop_tile,
            neighbors: [None; DIRECTION_COUNT],
            relations: Vec::new(),
        });
        Ok(())
    }

    /// Plain grid adjacency. Loop duplicates inherit the neighbors of their
    /// base cell until the centre tables replace them.
    fn connect_grid(&mut self) {
        for i in 0..self.tiles.len() {
            let (row, col, side) = {
                let t = &self.tiles[i];
                (t.row as i16, t.col as i16, t.side)
            };
            for d in Direction::COMPASS {
                let Some((dr, dc)) = d.grid_step(side == Side::Bottom) else {
                    continue;
                };
                let (r, c) = (row + dr as i16, col + dc as i16);
                if r < 1 || c < 0 || r > self.size.rows as i16 || c >= self.size.cols as i16 {
                    continue;
                }
                let neighbor = self
                    .cell_name(c as u8, r as u8, side)
                    .and_then(|name| self.tile_id(&name));
                self.tiles[i].neighbors[d.index()] = neighbor;
            }
        }
    }

    /// A pentagon next to a loop cell reaches its duplicates through the two
    /// extra slots.
    fn connect_pentagons(&mut self) {
        for i in 0..self.tiles.len() {
            if !self.tiles[i].pentagon {
                continue;
            }
            for d in Direction::COMPASS {
                let Some(n) = self.tiles[i].neighbor(d) else {
                    continue;
                };
                let neighbor = &self.tiles[n as usize];
                if !neighbor.loop_tile {
                    continue;
                }
                let side = Some(neighbor.side);
                let straight = self.tile_id(&tile_name(neighbor.col, neighbor.row, Some(1), side));
                let diagonal = self.tile_id(&tile_name(neighbor.col, neighbor.row, Some(2), side));
                let tile = &mut self.tiles[i];
                tile.neighbors[Direction::AdditionalStraight.index()] = straight;
                tile.neighbors[Direction::AdditionalDiagonal.index()] = diagonal;
            }
        }
    }

    fn resolve_table_name(&self, name: &str, shift: i8) -> ConfigResult<Option<TileId>> {
        let shifted = shift_tile_name(name, shift)
            .ok_or_else(|| ConfigurationError::Wiring(name.to_owned()))?;
        Ok(self.tile_id(&shifted))
    }

    fn apply_connection_table(&mut self, table: ConnectionTable, shift: i8) -> ConfigResult<()> {
        for (tile_name, entries) in table {
            let tile = self
                .resolve_table_name(tile_name, shift)?
                .ok_or_else(|| ConfigurationError::Wiring(tile_name.to_string()))?;
            for (dir, neighbor) in *entries {
                let d = Direction::from_short(dir)
                    .ok_or_else(|| ConfigurationError::Wiring(format!("{tile_name}:{dir}")))?;
                let target = self.resolve_table_name(neighbor, shift)?;
                self.tiles[tile as usize].neighbors[d.index()] = target;
            }
        }
        Ok(())
    }

    fn apply_pentagon_relations(&mut self, shift: i8) -> ConfigResult<()> {
        for (tile_name, rules) in PENTAGON_RELATIONS {
            let tile = self
                .resolve_table_name(tile_name, shift)?
                .ok_or_else(|| ConfigurationError::Wiring(tile_name.to_string()))?;
            let mut relations = Vec::with_capacity(rules.len());
            for (from, to) in *rules {
                let parse = |s: &str| {
                    Direction::from_short(s)
                        .ok_or_else(|| ConfigurationError::Wiring(format!("{tile_name}:{s}")))
                };
                relations.push(PentagonRelation {
                    from: parse(*from)?,
                    to: to.iter().map(|d| parse(*d)).collect::<ConfigResult<Vec<_>>>()?,
                });
            }
            self.tiles[tile as usize].relations = relations;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wormhole() -> Topology {
        Topology::build(BoardSize::EIGHT, Variant::Wormhole).expect("8x8 wormhole should build")
    }

    fn id(t: &Topology, name: &str) -> TileId {
        t.tile_id(name).unwrap_or_else(|| panic!("{name} should exist"))
    }

    #[test]
    fn wormhole_eight_has_expected_tile_count_and_order() {
        let t = wormhole();
        assert_eq!(t.tile_count(), 144);
        assert_eq!(t.name(0), "a1_T");
        assert_eq!(t.name(1), "a2_T");
        let d4 = id(&t, "d4_T");
        assert_eq!(t.name(d4 + 1), "d4_1_T");
        assert_eq!(t.name(d4 + 2), "d4_2_T");
        assert_eq!(t.name(72), "a1_B");
    }

    #[test]
    fn unsupported_sizes_are_configuration_errors() {
        let err = Topology::build(BoardSize::square(7), Variant::Wormhole)
            .expect_err("7x7 should be rejected");
        assert!(matches!(err, ConfigurationError::UnsupportedBoard { rows: 7, .. }));
    }

    #[test]
    fn bottom_sheet_is_mirrored() {
        let t = wormhole();
        let b3 = t.tile(id(&t, "b3_B"));
        assert_eq!(b3.neighbor(Direction::Left), Some(id(&t, "c3_B")));
        assert_eq!(b3.neighbor(Direction::Right), Some(id(&t, "a3_B")));
        let b3_top = t.tile(id(&t, "b3_T"));
        assert_eq!(b3_top.neighbor(Direction::Left), Some(id(&t, "a3_T")));
    }

    #[test]
    fn pentagon_extra_slots_point_at_loop_duplicates() {
        let t = wormhole();
        let c3 = t.tile(id(&t, "c3_T"));
        assert!(c3.pentagon);
        assert_eq!(c3.neighbor(Direction::AdditionalStraight), Some(id(&t, "d4_1_T")));
        assert_eq!(c3.neighbor(Direction::AdditionalDiagonal), Some(id(&t, "d4_2_T")));
        assert_eq!(
            c3.continuations(Direction::Down),
            vec![Direction::Up, Direction::AdditionalStraight]
        );
    }

    #[test]
    fn centre_tables_override_grid_neighbors() {
        let t = wormhole();
        let loop_tile = t.tile(id(&t, "d4_1_T"));
        assert_eq!(loop_tile.neighbor(Direction::Up), Some(id(&t, "d4_1_B")));
        assert_eq!(loop_tile.neighbor(Direction::Down), Some(id(&t, "c3_T")));
        let d4 = t.tile(id(&t, "d4_T"));
        assert_eq!(d4.neighbor(Direction::Up), Some(id(&t, "d4_B")));
        assert_eq!(d4.neighbor(Direction::Right), Some(id(&t, "e4_T")));
    }

    #[test]
    fn six_by_six_uses_shifted_centre() {
        let t = Topology::build(BoardSize::SIX, Variant::Wormhole).expect("6x6 should build");
        assert_eq!(t.tile_count(), 36 * 2 + 16);
        assert!(t.tile(id(&t, "b2_T")).pentagon);
        let c3_1 = t.tile(id(&t, "c3_1_T"));
        assert_eq!(c3_1.neighbor(Direction::Down), Some(id(&t, "b2_T")));
    }

    #[test]
    fn normal_board_has_plain_names() {
        let t = Topology::build(BoardSize::EIGHT, Variant::Normal).expect("normal should build");
        assert_eq!(t.tile_count(), 64);
        let e4 = t.tile(id(&t, "e4"));
        assert_eq!(e4.neighbor(Direction::Up), Some(id(&t, "e5")));
        assert!(t.tiles().iter().all(|x| !x.pentagon && !x.loop_tile));
    }

    #[test]
    fn build_is_deterministic() {
        assert_eq!(wormhole(), wormhole());
    }
}

//! Tiles and tile sets.

use serde::{Deserialize, Serialize};

use crate::board::directions::{Direction, Side, DIRECTION_COUNT};

/// Dense tile index, `0..tile_count`.
pub type TileId = u8;

pub const MAX_TILES: usize = 256;

/// Continuation rule at a pentagon: arriving from `from`, a ray carries on
/// along every direction in `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PentagonRelation {
    pub from: Direction,
    pub to: Vec<Direction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub name: String,
    /// One-based row as written in the tile name.
    pub row: u8,
    /// Zero-based column (`a == 0`).
    pub col: u8,
    pub side: Side,
    pub pentagon: bool,
    pub loop_tile: bool,
    pub neighbors: [Option<TileId>; DIRECTION_COUNT],
    pub relations: Vec<PentagonRelation>,
}

impl Tile {
    #[inline]
    pub fn neighbor(&self, direction: Direction) -> Option<TileId> {
        self.neighbors[direction.index()]
    }

    /// Direction from this tile that points at `other`.
    ///
    /// When two slots hold the same neighbor the later slot wins.
    pub fn direction_to(&self, other: TileId) -> Option<Direction> {
        Direction::ALL
            .iter()
            .rev()
            .copied()
            .find(|d| self.neighbors[d.index()] == Some(other))
    }

    /// Directions a ray continues along after entering this tile from the
    /// neighbor that lies in direction `from`.
    pub fn continuations(&self, from: Direction) -> Vec<Direction> {
        if self.pentagon {
            if let Some(rel) = self.relations.iter().find(|r| r.from == from) {
                return rel.to.clone();
            }
        }
        from.opposite().into_iter().collect()
    }

    /// Whether arriving from `from` can continue along `to`.
    pub fn relation_allows(&self, from: Direction, to: Direction) -> bool {
        self.relations
            .iter()
            .any(|r| r.from == from && r.to.contains(&to))
    }
}

/// Fixed-size bit set over tile ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSet {
    words: [u64; MAX_TILES / 64],
}

impl TileSet {
    #[inline]
    pub const fn new() -> Self {
        Self {
            words: [0; MAX_TILES / 64],
        }
    }

    #[inline]
    pub fn insert(&mut self, tile: TileId) -> bool {
        let (w, b) = (tile as usize / 64, tile as usize % 64);
        let fresh = self.words[w] & (1u64 << b) == 0;
        self.words[w] |= 1u64 << b;
        fresh
    }

    #[inline]
    pub fn contains(&self, tile: TileId) -> bool {
        self.words[tile as usize / 64] & (1u64 << (tile as usize % 64)) != 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = TileId> + '_ {
        self.words.iter().enumerate().flat_map(|(w, word)| {
            let mut bits = *word;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let b = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                Some((w * 64 + b) as TileId)
            })
        })
    }
}

impl FromIterator<TileId> for TileSet {
    fn from_iter<I: IntoIterator<Item = TileId>>(iter: I) -> Self {
        let mut set = TileSet::new();
        for t in iter {
            set.insert(t);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_set_tracks_membership_across_words() {
        let mut set = TileSet::new();
        assert!(set.insert(3));
        assert!(set.insert(143));
        assert!(!set.insert(3));
        assert!(set.contains(143));
        assert!(!set.contains(64));
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![3, 143]);
    }

    #[test]
    fn later_neighbor_slot_wins_inverse_lookup() {
        let mut neighbors = [None; DIRECTION_COUNT];
        neighbors[Direction::Up.index()] = Some(7);
        neighbors[Direction::AdditionalStraight.index()] = Some(7);
        let tile = Tile {
            id: 0,
            name: "c3_T".to_owned(),
            row: 3,
            col: 2,
            side: Side::Top,
            pentagon: true,
            loop_tile: false,
            neighbors,
            relations: vec![],
        };
        assert_eq!(tile.direction_to(7), Some(Direction::AdditionalStraight));
        assert_eq!(tile.direction_to(8), None);
    }
}

//! Play/win statistics keyed by (seat, position hash).
//!
//! Each Monte-Carlo worker fills its own table; tables are merged into the
//! engine's persistent table after the batch, on one thread.

use std::collections::HashMap;

pub type StatsKey = (usize, u64);

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeStats {
    pub plays: u32,
    /// Sum of rewards; a draw counts one half.
    pub wins: f64,
}

impl NodeStats {
    #[inline]
    pub fn win_rate(self) -> f64 {
        if self.plays == 0 {
            0.0
        } else {
            self.wins / f64::from(self.plays)
        }
    }

    /// UCB1 with exploration constant `c`; `ln_parent` is the natural log of
    /// the summed plays of all siblings.
    #[inline]
    pub fn ucb1(self, ln_parent: f64, c: f64) -> f64 {
        let plays = f64::from(self.plays.max(1));
        self.win_rate() + c * (ln_parent / plays).sqrt()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimulationStats {
    entries: HashMap<StatsKey, NodeStats>,
}

impl SimulationStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, key: StatsKey) -> Option<NodeStats> {
        self.entries.get(&key).copied()
    }

    /// Add an empty node; returns false if it was already tracked.
    pub fn expand(&mut self, key: StatsKey) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, NodeStats::default());
        true
    }

    pub fn record(&mut self, key: StatsKey, reward: f64) {
        let node = self.entries.entry(key).or_default();
        node.plays += 1;
        node.wins += reward;
    }

    /// Fold another table's counts into this one.
    pub fn merge(&mut self, other: SimulationStats) {
        for (key, theirs) in other.entries {
            let node = self.entries.entry(key).or_default();
            node.plays += theirs.plays;
            node.wins += theirs.wins;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

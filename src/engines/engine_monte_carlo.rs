//! Parallel flat Monte-Carlo search.
//!
//! Every simulation copies the game, walks down the part of the tree already
//! in the statistics using UCB1, adds the first unseen position, then plays
//! random moves until the game ends or the rollout cap is hit. Nodes are keyed
//! by (seat that moved, resulting hash), so one table serves every seat.
//!
//! Workers run on scoped threads against a read-only snapshot of the
//! engine's table and return their own deltas, which are merged after the
//! batch. The shared budget is checked between simulations only.

use std::time::Duration;

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::engines::engine_trait::{parse_option, Engine, EngineOutput, GoParams};
use crate::game_state::chess_types::Move;
use crate::game_state::game_state::GameState;
use crate::search::simulation_stats::{NodeStats, SimulationStats, StatsKey};
use crate::search::threading::{SearchBudget, SharedSearchState, ThreadingConfig};

pub const DEFAULT_EXPLORATION: f64 = 1.4;
pub const DEFAULT_MAX_ROLLOUT_MOVES: usize = 120;

const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, Copy)]
struct RolloutSettings {
    exploration: f64,
    max_rollout_moves: usize,
}

pub struct MonteCarloEngine {
    threading: ThreadingConfig,
    budget: SearchBudget,
    settings: RolloutSettings,
    seed: Option<u64>,
    batches: u64,
    stats: SimulationStats,
}

impl MonteCarloEngine {
    pub fn new() -> Self {
        Self {
            threading: ThreadingConfig::default(),
            budget: SearchBudget::default(),
            settings: RolloutSettings {
                exploration: DEFAULT_EXPLORATION,
                max_rollout_moves: DEFAULT_MAX_ROLLOUT_MOVES,
            },
            seed: None,
            batches: 0,
            stats: SimulationStats::new(),
        }
    }

    pub fn with_budget(budget: SearchBudget, threads: usize) -> Self {
        Self {
            threading: ThreadingConfig {
                requested_threads: threads,
            },
            budget,
            ..Self::new()
        }
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }

    pub fn set_max_rollout_moves(&mut self, moves: usize) {
        self.settings.max_rollout_moves = moves.max(1);
    }

    #[inline]
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    fn budget_for(&self, params: &GoParams) -> SearchBudget {
        let mut budget = self.budget;
        if let Some(simulations) = params.simulations {
            budget.simulations = simulations;
        }
        if let Some(ms) = params.movetime_ms {
            budget.move_time = Some(Duration::from_millis(ms));
        }
        if let Some(remaining) = params.remaining_ms {
            // Spend at most a quarter of what is left on the clock.
            let cap = Duration::from_millis(remaining / 4);
            budget.move_time = Some(budget.move_time.map_or(cap, |t| t.min(cap)));
        }
        budget
    }

    fn batch_seed(&mut self) -> u64 {
        let base = self.seed.unwrap_or_else(rand::random);
        self.batches += 1;
        base.wrapping_add(self.batches.wrapping_mul(SEED_STRIDE))
    }

    /// Run one batch of simulations and fold the results into `self.stats`.
    fn run_batch(&mut self, game: &GameState, budget: SearchBudget) -> Result<u64, String> {
        let shared = SharedSearchState::new(budget);
        let workers = self.threading.workers_for(budget.simulations);
        let seed = self.batch_seed();
        let settings = self.settings;
        let snapshot = &self.stats;

        let deltas = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|worker| {
                    let shared = &shared;
                    scope.spawn(move || {
                        let mut rng = StdRng::seed_from_u64(seed ^ (worker as u64).wrapping_mul(SEED_STRIDE));
                        let mut local = SimulationStats::new();
                        while shared.try_claim_simulation() {
                            run_simulation(game, snapshot, &mut local, &mut rng, settings);
                            shared.finish_simulation();
                        }
                        local
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().map_err(|_| "monte carlo worker panicked".to_owned()))
                .collect::<Result<Vec<_>, String>>()
        })?;

        for delta in deltas {
            self.stats.merge(delta);
        }
        debug!(
            workers,
            simulations = shared.simulations_completed(),
            nodes = self.stats.len(),
            "monte carlo batch finished"
        );
        Ok(shared.simulations_completed())
    }
}

impl Default for MonteCarloEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Stats for `key` as seen by a worker: the shared snapshot plus its own
/// additions.
#[inline]
fn lookup(snapshot: &SimulationStats, local: &SimulationStats, key: StatsKey) -> Option<NodeStats> {
    match (snapshot.get(key), local.get(key)) {
        (None, None) => None,
        (a, b) => {
            let (a, b) = (a.unwrap_or_default(), b.unwrap_or_default());
            Some(NodeStats {
                plays: a.plays + b.plays,
                wins: a.wins + b.wins,
            })
        }
    }
}

fn run_simulation(
    game: &GameState,
    snapshot: &SimulationStats,
    local: &mut SimulationStats,
    rng: &mut StdRng,
    settings: RolloutSettings,
) {
    let mut sim = game.copy();
    let mut visited: Vec<StatsKey> = Vec::new();
    let mut in_tree = true;
    let mut children: Vec<(Move, u64)> = Vec::new();

    for _ in 0..settings.max_rollout_moves {
        if sim.is_finished() {
            break;
        }
        let seat = sim.current_seat();

        if !in_tree {
            let Some(&mv) = sim.legal_moves().choose(rng) else {
                break;
            };
            sim.play_unchecked(mv);
            continue;
        }

        children.clear();
        for i in 0..sim.legal_moves().len() {
            let mv = sim.legal_moves()[i];
            children.push((mv, sim.hash_after(mv)));
        }

        let known: Option<Vec<NodeStats>> = children
            .iter()
            .map(|(_, hash)| lookup(snapshot, local, (seat, *hash)))
            .collect();

        let picked = match known {
            Some(nodes) => {
                let total: u32 = nodes.iter().map(|n| n.plays).sum();
                let ln_parent = f64::from(total.max(1)).ln();
                nodes
                    .iter()
                    .zip(&children)
                    .max_by(|(a, _), (b, _)| {
                        a.ucb1(ln_parent, settings.exploration)
                            .total_cmp(&b.ucb1(ln_parent, settings.exploration))
                    })
                    .map(|(_, child)| *child)
            }
            None => {
                in_tree = false;
                children.choose(rng).copied()
            }
        };
        let Some((mv, hash)) = picked else {
            break;
        };

        sim.play_unchecked(mv);
        let key = (seat, hash);
        if !in_tree {
            local.expand(key);
        }
        visited.push(key);
    }

    visited.sort_unstable();
    visited.dedup();
    for key in visited {
        local.record(key, sim.reward(key.0));
    }
}

impl Engine for MonteCarloEngine {
    fn name(&self) -> &str {
        "monte-carlo"
    }

    fn new_game(&mut self) {
        self.stats.clear();
        self.batches = 0;
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), String> {
        if name.eq_ignore_ascii_case("Simulations") {
            self.budget.simulations = parse_option::<u64>(name, value)?.max(1);
        } else if name.eq_ignore_ascii_case("Threads") {
            self.threading.requested_threads = parse_option::<usize>(name, value)?.max(1);
        } else if name.eq_ignore_ascii_case("MoveTimeMs") {
            let ms = parse_option::<u64>(name, value)?;
            self.budget.move_time = (ms > 0).then(|| Duration::from_millis(ms));
        } else if name.eq_ignore_ascii_case("Seed") {
            self.set_seed(parse_option(name, value)?);
        } else if name.eq_ignore_ascii_case("MaxRolloutMoves") {
            self.set_max_rollout_moves(parse_option(name, value)?);
        } else if name.eq_ignore_ascii_case("Exploration") {
            self.settings.exploration = parse_option(name, value)?;
        } else {
            return Err(format!("unknown option '{name}'"));
        }
        Ok(())
    }

    fn choose_move(&mut self, game_state: &GameState, params: &GoParams) -> Result<EngineOutput, String> {
        let mut out = EngineOutput::default();
        let legal = game_state.legal_moves();
        match legal {
            [] => return Ok(out),
            [only] => {
                out.best_move = Some(*only);
                out.info_lines.push("monte_carlo forced move".to_owned());
                return Ok(out);
            }
            _ => {}
        }

        let budget = self.budget_for(params);
        let simulations = self.run_batch(game_state, budget)?;

        let seat = game_state.current_seat();
        let mut probe = game_state.copy();
        let mut ranked: Vec<(Move, NodeStats)> = legal
            .iter()
            .map(|&mv| {
                let hash = probe.hash_after(mv);
                (mv, self.stats.get((seat, hash)).unwrap_or_default())
            })
            .collect();
        ranked.sort_by(|(_, a), (_, b)| {
            b.win_rate()
                .total_cmp(&a.win_rate())
                .then_with(|| b.plays.cmp(&a.plays))
        });

        out.info_lines.push(format!(
            "monte_carlo simulations {simulations} nodes {}",
            self.stats.len()
        ));
        let board = game_state.board();
        for (mv, node) in ranked.iter().take(5) {
            out.info_lines.push(format!(
                "{}-{}: {:.2}% ({:.1} / {})",
                board.tile_name(mv.from),
                board.tile_name(mv.to),
                100.0 * node.win_rate(),
                node.wins,
                node.plays
            ));
        }
        out.best_move = ranked.first().map(|(mv, _)| *mv);
        Ok(out)
    }
}

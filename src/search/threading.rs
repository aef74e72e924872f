//! Worker-pool configuration and shared budget control for parallel search.
//!
//! Workers never share statistics while running; the only cross-thread state
//! is the stop flag and the simulation counter held in `SharedSearchState`.

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

/// Threading configuration owned by the engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadingConfig {
    pub requested_threads: usize,
}

impl Default for ThreadingConfig {
    fn default() -> Self {
        Self {
            requested_threads: std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

impl ThreadingConfig {
    #[inline]
    pub fn normalized_threads(self) -> usize {
        self.requested_threads.max(1)
    }

    /// Workers worth spawning for `jobs` units of work.
    #[inline]
    pub fn workers_for(self, jobs: u64) -> usize {
        let jobs = usize::try_from(jobs).unwrap_or(usize::MAX).max(1);
        self.normalized_threads().min(jobs)
    }
}

/// Limits for one move decision. Whichever runs out first ends the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudget {
    pub simulations: u64,
    pub move_time: Option<Duration>,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            simulations: 1_000,
            move_time: Some(Duration::from_secs(1)),
        }
    }
}

/// Shared cancellation + accounting state for one batch of workers.
#[derive(Debug)]
pub struct SharedSearchState {
    stop: AtomicBool,
    claimed: AtomicU64,
    completed: AtomicU64,
    simulation_budget: u64,
    deadline: Option<Instant>,
}

impl SharedSearchState {
    pub fn new(budget: SearchBudget) -> Arc<Self> {
        Arc::new(Self {
            stop: AtomicBool::new(false),
            claimed: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            simulation_budget: budget.simulations,
            deadline: budget.move_time.map(|t| Instant::now() + t),
        })
    }

    #[inline]
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Reserve one simulation. Returns false once the budget, the deadline
    /// or an explicit stop says the batch is over.
    pub fn try_claim_simulation(&self) -> bool {
        if self.should_stop() {
            return false;
        }
        if self.deadline_passed() {
            self.request_stop();
            return false;
        }
        let previous = self.claimed.fetch_add(1, Ordering::Relaxed);
        if previous >= self.simulation_budget {
            self.request_stop();
            return false;
        }
        true
    }

    #[inline]
    pub fn finish_simulation(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn simulations_completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threading_config_normalizes_threads() {
        let cfg = ThreadingConfig { requested_threads: 0 };
        assert_eq!(cfg.normalized_threads(), 1);

        let cfg = ThreadingConfig { requested_threads: 8 };
        assert_eq!(cfg.workers_for(3), 3);
        assert_eq!(cfg.workers_for(0), 1);
        assert_eq!(cfg.workers_for(100), 8);
    }

    #[test]
    fn simulation_budget_is_never_overdrawn() {
        let state = SharedSearchState::new(SearchBudget {
            simulations: 5,
            move_time: None,
        });
        let granted = (0..10).filter(|_| state.try_claim_simulation()).count();
        assert_eq!(granted, 5);
        assert!(state.should_stop());
    }

    #[test]
    fn expired_deadline_stops_the_batch() {
        let state = SharedSearchState::new(SearchBudget {
            simulations: u64::MAX,
            move_time: Some(Duration::ZERO),
        });
        assert!(!state.try_claim_simulation());
        assert!(state.should_stop());
    }

    #[test]
    fn stop_request_wins_over_remaining_budget() {
        let state = SharedSearchState::new(SearchBudget {
            simulations: 100,
            move_time: None,
        });
        assert!(state.try_claim_simulation());
        state.finish_simulation();
        state.request_stop();
        assert!(!state.try_claim_simulation());
        assert_eq!(state.simulations_completed(), 1);
    }
}

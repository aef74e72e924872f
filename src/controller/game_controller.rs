//! Turn driver around `GameState`.
//!
//! Seats backed by an engine are played synchronously whenever the turn
//! advances, so callers only ever see a human seat to move or a finished
//! game. Each seat has a chess clock; running out eliminates the seat.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::chess_errors::{ChessError, ChessResult, IllegalMoveError};
use crate::engines::engine_monte_carlo::MonteCarloEngine;
use crate::engines::engine_random::RandomEngine;
use crate::engines::engine_trait::{Engine, GoParams};
use crate::game_state::chess_types::{EliminationReason, GameStatus, Move};
use crate::game_state::game_state::{GameState, Turn};
use crate::game_state::players::ControllerKind;
use crate::search::threading::SearchBudget;

/// How automated seats are configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentSettings {
    /// Base seed; each seat derives its own from it.
    pub seed: Option<u64>,
    pub budget: SearchBudget,
    pub threads: usize,
    pub max_rollout_moves: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            seed: None,
            budget: SearchBudget::default(),
            threads: std::thread::available_parallelism().map_or(1, |n| n.get()),
            max_rollout_moves: crate::engines::engine_monte_carlo::DEFAULT_MAX_ROLLOUT_MOVES,
        }
    }
}

/// Engine for a seat, or `None` for a human.
pub fn build_agent(kind: ControllerKind, seat: usize, settings: &AgentSettings) -> Option<Box<dyn Engine>> {
    let seed = settings.seed.map(|s| s.wrapping_add(seat as u64));
    match kind {
        ControllerKind::Human => None,
        ControllerKind::Random => Some(Box::new(match seed {
            Some(seed) => RandomEngine::with_seed(seed),
            None => RandomEngine::new(),
        })),
        ControllerKind::MonteCarlo => {
            let mut engine = MonteCarloEngine::with_budget(settings.budget, settings.threads);
            engine.set_max_rollout_moves(settings.max_rollout_moves);
            if let Some(seed) = seed {
                engine.set_seed(seed);
            }
            Some(Box::new(engine))
        }
    }
}

pub struct GameController {
    game: GameState,
    agents: Vec<Option<Box<dyn Engine>>>,
    clocks: Vec<Duration>,
    turn_started: DateTime<Utc>,
}

impl GameController {
    /// Seat engines according to each player's controller kind.
    pub fn new(game: GameState, settings: &AgentSettings) -> Self {
        let agents = game
            .players()
            .iter()
            .map(|p| build_agent(p.controller, p.id, settings))
            .collect();
        Self::with_agents(game, agents)
    }

    /// Use caller-supplied engines; `agents[seat]` is `None` for humans.
    pub fn with_agents(game: GameState, mut agents: Vec<Option<Box<dyn Engine>>>) -> Self {
        agents.resize_with(game.players().len(), || None);
        for engine in agents.iter_mut().flatten() {
            engine.new_game();
        }
        let clocks = vec![game.config().turn_time; game.players().len()];
        Self {
            game,
            agents,
            clocks,
            turn_started: Utc::now(),
        }
    }

    #[inline]
    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Time left on a seat's clock, not counting the turn in progress.
    #[inline]
    pub fn clock(&self, seat: usize) -> Duration {
        self.clocks.get(seat).copied().unwrap_or_else(Duration::zero)
    }

    /// Resolve automated seats, then report who is to move.
    pub fn get_turn(&mut self) -> ChessResult<Turn> {
        self.resolve_bots()?;
        Ok(self.game.get_turn())
    }

    /// Play a human move. The mover's clock is charged first; a move made
    /// after the flag fell is discarded and the seat is eliminated.
    pub fn submit_move(&mut self, mv: Move) -> ChessResult<Turn> {
        if self.game.is_finished() {
            return Err(IllegalMoveError::GameFinished.into());
        }
        let seat = self.game.current_seat();
        if self.agents[seat].is_some() {
            return Err(IllegalMoveError::NotHumanTurn.into());
        }
        self.game.validate_move(mv)?;
        if self.charge_clock(seat) {
            self.game.make_move(mv)?;
        }
        self.announce_if_finished();
        self.get_turn()
    }

    /// Play the current seat's engine move, if it has one.
    pub fn play_bot_turn(&mut self) -> ChessResult<Option<Move>> {
        if self.game.is_finished() {
            return Ok(None);
        }
        let seat = self.game.current_seat();
        let Some(engine) = self.agents[seat].as_mut() else {
            return Ok(None);
        };

        let params = GoParams {
            remaining_ms: u64::try_from(self.clocks[seat].num_milliseconds()).ok(),
            ..GoParams::default()
        };
        let out = engine
            .choose_move(&self.game, &params)
            .map_err(ChessError::Engine)?;
        for line in &out.info_lines {
            debug!(seat, engine = engine.name(), "{line}");
        }

        if !self.charge_clock(seat) {
            self.announce_if_finished();
            return Ok(None);
        }
        let chosen = match out.best_move.or_else(|| self.game.legal_moves().first().copied()) {
            Some(mv) => mv,
            None => return Ok(None),
        };
        self.game.make_move(chosen)?;
        self.announce_if_finished();
        Ok(Some(chosen))
    }

    /// Play engine seats until the game ends or a human is to move.
    pub fn play_until_finished(&mut self) -> ChessResult<GameStatus> {
        self.resolve_bots()?;
        Ok(self.game.status())
    }

    /// Take back the last move, e.g. for a human's undo request.
    ///
    /// Flag falls are not moves: a seat eliminated on time stays out after
    /// the move before it is taken back, and its clock is not refilled.
    pub fn undo_last(&mut self) {
        if !self.game.history().is_empty() {
            self.game.undo_last();
            self.turn_started = Utc::now();
        }
    }

    fn resolve_bots(&mut self) -> ChessResult<()> {
        while !self.game.is_finished() && self.agents[self.game.current_seat()].is_some() {
            self.play_bot_turn()?;
        }
        Ok(())
    }

    /// Charge the time since the turn began. Returns false, after
    /// eliminating the seat, if its clock ran out.
    fn charge_clock(&mut self, seat: usize) -> bool {
        let now = Utc::now();
        self.clocks[seat] = self.clocks[seat] - (now - self.turn_started);
        self.turn_started = now;
        if self.clocks[seat] > Duration::zero() {
            return true;
        }
        self.game.eliminate(seat, EliminationReason::Timeout);
        false
    }

    fn announce_if_finished(&self) {
        if !self.game.is_finished() {
            return;
        }
        match self.game.status() {
            GameStatus::PlayerWon(seat) => info!(
                seat,
                color = %self.game.players()[seat].color,
                moves = self.game.move_count(),
                "game won"
            ),
            status => info!(?status, moves = self.game.move_count(), "game drawn"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::topology::{BoardSize, Variant};
    use crate::game_state::game_config::GameConfig;
    use crate::game_state::players::create_players;

    fn controller(variant: Variant, kinds: &[ControllerKind], config: GameConfig) -> GameController {
        let players = create_players(variant, kinds).expect("players should seat");
        let game = GameState::new_game(players, BoardSize::EIGHT, variant, None, config).expect("game should start");
        let settings = AgentSettings {
            seed: Some(11),
            ..AgentSettings::default()
        };
        GameController::new(game, &settings)
    }

    #[test]
    fn random_bots_play_to_a_terminal_state() {
        let config = GameConfig {
            max_turns: 60,
            ..GameConfig::default()
        };
        let mut ctl = controller(Variant::Wormhole, &[ControllerKind::Random; 4], config);
        let status = ctl.play_until_finished().expect("bots should play");
        assert_ne!(status, GameStatus::Playing);
        assert!(ctl.game().move_count() <= 60);
        assert_eq!(ctl.get_turn().expect("finished game should report"), Turn::Skip);
    }

    #[test]
    fn human_move_is_answered_by_the_bot() {
        let mut ctl = controller(
            Variant::Normal,
            &[ControllerKind::Human, ControllerKind::Random],
            GameConfig::default(),
        );
        assert_eq!(ctl.get_turn().expect("turn should resolve"), Turn::Play(0));
        let mv = ctl.game().legal_moves()[0];
        let next = ctl.submit_move(mv).expect("legal move should be accepted");
        assert_eq!(next, Turn::Play(0));
        assert_eq!(ctl.game().move_count(), 2);
    }

    #[test]
    fn illegal_or_out_of_turn_submissions_are_rejected() {
        let mut ctl = controller(
            Variant::Normal,
            &[ControllerKind::Random, ControllerKind::Human],
            GameConfig::default(),
        );
        let mv = ctl.game().legal_moves()[0];
        assert!(matches!(
            ctl.submit_move(mv),
            Err(ChessError::IllegalMove(IllegalMoveError::NotHumanTurn))
        ));

        assert_eq!(ctl.get_turn().expect("bot should move"), Turn::Play(1));
        let before = ctl.clock(1);
        assert!(matches!(
            ctl.submit_move(Move::new(0, 0, 0, 0)),
            Err(ChessError::IllegalMove(IllegalMoveError::NotLegal { .. }))
        ));
        assert_eq!(ctl.clock(1), before);
        assert_eq!(ctl.game().move_count(), 1);
    }

    #[test]
    fn empty_clock_eliminates_the_seat() {
        let config = GameConfig {
            turn_time: Duration::zero(),
            ..GameConfig::default()
        };
        let mut ctl = controller(Variant::Normal, &[ControllerKind::Random; 2], config);
        let status = ctl.play_until_finished().expect("bots should play");
        assert_eq!(status, GameStatus::PlayerWon(1));
        assert_eq!(ctl.game().move_count(), 0);
    }

    #[test]
    fn undo_takes_back_the_last_move() {
        let mut ctl = controller(
            Variant::Normal,
            &[ControllerKind::Human, ControllerKind::Random],
            GameConfig::default(),
        );
        let mv = ctl.game().legal_moves()[0];
        ctl.submit_move(mv).expect("legal move should be accepted");
        ctl.undo_last();
        ctl.undo_last();
        assert_eq!(ctl.game().move_count(), 0);
        ctl.undo_last();
        assert_eq!(ctl.game().move_count(), 0);
    }

    #[test]
    fn undo_does_not_revive_a_seat_that_ran_out_of_time() {
        let mut ctl = controller(Variant::Wormhole, &[ControllerKind::Human; 4], GameConfig::default());
        let mv = ctl.game().legal_moves()[0];
        assert_eq!(ctl.submit_move(mv).expect("legal move should be accepted"), Turn::Play(1));

        ctl.clocks[1] = Duration::zero();
        assert!(!ctl.charge_clock(1));
        assert!(!ctl.game().is_seat_alive(1));
        assert_eq!(ctl.game().current_seat(), 2);

        ctl.undo_last();
        assert_eq!(ctl.game().move_count(), 0);
        assert_eq!(ctl.game().current_seat(), 0);
        assert!(!ctl.game().is_seat_alive(1));
        assert!(!ctl.game().is_finished());
    }
}

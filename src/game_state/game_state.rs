//! Game controller state machine.
//!
//! `GameState` owns one position plus the turn order, counters, repetition
//! table and move history. Every committed move advances the turn to the next
//! living seat; a seat with no legal moves is settled right there (eliminated
//! in games of more than two, decisive or drawn in two-player games), so the
//! cached move list always belongs to the player to move.
//!
//! Search copies replay thousands of games, so per-move events log at debug
//! level; the turn driver reports results at info.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::board::board::Board;
use crate::board::topology::{BoardSize, Variant};
use crate::chess_errors::{ChessResult, IllegalMoveError};
use crate::game_state::chess_rules::MAX_TEAMS;
use crate::game_state::chess_types::{
    DrawReason, EliminationReason, GameStatus, Move, PieceKind, FLAG_CAPTURE, FLAG_PAWN_MOVE,
};
use crate::game_state::game_config::GameConfig;
use crate::game_state::players::{default_teams, ControllerKind, Player};
use crate::game_state::position::Position;
use crate::game_state::starting_position::{default_position, load_position};
use crate::game_state::undo_state::UndoState;
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_move_checks::is_in_check;
use crate::move_generation::legal_move_generator::legal_moves;
use crate::search::zobrist::{compute_hash, update_hash};
use crate::utils::board_encoding::encode_position;

/// What the caller should do for the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// A human seat is to move.
    Play(usize),
    /// Nothing for a human to do: the seat is automated or the game is over.
    Skip,
}

#[derive(Debug, Clone)]
pub struct GameState {
    position: Position,
    players: Vec<Player>,
    config: GameConfig,
    turn: usize,
    move_count: usize,
    moves_without_progress: u32,
    hash: u64,
    repetitions: HashMap<u64, u32>,
    history: Vec<UndoState>,
    status: GameStatus,
    current_moves: Vec<Move>,
}

impl GameState {
    /// Build the board (or load it from the configured cache) and set up a
    /// game. `starting_position` is a position document; `None` uses the
    /// built-in layout for the board.
    pub fn new_game(
        players: Vec<Player>,
        size: BoardSize,
        variant: Variant,
        starting_position: Option<&str>,
        config: GameConfig,
    ) -> ChessResult<Self> {
        let board = Board::build(size, variant, config.cache_dir.as_deref())?;
        Self::with_board(board, players, starting_position, config)
    }

    /// Set up a game on an already built board.
    pub fn with_board(
        board: Arc<Board>,
        players: Vec<Player>,
        starting_position: Option<&str>,
        config: GameConfig,
    ) -> ChessResult<Self> {
        default_teams(board.variant(), players.len())?;
        let teams: Vec<usize> = players.iter().map(|p| p.team).collect();
        let position = match starting_position {
            Some(json) => load_position(&board, json, &teams, &config)?,
            None => default_position(&board, &teams, &config)?,
        };
        Ok(Self::from_position(position, players, config))
    }

    /// Wrap an existing position. Every seat's team must be alive in it.
    pub fn from_position(position: Position, players: Vec<Player>, config: GameConfig) -> Self {
        let hash = compute_hash(&position);
        let mut repetitions = HashMap::new();
        repetitions.insert(hash, 1);
        let history = Vec::with_capacity(config.max_turns);

        let mut game = Self {
            position,
            players,
            config,
            turn: 0,
            move_count: 0,
            moves_without_progress: 0,
            hash,
            repetitions,
            history,
            status: GameStatus::Playing,
            current_moves: Vec::new(),
        };
        info!(
            variant = %game.position.board().variant(),
            players = game.players.len(),
            "new game"
        );
        game.settle_turn();
        game.refresh_status();
        game
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn board(&self) -> &Board {
        self.position.board()
    }

    #[inline]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Seat index of the player to move.
    #[inline]
    pub fn current_seat(&self) -> usize {
        self.turn
    }

    #[inline]
    pub fn current_player(&self) -> &Player {
        &self.players[self.turn]
    }

    #[inline]
    pub fn is_seat_alive(&self, seat: usize) -> bool {
        self.players
            .get(seat)
            .is_some_and(|p| self.position.is_alive(p.team))
    }

    #[inline]
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    #[inline]
    pub fn moves_without_progress(&self) -> u32 {
        self.moves_without_progress
    }

    #[inline]
    pub fn history(&self) -> &[UndoState] {
        &self.history
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn position_hash(&self) -> u64 {
        self.hash
    }

    /// Legal moves of the player to move; empty once the game is over.
    #[inline]
    pub fn legal_moves(&self) -> &[Move] {
        &self.current_moves
    }

    /// `Play(seat)` for a living human seat, `Skip` otherwise.
    pub fn get_turn(&self) -> Turn {
        let player = self.current_player();
        if self.is_finished() || !self.position.is_alive(player.team) || player.controller != ControllerKind::Human {
            Turn::Skip
        } else {
            Turn::Play(player.id)
        }
    }

    /// Validate `mv` against the current legal set, then commit it. A
    /// rejected move leaves the game untouched.
    pub fn make_move(&mut self, mv: Move) -> Result<(), IllegalMoveError> {
        self.validate_move(mv)?;
        self.play_unchecked(mv);
        Ok(())
    }

    /// The error `make_move` would return for `mv`, if any.
    pub fn validate_move(&self, mv: Move) -> Result<(), IllegalMoveError> {
        if self.is_finished() {
            return Err(IllegalMoveError::GameFinished);
        }
        if !self.current_moves.contains(&mv) {
            let board = self.position.board();
            return Err(IllegalMoveError::NotLegal {
                player: self.turn,
                from: board.tile_name(mv.from).to_owned(),
                to: board.tile_name(mv.to).to_owned(),
            });
        }
        Ok(())
    }

    /// Commit a move known to be legal, e.g. one taken from `legal_moves`.
    pub fn play_unchecked(&mut self, mv: Move) {
        let prev_hash = self.hash;
        let prev_moves_without_progress = self.moves_without_progress;
        let prev_turn = self.turn;
        let prev_status = self.status;

        let record = make_move(&mut self.position, mv);
        self.hash = update_hash(self.hash, &record, &self.position);
        if mv.flags & (FLAG_CAPTURE | FLAG_PAWN_MOVE) != 0 {
            self.moves_without_progress = 0;
        } else {
            self.moves_without_progress += 1;
        }
        *self.repetitions.entry(self.hash).or_insert(0) += 1;
        self.move_count += 1;

        if let Some(team) = record.eliminated {
            debug!(team, reason = ?EliminationReason::KingCaptured, "player eliminated");
        }

        self.advance_seat();
        let settled_out = self.settle_turn();
        self.refresh_status();

        self.history.push(UndoState {
            record,
            prev_hash,
            prev_moves_without_progress,
            prev_turn,
            prev_status,
            settled_out,
        });
    }

    /// Position hash that `mv` would produce, leaving the game unchanged.
    pub fn hash_after(&mut self, mv: Move) -> u64 {
        let record = make_move(&mut self.position, mv);
        let hash = update_hash(self.hash, &record, &self.position);
        unmake_move(&mut self.position, &record);
        hash
    }

    /// Take back the last committed move.
    pub fn undo_last(&mut self) {
        let Some(undo) = self.history.pop() else {
            debug_assert!(false, "undo with empty history");
            return;
        };

        for team in 0..MAX_TEAMS {
            if undo.settled_out & (1 << team) != 0 {
                self.position.set_alive(team, true);
            }
        }
        unmake_move(&mut self.position, &undo.record);

        if let Some(count) = self.repetitions.get_mut(&self.hash) {
            *count -= 1;
            if *count == 0 {
                self.repetitions.remove(&self.hash);
            }
        }
        self.hash = undo.prev_hash;
        self.moves_without_progress = undo.prev_moves_without_progress;
        self.turn = undo.prev_turn;
        self.status = undo.prev_status;
        self.move_count -= 1;
        self.current_moves = if self.status == GameStatus::Playing {
            legal_moves(&mut self.position, self.players[self.turn].team)
        } else {
            Vec::new()
        };
    }

    /// Remove a seat from play outside of move making, e.g. on timeout.
    /// Not recorded in history.
    pub fn eliminate(&mut self, seat: usize, reason: EliminationReason) {
        let team = self.players[seat].team;
        if !self.position.is_alive(team) {
            return;
        }
        self.position.set_alive(team, false);
        info!(seat, team, ?reason, "player eliminated");
        if seat == self.turn {
            self.advance_seat();
        }
        // The dead team no longer gives check, so the mover's set can grow.
        self.settle_turn();
        self.refresh_status();
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.status != GameStatus::Playing
    }

    pub fn winner(&self) -> Option<usize> {
        match self.status {
            GameStatus::PlayerWon(seat) => Some(seat),
            _ => None,
        }
    }

    pub fn is_draw_by_repetition(&self) -> bool {
        self.repetitions.get(&self.hash).copied().unwrap_or(0) >= self.config.repetition_limit
    }

    pub fn is_draw_by_50_moves(&self) -> bool {
        self.moves_without_progress >= self.config.no_progress_limit(self.players.len())
    }

    /// Every living side is down to a king plus at most one minor piece.
    pub fn is_insufficient_material(&self) -> bool {
        self.players
            .iter()
            .filter(|p| self.position.is_alive(p.team))
            .all(|p| {
                let mut minors = 0;
                for (_, piece) in self.position.team_pieces(p.team) {
                    match piece.kind {
                        PieceKind::King => {}
                        kind if kind.is_minor() => minors += 1,
                        _ => return false,
                    }
                }
                minors <= 1
            })
    }

    /// Search payoff for `seat`: 1 for a win, 0 for a loss or elimination,
    /// one half otherwise.
    pub fn reward(&self, seat: usize) -> f64 {
        match self.status {
            GameStatus::PlayerWon(winner) => f64::from(u8::from(winner == seat)),
            _ if !self.is_seat_alive(seat) => 0.0,
            _ => 0.5,
        }
    }

    /// Independent copy for search; the board is shared.
    #[inline]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// One `i8` per tile, see `utils::board_encoding`.
    pub fn encode_board(&self) -> Vec<i8> {
        encode_position(&self.position)
    }

    fn living_seats(&self) -> usize {
        (0..self.players.len()).filter(|s| self.is_seat_alive(*s)).count()
    }

    /// Move the turn to the next living seat.
    fn advance_seat(&mut self) {
        let n = self.players.len();
        for step in 1..=n {
            let seat = (self.turn + step) % n;
            if self.is_seat_alive(seat) {
                self.turn = seat;
                return;
            }
        }
    }

    /// Resolve seats that cannot move and cache the moves of the seat that
    /// can. Returns the teams knocked out along the way as a bit mask.
    fn settle_turn(&mut self) -> u8 {
        let mut settled_out = 0u8;
        self.current_moves.clear();
        if self.status != GameStatus::Playing {
            return settled_out;
        }

        for _ in 0..self.players.len() {
            if self.living_seats() <= 1 {
                return settled_out;
            }
            let team = self.players[self.turn].team;
            let moves = legal_moves(&mut self.position, team);
            if !moves.is_empty() {
                self.current_moves = moves;
                return settled_out;
            }

            let checked = is_in_check(&self.position, team);
            let reason = if checked {
                EliminationReason::Checkmate
            } else {
                EliminationReason::Stalemate
            };

            if self.players.len() <= 2 {
                self.status = if checked {
                    let other = (self.turn + 1) % self.players.len();
                    GameStatus::PlayerWon(other)
                } else {
                    GameStatus::Draw(DrawReason::Stalemate)
                };
                debug!(seat = self.turn, ?reason, status = ?self.status, "game over");
                return settled_out;
            }

            self.position.set_alive(team, false);
            settled_out |= 1 << team;
            debug!(seat = self.turn, team, ?reason, "player eliminated");
            self.advance_seat();
        }
        settled_out
    }

    /// Terminal checks in priority order, applied while still playing.
    fn refresh_status(&mut self) {
        if self.status != GameStatus::Playing {
            return;
        }
        let status = if self.move_count >= self.config.max_turns {
            GameStatus::Draw(DrawReason::MaxTurns)
        } else if self.living_seats() <= 1 {
            match (0..self.players.len()).find(|s| self.is_seat_alive(*s)) {
                Some(seat) => GameStatus::PlayerWon(seat),
                None => GameStatus::Draw(DrawReason::Stalemate),
            }
        } else if self.is_insufficient_material() {
            GameStatus::Draw(DrawReason::InsufficientMaterial)
        } else if self.is_draw_by_repetition() {
            GameStatus::Draw(DrawReason::Repetition)
        } else if self.is_draw_by_50_moves() {
            GameStatus::Draw(DrawReason::NoProgress)
        } else {
            GameStatus::Playing
        };

        if status != GameStatus::Playing {
            self.status = status;
            self.current_moves.clear();
            debug!(status = ?status, moves = self.move_count, "game over");
        }
    }
}

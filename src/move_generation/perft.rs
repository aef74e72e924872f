//! Move-path enumeration for generator validation and benchmarking.
//!
//! Turns rotate through `seats` in order, skipping teams that are no longer
//! alive, exactly as the game controller advances.

use std::sync::Arc;
use std::thread;

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::chess_types::Move;
use crate::game_state::position::Position;
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::move_generator::MoveGenerator;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub castles: usize,
    pub promotions: usize,
    pub king_captures: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.king_captures += rhs.king_captures;
    }
}

/// Next living seat after `seat`, or `None` when nobody else is alive.
fn next_seat(position: &Position, seats: &[usize], seat: usize) -> Option<usize> {
    (1..=seats.len())
        .map(|step| (seat + step) % seats.len())
        .find(|s| position.is_alive(seats[*s]))
}

pub fn perft<G: MoveGenerator>(generator: &G, position: &mut Position, seats: &[usize], seat: usize, depth: u8) -> PerftCounts {
    perft_single_thread(generator, position, seats, seat, depth)
}

pub fn perft_single_thread<G: MoveGenerator + ?Sized>(
    generator: &G,
    position: &mut Position,
    seats: &[usize],
    seat: usize,
    depth: u8,
) -> PerftCounts {
    let mut total = PerftCounts::default();
    if depth == 0 {
        total.nodes = 1;
        return total;
    }
    let moves = generator.generate_moves(position, seats[seat]);
    for mv in moves {
        perft_recurse(generator, position, seats, seat, mv, depth, &mut total);
    }
    total
}

/// One worker thread per root move, each on its own copy of the position.
pub fn perft_multi_threaded(
    generator: Arc<dyn MoveGenerator>,
    position: &Position,
    seats: &[usize],
    seat: usize,
    depth: u8,
) -> ChessResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let mut root = position.clone();
    let root_moves = generator.generate_moves(&mut root, seats[seat]);
    let mut handles = Vec::with_capacity(root_moves.len());

    for mv in root_moves {
        let generator_ref = Arc::clone(&generator);
        let mut local_position = position.clone();
        let seats = seats.to_vec();
        handles.push(thread::spawn(move || {
            let mut local = PerftCounts::default();
            perft_recurse(generator_ref.as_ref(), &mut local_position, &seats, seat, mv, depth, &mut local);
            local
        }));
    }

    let mut total = PerftCounts::default();
    for handle in handles {
        let local = handle
            .join()
            .map_err(|_| ChessError::Engine("perft worker thread panicked".to_owned()))?;
        total.merge(local);
    }
    Ok(total)
}

fn perft_recurse<G: MoveGenerator + ?Sized>(
    generator: &G,
    position: &mut Position,
    seats: &[usize],
    seat: usize,
    mv: Move,
    depth: u8,
    counts: &mut PerftCounts,
) {
    let record = make_move(position, mv);

    if depth == 1 {
        counts.nodes += 1;
        counts.captures += usize::from(mv.is_capture());
        counts.castles += usize::from(mv.castle_side().is_some());
        counts.promotions += usize::from(mv.is_promotion());
        counts.king_captures += usize::from(record.eliminated.is_some());
    } else if let Some(next) = next_seat(position, seats, seat) {
        let moves = generator.generate_moves(position, seats[next]);
        for child in moves {
            perft_recurse(generator, position, seats, next, child, depth - 1, counts);
        }
    }

    unmake_move(position, &record);
}

//! Crate root module declarations for the wormhole chess engine.
//!
//! Exposes the board topology, precomputed movement patterns, the flat
//! position and its move machinery, the game controller, and the search
//! engines that play automated seats.

pub mod chess_errors;

pub mod board {
    pub mod board;
    pub mod directions;
    pub mod tile;
    pub mod tile_names;
    pub mod topology;
    pub mod wormhole_wiring;
}

pub mod patterns {
    pub mod pattern_cache;
    pub mod pattern_table;
    pub mod piece_patterns;
    pub mod ray_tracer;
}

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_config;
    pub mod game_state;
    pub mod players;
    pub mod position;
    pub mod starting_position;
    pub mod undo_state;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod move_generator;
    pub mod perft;
    pub mod pseudo_legal;
}

pub mod search {
    pub mod simulation_stats;
    pub mod threading;
    pub mod zobrist;
}

pub mod engines {
    pub mod engine_monte_carlo;
    pub mod engine_random;
    pub mod engine_trait;
}

pub mod controller {
    pub mod game_controller;
}

pub mod utils {
    pub mod board_encoding;
    pub mod render_game_state;
}

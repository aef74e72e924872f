use std::sync::Arc;

use wormhole_chess::board::board::Board;
use wormhole_chess::board::topology::{BoardSize, Variant};
use wormhole_chess::game_state::chess_rules::CastleSide;
use wormhole_chess::game_state::chess_types::{DrawReason, EliminationReason, GameStatus, PieceKind};
use wormhole_chess::game_state::game_config::GameConfig;
use wormhole_chess::game_state::game_state::GameState;
use wormhole_chess::game_state::players::{create_players, ControllerKind};

fn normal_board() -> Arc<Board> {
    Board::build(BoardSize::EIGHT, Variant::Normal, None).expect("normal board should build")
}

fn two_player_game(json: &str, config: GameConfig) -> GameState {
    let players = create_players(Variant::Normal, &[ControllerKind::Human; 2]).expect("players should seat");
    GameState::with_board(normal_board(), players, Some(json), config).expect("position should load")
}

fn play(game: &mut GameState, from: &str, to: &str) {
    let board = game.board();
    let from = board.tile_id(from).expect("origin should exist");
    let to = board.tile_id(to).expect("destination should exist");
    let mv = game
        .legal_moves()
        .iter()
        .copied()
        .find(|m| m.from == from && m.to == to)
        .expect("scripted move should be legal");
    game.make_move(mv).expect("scripted move should be accepted");
}

fn kind_on(game: &GameState, tile: &str) -> Option<PieceKind> {
    let tile = game.board().tile_id(tile).expect("tile should exist");
    game.position().piece_at(tile).map(|p| p.kind)
}

#[test]
fn bare_kings_are_drawn_by_insufficient_material() {
    let game = two_player_game(
        r#"{"white": {"King": "a1"}, "black": {"King": "h8"}}"#,
        GameConfig::default(),
    );
    assert!(game.is_finished());
    assert_eq!(game.status(), GameStatus::Draw(DrawReason::InsufficientMaterial));
    assert!(game.legal_moves().is_empty());
    assert_eq!(game.winner(), None);
}

#[test]
fn king_and_minor_piece_cannot_win() {
    let game = two_player_game(
        r#"{"white": {"King": "a1", "Knight": "c3"}, "black": {"King": "h8", "Bishop": "f6"}}"#,
        GameConfig::default(),
    );
    assert!(game.is_insufficient_material());

    let game = two_player_game(
        r#"{"white": {"King": "a1", "Pawn": "c3"}, "black": {"King": "h8"}}"#,
        GameConfig::default(),
    );
    assert!(!game.is_finished());
}

#[test]
fn checkmated_side_loses_a_two_player_game() {
    let game = two_player_game(
        r#"{"white": {"King": "h1", "Pawn": "g2 h2"}, "black": {"King": "a8", "Tower": "a1"}}"#,
        GameConfig::default(),
    );
    assert_eq!(game.status(), GameStatus::PlayerWon(1));
    assert_eq!(game.winner(), Some(1));
}

#[test]
fn delivering_mate_ends_the_game() {
    let mut game = two_player_game(
        r#"{"white": {"King": "g1", "Tower": "a1"}, "black": {"King": "h8", "Pawn": "g7 h7"}}"#,
        GameConfig::default(),
    );
    play(&mut game, "a1", "a8");
    assert_eq!(game.winner(), Some(0));
    assert!(game.legal_moves().is_empty());

    game.undo_last();
    assert_eq!(game.status(), GameStatus::Playing);
    assert_eq!(kind_on(&game, "a1"), Some(PieceKind::Tower));
}

#[test]
fn side_without_moves_and_not_in_check_is_stalemated() {
    let game = two_player_game(
        r#"{"white": {"King": "a1"}, "black": {"King": "h8", "Queen": "b3"}}"#,
        GameConfig::default(),
    );
    assert_eq!(game.status(), GameStatus::Draw(DrawReason::Stalemate));
    assert_eq!(game.winner(), None);
}

const SHUFFLE: &str = r#"{"white": {"King": "a1", "Tower": "c4"}, "black": {"King": "h8", "Tower": "f5"}}"#;

fn king_shuffle(game: &mut GameState) {
    play(game, "a1", "a2");
    play(game, "h8", "h7");
    play(game, "a2", "a1");
    play(game, "h7", "h8");
}

#[test]
fn third_occurrence_draws_by_repetition() {
    let mut game = two_player_game(SHUFFLE, GameConfig::default());
    king_shuffle(&mut game);
    assert!(!game.is_draw_by_repetition());

    play(&mut game, "a1", "a2");
    play(&mut game, "h8", "h7");
    play(&mut game, "a2", "a1");
    assert!(!game.is_finished());
    play(&mut game, "h7", "h8");

    assert!(game.is_draw_by_repetition());
    assert_eq!(game.status(), GameStatus::Draw(DrawReason::Repetition));
}

#[test]
fn rounds_without_progress_draw_at_the_configured_threshold() {
    let config = GameConfig {
        no_progress_rounds: 2,
        repetition_limit: 10,
        ..GameConfig::default()
    };
    let mut game = two_player_game(SHUFFLE, config);
    play(&mut game, "a1", "a2");
    play(&mut game, "h8", "h7");
    play(&mut game, "a2", "a1");
    assert!(!game.is_draw_by_50_moves());
    play(&mut game, "h7", "h8");

    assert_eq!(game.moves_without_progress(), 4);
    assert!(game.is_draw_by_50_moves());
    assert_eq!(game.status(), GameStatus::Draw(DrawReason::NoProgress));
}

const CASTLING: &str = r#"{"white": {"King": "e1", "Tower": "a1 h1"}, "black": {"King": "e8"}}"#;

fn castle_sides(game: &GameState) -> Vec<CastleSide> {
    game.legal_moves().iter().filter_map(|m| m.castle_side()).collect()
}

#[test]
fn castling_moves_king_and_tower_together() {
    let mut game = two_player_game(CASTLING, GameConfig::default());
    let mut sides = castle_sides(&game);
    sides.sort_by_key(|s| s.index());
    assert_eq!(sides.len(), 2);

    let mv = game
        .legal_moves()
        .iter()
        .copied()
        .find(|m| m.castle_side() == Some(CastleSide::King))
        .expect("king side castling should be offered");
    game.make_move(mv).expect("castling should be accepted");
    assert_eq!(kind_on(&game, "g1"), Some(PieceKind::King));
    assert_eq!(kind_on(&game, "f1"), Some(PieceKind::Tower));
    assert_eq!(kind_on(&game, "e1"), None);
    assert_eq!(kind_on(&game, "h1"), None);

    game.undo_last();
    assert_eq!(kind_on(&game, "e1"), Some(PieceKind::King));
    assert_eq!(kind_on(&game, "h1"), Some(PieceKind::Tower));
}

#[test]
fn castling_through_an_attacked_tile_is_rejected() {
    let game = two_player_game(
        r#"{"white": {"King": "e1", "Tower": "a1 h1"}, "black": {"King": "e8", "Tower": "f8"}}"#,
        GameConfig::default(),
    );
    assert_eq!(castle_sides(&game), vec![CastleSide::Queen]);
}

#[test]
fn castling_out_of_check_is_rejected() {
    let game = two_player_game(
        r#"{"white": {"King": "e1", "Tower": "a1 h1"}, "black": {"King": "a8", "Tower": "e7"}}"#,
        GameConfig::default(),
    );
    assert!(castle_sides(&game).is_empty());
}

#[test]
fn moved_tower_loses_its_castling_right() {
    let mut game = two_player_game(CASTLING, GameConfig::default());
    play(&mut game, "h1", "h2");
    play(&mut game, "e8", "d8");
    play(&mut game, "h2", "h1");
    play(&mut game, "d8", "e8");
    assert_eq!(castle_sides(&game), vec![CastleSide::Queen]);
}

#[test]
fn occupied_path_blocks_castling() {
    let game = two_player_game(
        r#"{"white": {"King": "e1", "Tower": "a1 h1", "Knight": "b1"}, "black": {"King": "e8"}}"#,
        GameConfig::default(),
    );
    assert_eq!(castle_sides(&game), vec![CastleSide::King]);
}

#[test]
fn last_seat_standing_wins_a_four_player_game() {
    let players = create_players(Variant::Wormhole, &[ControllerKind::Human; 4]).expect("players should seat");
    let mut game = GameState::new_game(players, BoardSize::EIGHT, Variant::Wormhole, None, GameConfig::default())
        .expect("four-player game should start");

    game.eliminate(0, EliminationReason::Timeout);
    assert_eq!(game.current_seat(), 1);
    assert!(!game.is_finished());

    game.eliminate(2, EliminationReason::Timeout);
    assert!(!game.is_finished());
    game.eliminate(3, EliminationReason::Timeout);
    assert_eq!(game.status(), GameStatus::PlayerWon(1));
}

//! Plain-text board renderer.
//!
//! Each sheet is drawn as a grid, highest row first. A piece shows as its
//! letter followed by the owning team number (`Q2`); loop duplicates, which
//! have no grid cell of their own, are listed underneath their sheet.

use crate::board::directions::Side;
use crate::board::topology::Variant;
use crate::game_state::chess_types::{GameStatus, PieceRecord};
use crate::game_state::game_state::GameState;
use crate::game_state::position::Position;

fn cell(piece: Option<&PieceRecord>) -> String {
    match piece {
        Some(p) => format!("{}{}", p.kind.symbol(), p.owner),
        None => "..".to_owned(),
    }
}

fn column_header(cols: u8) -> String {
    let mut out = String::from("   ");
    for c in 0..cols {
        out.push(char::from(b'a' + c));
        out.push_str("  ");
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn render_position(position: &Position) -> String {
    let board = position.board();
    let topology = &board.topology;
    let size = board.size();
    let sides: &[Side] = topology.sides();
    let mut out = String::new();

    for &side in sides {
        if board.variant() == Variant::Wormhole {
            out.push_str(match side {
                Side::Top => "top sheet\n",
                Side::Bottom => "bottom sheet\n",
            });
        }
        out.push_str(&column_header(size.cols));
        out.push('\n');

        for row in (1..=size.rows).rev() {
            out.push_str(&format!("{row:>2} "));
            let cells: Vec<String> = (0..size.cols)
                .map(|col| {
                    topology
                        .cell_name(col, row, side)
                        .and_then(|name| board.tile_id(&name))
                        .map_or_else(|| "  ".to_owned(), |tile| cell(position.piece_at(tile)))
                })
                .collect();
            out.push_str(&cells.join(" "));
            out.push('\n');
        }

        let loops: Vec<String> = topology
            .tiles()
            .iter()
            .filter(|t| t.loop_tile && t.side == side)
            .filter_map(|t| position.piece_at(t.id).map(|p| format!("{}={}", t.name, cell(Some(p)))))
            .collect();
        if !loops.is_empty() {
            out.push_str("   loops: ");
            out.push_str(&loops.join(" "));
            out.push('\n');
        }
    }
    out
}

/// Board plus a status line naming the player to move or the result.
pub fn render_game_state(game: &GameState) -> String {
    let mut out = render_position(game.position());
    let line = match game.status() {
        GameStatus::Playing => {
            let player = game.current_player();
            format!(
                "move {}: seat {} ({}) to play, {} legal moves",
                game.move_count() + 1,
                player.id,
                player.color,
                game.legal_moves().len()
            )
        }
        GameStatus::PlayerWon(seat) => {
            format!("seat {seat} ({}) wins after {} moves", game.players()[seat].color, game.move_count())
        }
        GameStatus::Draw(reason) => format!("draw ({reason:?}) after {} moves", game.move_count()),
    };
    out.push_str(&line);
    out
}

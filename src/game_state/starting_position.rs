//! Starting-position documents.
//!
//! A document maps team color to piece name to a whitespace separated tile
//! list, e.g. `{"white": {"Pawn": "a2T b2T"}}`. Wormhole documents may use the
//! compact `a2T` / `d41B` spellings. Colors that are not seated are ignored.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::board::board::Board;
use crate::board::tile::TileId;
use crate::board::tile_names::canonical_tile_name;
use crate::board::topology::Variant;
use crate::chess_errors::{ConfigResult, ConfigurationError};
use crate::game_state::chess_rules::CastleSide;
use crate::game_state::chess_types::{PieceKind, TeamColor};
use crate::game_state::game_config::GameConfig;
use crate::game_state::position::{Placement, Position};

pub type PositionDocument = BTreeMap<String, BTreeMap<String, String>>;

const WORMHOLE_8X8: &str = include_str!("../../positions/4_8x8_wormhole.json");
const WORMHOLE_6X6: &str = include_str!("../../positions/4_6x6_wormhole.json");
const NORMAL_8X8: &str = include_str!("../../positions/2_8x8_normal.json");
const NORMAL_6X6: &str = include_str!("../../positions/2_6x6_normal.json");

pub fn parse_document(json: &str) -> ConfigResult<PositionDocument> {
    Ok(serde_json::from_str(json)?)
}

/// Built-in document for a board. Two-player wormhole games use the
/// four-player layout with the unseated colors left out.
pub fn default_document(board: &Board) -> ConfigResult<&'static str> {
    let size = board.size();
    match (board.variant(), size.rows) {
        (Variant::Wormhole, 8) => Ok(WORMHOLE_8X8),
        (Variant::Wormhole, 6) => Ok(WORMHOLE_6X6),
        (Variant::Normal, 8) => Ok(NORMAL_8X8),
        (Variant::Normal, 6) => Ok(NORMAL_6X6),
        _ => Err(ConfigurationError::UnsupportedBoard {
            rows: size.rows,
            cols: size.cols,
            variant: board.variant().to_string(),
        }),
    }
}

pub fn default_position(board: &Arc<Board>, playing: &[usize], config: &GameConfig) -> ConfigResult<Position> {
    load_position(board, default_document(board)?, playing, config)
}

pub fn load_position_file(
    board: &Arc<Board>,
    path: &Path,
    playing: &[usize],
    config: &GameConfig,
) -> ConfigResult<Position> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigurationError::PositionFile {
        path: path.display().to_string(),
        source,
    })?;
    load_position(board, &json, playing, config)
}

pub fn load_position(board: &Arc<Board>, json: &str, playing: &[usize], config: &GameConfig) -> ConfigResult<Position> {
    let document = parse_document(json)?;
    let placements = placements_from_document(board, &document, playing)?;

    for &team in playing {
        let found = placements
            .iter()
            .filter(|p| p.team == team && p.kind == PieceKind::King)
            .count();
        if found != 1 {
            return Err(ConfigurationError::KingCount { team, found });
        }
    }

    debug!(pieces = placements.len(), teams = playing.len(), "loaded starting position");
    Position::new(Arc::clone(board), &placements, playing, config.pieces_per_player)
}

fn placements_from_document(board: &Board, document: &PositionDocument, playing: &[usize]) -> ConfigResult<Vec<Placement>> {
    let mut placements = Vec::new();
    for (color, pieces) in document {
        let team = color.parse::<TeamColor>()?.index();
        if !playing.contains(&team) {
            continue;
        }
        for (piece_name, tiles) in pieces {
            let kind: PieceKind = piece_name.parse()?;
            for raw in tiles.split_whitespace() {
                let name = canonical_tile_name(raw, board.variant())?;
                let tile = board
                    .tile_id(&name)
                    .ok_or_else(|| ConfigurationError::UnknownTile(name.clone()))?;
                placements.push(Placement {
                    team,
                    kind,
                    tile,
                    has_moved: !on_home_tile(board, team, kind, tile),
                });
            }
        }
    }
    Ok(placements)
}

/// Kings and towers away from their castling tiles count as moved; every
/// other piece starts fresh.
fn on_home_tile(board: &Board, team: usize, kind: PieceKind, tile: TileId) -> bool {
    match kind {
        PieceKind::King => CastleSide::BOTH
            .iter()
            .filter_map(|side| board.castling(team, *side))
            .any(|rule| rule.king_from == tile),
        PieceKind::Tower => CastleSide::BOTH
            .iter()
            .filter_map(|side| board.castling(team, *side))
            .any(|rule| rule.rook_from == tile),
        _ => true,
    }
}

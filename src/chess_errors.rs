//! Errors used throughout the engine.
//!
//! Setup problems surface as `ConfigurationError`, rejected moves as
//! `IllegalMoveError`. Both fold into `ChessError` so callers can propagate a
//! single type with `?`. Engine bugs are not represented here: those are
//! debug assertions at the point where the invariant breaks.

use thiserror::Error;

/// Failure while building a board, loading a position, or reading a cache.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("unsupported board {rows}x{cols} for the {variant} variant")]
    UnsupportedBoard {
        rows: u8,
        cols: u8,
        variant: String,
    },

    #[error("unsupported player count {count} for the {variant} variant")]
    UnsupportedPlayerCount { count: usize, variant: String },

    #[error("malformed tile name `{0}`")]
    MalformedTileName(String),

    #[error("unknown tile `{0}`")]
    UnknownTile(String),

    #[error("unknown piece name `{0}`")]
    UnknownPiece(String),

    #[error("unknown team color `{0}`")]
    UnknownColor(String),

    #[error("tile `{0}` is listed twice in the starting position")]
    DuplicateTile(String),

    #[error("team {team} has more than {limit} pieces")]
    TooManyPieces { team: usize, limit: usize },

    #[error("team {team} must have exactly one king, found {found}")]
    KingCount { team: usize, found: usize },

    #[error("team {0} has pieces but is not a participant")]
    TeamNotPlaying(usize),

    #[error("broken wiring table entry: {0}")]
    Wiring(String),

    #[error("cannot read position file {path}: {source}")]
    PositionFile {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed position document: {0}")]
    PositionDocument(#[from] serde_json::Error),

    #[error("pattern cache io: {0}")]
    CacheIo(#[from] std::io::Error),

    #[error("pattern cache encoding: {0}")]
    CacheEncoding(#[from] bincode::Error),
}

/// A move was rejected before any state was touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IllegalMoveError {
    #[error("{from}-{to} is not a legal move for player {player}")]
    NotLegal {
        player: usize,
        from: String,
        to: String,
    },

    #[error("it is not a human player's turn")]
    NotHumanTurn,

    #[error("the game is already finished")]
    GameFinished,
}

#[derive(Error, Debug)]
pub enum ChessError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    IllegalMove(#[from] IllegalMoveError),

    #[error("engine failure: {0}")]
    Engine(String),
}

pub type ConfigResult<T> = Result<T, ConfigurationError>;
pub type ChessResult<T> = Result<T, ChessError>;

//! Error types for the mnk-lab crate

use thiserror::Error;

/// Main error type for the mnk-lab crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("board {rows}x{cols} is too small for win length {win_length}")]
    BoardTooSmall {
        rows: usize,
        cols: usize,
        win_length: usize,
    },

    #[error("win length for player {player} must be at least 1, got {win_length}")]
    InvalidWinLength { player: usize, win_length: i64 },

    #[error("opening moves for player {player} must be at least 1")]
    InvalidOpeningMoves { player: usize },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("unknown game '{name}' (expected 'mnk_game')")]
    UnknownGame { name: String },

    #[error("unknown line direction '{key}'. Expected one of: h, v, d1, d2")]
    UnknownDirection { key: String },

    #[error("unknown policy '{name}'. Expected one of: {expected}")]
    UnknownPolicy { name: String, expected: String },

    #[error("game already over")]
    GameOver,

    #[error("action {action} is out of range for a board with {cells} cells")]
    InvalidAction { action: usize, cells: usize },

    #[error("invalid action: cell {action} is already occupied")]
    OccupiedCell { action: usize },

    #[error("invalid predicate '{input}': {reason}")]
    ParsePredicate { input: String, reason: String },

    #[error("record has no field named '{field}'")]
    UnknownField { field: String },

    #[error("field '{field}' cannot be compared with {expected}")]
    PredicateType { field: String, expected: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

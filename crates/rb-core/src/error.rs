//! # AppError
//!
//! Centralized error handling for the Rusty-Board core.
//! Reducer no-ops are deliberately absent: an action aimed at a stale block
//! is normal under concurrent editing and is not an error.

use thiserror::Error;

/// The primary error type for all rb-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Board key that cannot double as a log file name
    #[error("invalid board id: {0:?}")]
    InvalidBoardId(String),

    /// Storage unreachable or unwritable (disk error, permissions)
    #[error("i/o failure on board {board_id}: {source}")]
    Io {
        board_id: String,
        #[source]
        source: std::io::Error,
    },

    /// A complete record in the log could not be parsed back into an Action.
    /// `position` is the 1-based line number.
    #[error("corrupt log for board {board_id} at record {position}: {source}")]
    CorruptLog {
        board_id: String,
        position: usize,
        #[source]
        source: serde_json::Error,
    },

    /// An action that would not read back as written (NaN, unknown type)
    #[error("refusing to append to board {board_id}: {reason}")]
    InvalidAction {
        board_id: String,
        reason: &'static str,
    },

    /// An action could not be serialized for appending
    #[error("failed to encode action for board {board_id}: {source}")]
    Encode {
        board_id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl AppError {
    /// Board the failure belongs to, when there is one.
    pub fn board_id(&self) -> &str {
        match self {
            AppError::InvalidBoardId(id) => id,
            AppError::Io { board_id, .. }
            | AppError::CorruptLog { board_id, .. }
            | AppError::InvalidAction { board_id, .. }
            | AppError::Encode { board_id, .. } => board_id,
        }
    }
}

/// A specialized Result type for Rusty-Board logic.
pub type Result<T> = std::result::Result<T, AppError>;

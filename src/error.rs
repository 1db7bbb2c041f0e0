//! Error types for session and selector logic.
//!
//! Illegal move attempts are normal interaction and are absorbed into
//! session state rather than surfaced; the variants here exist for the
//! boundaries where a real failure has to travel (rules adapter, selector,
//! history persistence).

use crate::types::{Side, SquareId};

/// Errors that can occur while driving a game session.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The selector was invoked in a position with no legal moves.
    ///
    /// Turn-gating in the session makes this unreachable; seeing it means a
    /// caller invoked the selector on a terminal position.
    #[error("no legal moves available for {side}")]
    NoLegalMoves { side: Side },

    /// The rules engine rejected a move request.
    #[error("illegal move: {from} -> {to}")]
    IllegalMove { from: SquareId, to: SquareId },

    /// A position could not be constructed from the given description.
    #[error("invalid position: {message}")]
    InvalidPosition { message: String },

    /// Writing or reading the persisted match history failed.
    ///
    /// Always recoverable: the store falls back to in-memory records and
    /// gameplay continues.
    #[error("history persistence failed: {message}")]
    Persistence { message: String },
}

/// Result type alias for game operations.
pub type GameResult<T> = Result<T, GameError>;

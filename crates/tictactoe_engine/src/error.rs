//! Engine error types.

use crate::types::Mark;

/// Why a move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum InvalidMoveReason {
    /// Index outside 0-8.
    #[display("index {} is out of range (must be 0-8)", _0)]
    OutOfRange(usize),

    /// Cell already holds a mark.
    #[display("cell {} is already occupied", _0)]
    Occupied(usize),

    /// The game already ended.
    #[display("game is already over")]
    GameOver,

    /// The mark does not match whose turn it is.
    #[display("it is not {}'s turn", _0)]
    WrongTurn(Mark),
}

/// Contract violations raised by the engine.
///
/// Both are recoverable: a host rejects the offending input and keeps its
/// state unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EngineError {
    /// A move could not be applied.
    #[display("Invalid move: {}", _0)]
    InvalidMove(#[error(not(source))] InvalidMoveReason),

    /// The opponent policy was asked to move on a finished or full board.
    #[display("Opponent policy invoked on a finished or full board")]
    PreconditionViolated,
}

//! Game rules for tic-tac-toe.
//!
//! Pure functions over [`Board`] values. Nothing here holds state; the
//! [`crate::Game`] wrapper layers turn discipline on top.

mod draw;
mod win;

pub use draw::is_full;
pub use win::{LINES, winner};

use crate::error::{EngineError, InvalidMoveReason};
use crate::types::{Board, CELL_COUNT, GameStatus, Mark};
use tracing::instrument;

/// Derives the game status from a board.
///
/// Lines are scanned in fixed order and the first complete one decides.
/// With no line, a full board is a draw.
#[instrument(level = "trace", skip(board))]
pub fn evaluate(board: &Board) -> GameStatus {
    if let Some(mark) = winner(board) {
        GameStatus::won_by(mark)
    } else if is_full(board) {
        GameStatus::Draw
    } else {
        GameStatus::InProgress
    }
}

/// Places `mark` at `index`, returning the new board.
///
/// # Errors
///
/// Returns [`EngineError::InvalidMove`] if `index` is out of range, the cell
/// is occupied, or the board is already terminal.
#[instrument(level = "debug", skip(board))]
pub fn apply_move(board: &Board, index: usize, mark: Mark) -> Result<Board, EngineError> {
    if index >= CELL_COUNT {
        return Err(EngineError::InvalidMove(InvalidMoveReason::OutOfRange(index)));
    }
    if evaluate(board).is_terminal() {
        return Err(EngineError::InvalidMove(InvalidMoveReason::GameOver));
    }
    if !board.is_empty(index) {
        return Err(EngineError::InvalidMove(InvalidMoveReason::Occupied(index)));
    }
    Ok(board.with_mark(index, mark))
}

//! Single-session game state machine.
//!
//! `Game` owns the one active `(Board, Turn, GameStatus)` tuple. Every
//! successful move re-derives the status from the board and flips the turn
//! while play continues; every change is observable as a [`Snapshot`].

use crate::error::{EngineError, InvalidMoveReason};
use crate::policy::OpponentPolicy;
use crate::rules::{apply_move, evaluate};
use crate::types::{Board, GameStatus, Mark, Turn};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Immutable view of a game at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Board contents.
    pub board: Board,
    /// Side to move. Meaningless once `status` is terminal.
    pub turn: Turn,
    /// Status derived from `board`.
    pub status: GameStatus,
    /// Marks placed so far.
    pub move_count: usize,
}

impl Snapshot {
    /// Checks if the human may place a mark now.
    pub fn accepts_player_input(&self) -> bool {
        self.status == GameStatus::InProgress && self.turn == Turn::PlayerTurn
    }

    /// Outcome, once the game has ended.
    pub fn outcome(&self) -> Option<Outcome> {
        Outcome::from_status(self.status)
    }
}

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The human won.
    PlayerWin,
    /// The scripted opponent won.
    OpponentWin,
    /// Board filled with no line.
    Draw,
}

impl Outcome {
    /// Maps a terminal status to an outcome; `None` while in progress.
    pub fn from_status(status: GameStatus) -> Option<Self> {
        match status {
            GameStatus::InProgress => None,
            GameStatus::PlayerWins => Some(Outcome::PlayerWin),
            GameStatus::OpponentWins => Some(Outcome::OpponentWin),
            GameStatus::Draw => Some(Outcome::Draw),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::PlayerWin => write!(f, "Player wins"),
            Outcome::OpponentWin => write!(f, "Opponent wins"),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Tic-tac-toe game against the scripted opponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    turn: Turn,
    status: GameStatus,
}

impl Game {
    /// Creates a new game: empty board, player to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Turn::PlayerTurn,
            status: GameStatus::InProgress,
        }
    }

    /// Discards the current board and starts over.
    #[instrument(skip(self), fields(previous = ?self.status))]
    pub fn reset(&mut self) -> Snapshot {
        *self = Self::new();
        info!("Game reset");
        self.snapshot()
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns whose turn it is.
    pub fn turn(&self) -> Turn {
        self.turn
    }

    /// Returns the cached status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Marks placed so far.
    pub fn move_count(&self) -> usize {
        self.board.occupied_count()
    }

    /// Captures the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            turn: self.turn,
            status: self.status,
            move_count: self.move_count(),
        }
    }

    /// Places `mark` at `index` if it is that mark's turn.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidMove`] when the game is over, the mark is
    /// out of turn, the index is out of range, or the cell is taken. State is
    /// unchanged on error.
    #[instrument(skip(self), fields(turn = ?self.turn))]
    pub fn play(&mut self, index: usize, mark: Mark) -> Result<Snapshot, EngineError> {
        if self.status.is_terminal() {
            return Err(EngineError::InvalidMove(InvalidMoveReason::GameOver));
        }
        if mark != self.turn.mark() {
            return Err(EngineError::InvalidMove(InvalidMoveReason::WrongTurn(mark)));
        }

        self.board = apply_move(&self.board, index, mark)?;
        self.status = evaluate(&self.board);
        if self.status == GameStatus::InProgress {
            self.turn = self.turn.next();
        }

        debug!(index, status = ?self.status, "Move applied");
        Ok(self.snapshot())
    }

    /// Asks `policy` for the opponent's move and applies it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidMove`] if it is not the opponent's turn,
    /// or [`EngineError::PreconditionViolated`] if the game is over.
    pub fn play_opponent<R: RngCore>(
        &mut self,
        policy: &mut OpponentPolicy<R>,
    ) -> Result<Snapshot, EngineError> {
        if self.status.is_terminal() {
            return Err(EngineError::PreconditionViolated);
        }
        if self.turn != Turn::OpponentTurn {
            return Err(EngineError::InvalidMove(InvalidMoveReason::WrongTurn(
                Mark::Opponent,
            )));
        }
        let index = policy.choose_move(&self.board)?;
        self.play(index, Mark::Opponent)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

//! Tic-tac-toe engine: board model, rules and the scripted opponent.
//!
//! Everything in this crate is synchronous and free of I/O. A host drives a
//! [`Game`], applying the human's move, and when play continues asks an
//! [`OpponentPolicy`] for the reply. Display delays, persistence and sharing
//! belong to the host.
//!
//! # Example
//!
//! ```
//! use tictactoe_engine::{Game, GameStatus, Mark, OpponentPolicy, Turn};
//!
//! let mut game = Game::new();
//! let mut policy = OpponentPolicy::seeded(42);
//!
//! game.play(0, Mark::Player)?;
//! assert_eq!(game.turn(), Turn::OpponentTurn);
//!
//! let snapshot = game.play_opponent(&mut policy)?;
//! assert_eq!(snapshot.status, GameStatus::InProgress);
//! # Ok::<(), tictactoe_engine::EngineError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod game;
mod policy;
mod position;
mod rules;
mod types;

pub use error::{EngineError, InvalidMoveReason};
pub use game::{Game, Outcome, Snapshot};
pub use policy::{Decision, OpponentPolicy, Rule};
pub use position::Position;
pub use rules::{LINES, apply_move, evaluate, is_full, winner};
pub use types::{Board, CELL_COUNT, Cell, GameStatus, Mark, Turn};

//! Scripted opponent: greedy one-ply lookahead.
//!
//! The policy tries, in order: win now, block the player, take the center,
//! take a random free corner, take any random free cell. It looks exactly one
//! move ahead and never detects forks, so a careful player can beat it.

use crate::error::EngineError;
use crate::position::Position;
use crate::rules::evaluate;
use crate::types::{Board, GameStatus, Mark};
use rand::SeedableRng;
use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::{Rng, RngCore};
use tracing::{debug, instrument};

/// Which step of the priority list produced a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Rule {
    /// Completes an opponent line.
    WinNow,
    /// Fills the cell that would complete a player line.
    Block,
    /// Takes the center.
    Center,
    /// Random free corner.
    Corner,
    /// Random free cell.
    Any,
}

/// A chosen move and the rule that chose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Board index (0-8).
    pub index: usize,
    /// Rule that fired.
    pub rule: Rule,
}

/// Opponent decision policy with an injectable random source.
#[derive(Debug, Clone)]
pub struct OpponentPolicy<R = StdRng> {
    rng: R,
}

impl OpponentPolicy<StdRng> {
    /// Policy seeded from the thread RNG.
    pub fn new() -> Self {
        let seed: u64 = rand::rng().random();
        debug!(seed, "Seeding opponent policy");
        Self::seeded(seed)
    }

    /// Deterministic policy for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for OpponentPolicy<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> OpponentPolicy<R> {
    /// Policy drawing tie-breaks from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Picks the opponent's next cell.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PreconditionViolated`] when the board is terminal
    /// or has no empty cell.
    pub fn choose_move(&mut self, board: &Board) -> Result<usize, EngineError> {
        self.decide(board).map(|decision| decision.index)
    }

    /// Like [`choose_move`](Self::choose_move), also reporting the rule.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PreconditionViolated`] when the board is terminal
    /// or has no empty cell.
    #[instrument(level = "debug", skip(self, board))]
    pub fn decide(&mut self, board: &Board) -> Result<Decision, EngineError> {
        let empty = board.empty_cells();
        if empty.is_empty() || evaluate(board) != GameStatus::InProgress {
            return Err(EngineError::PreconditionViolated);
        }

        let decision = if let Some(index) = completing_cell(board, &empty, Mark::Opponent) {
            Decision { index, rule: Rule::WinNow }
        } else if let Some(index) = completing_cell(board, &empty, Mark::Player) {
            Decision { index, rule: Rule::Block }
        } else if board.is_empty(Position::Center.to_index()) {
            Decision {
                index: Position::Center.to_index(),
                rule: Rule::Center,
            }
        } else {
            let corners: Vec<usize> = Position::CORNERS
                .iter()
                .map(|p| p.to_index())
                .filter(|&i| board.is_empty(i))
                .collect();
            match corners.choose(&mut self.rng) {
                Some(&index) => Decision { index, rule: Rule::Corner },
                None => {
                    let index = *empty
                        .choose(&mut self.rng)
                        .ok_or(EngineError::PreconditionViolated)?;
                    Decision { index, rule: Rule::Any }
                }
            }
        };

        debug!(index = decision.index, rule = %decision.rule, "Opponent decided");
        Ok(decision)
    }
}

/// Lowest empty index where `mark` would complete a line.
fn completing_cell(board: &Board, empty: &[usize], mark: Mark) -> Option<usize> {
    empty
        .iter()
        .copied()
        .find(|&i| evaluate(&board.with_mark(i, mark)) == GameStatus::won_by(mark))
}

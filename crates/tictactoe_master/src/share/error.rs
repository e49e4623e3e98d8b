//! Share error types.

use derive_more::{Display, Error};

/// Share failure with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Share error: {} at {}:{}", message, file, line)]
pub struct ShareError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ShareError {
    /// Creates a new share error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for ShareError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}

//! Full-board check.

use crate::types::Board;

/// True when no empty cell remains. Combined with no winner, that is a draw.
pub fn is_full(board: &Board) -> bool {
    board.cells().iter().all(|c| !c.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mark;

    #[test]
    fn test_fresh_board_has_room() {
        assert!(!is_full(&Board::new()));
    }

    #[test]
    fn test_one_mark_leaves_room() {
        let board = Board::new().with_mark(4, Mark::Player);
        assert!(!is_full(&board));
    }

    #[test]
    fn test_nine_marks_fill_board() {
        let board = (0..9).fold(Board::new(), |b, i| b.with_mark(i, Mark::Opponent));
        assert!(is_full(&board));
    }
}

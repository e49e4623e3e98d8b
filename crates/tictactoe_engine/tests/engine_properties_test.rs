//! Board and opponent properties checked over every reachable position.

use std::collections::HashSet;
use tictactoe_engine::{
    Board, CELL_COUNT, Cell, EngineError, Game, GameStatus, InvalidMoveReason, LINES, Mark,
    OpponentPolicy, Turn, apply_move, evaluate, winner,
};

/// Every board reachable from empty with X moving first and play stopping at
/// a terminal status, paired with the side to move.
fn reachable_boards() -> Vec<(Board, Mark)> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut stack = vec![(Board::new(), Mark::Player)];
    while let Some((board, to_move)) = stack.pop() {
        if !seen.insert(board) {
            continue;
        }
        out.push((board, to_move));
        if evaluate(&board).is_terminal() {
            continue;
        }
        for index in board.empty_cells() {
            let next = apply_move(&board, index, to_move).expect("empty cell on live board");
            stack.push((next, to_move.other()));
        }
    }
    out
}

fn parse(layout: &str) -> Board {
    let mut cells = [Cell::Empty; CELL_COUNT];
    for (i, ch) in layout.chars().filter(|c| !c.is_whitespace()).enumerate() {
        cells[i] = match ch {
            'X' => Cell::Marked(Mark::Player),
            'O' => Cell::Marked(Mark::Opponent),
            _ => Cell::Empty,
        };
    }
    Board::from_cells(cells)
}

fn complete_lines(board: &Board) -> Vec<Mark> {
    LINES
        .iter()
        .filter_map(|&[a, b, c]| {
            let cells = board.cells();
            match cells[a] {
                Cell::Marked(m) if cells[b] == cells[a] && cells[c] == cells[a] => Some(m),
                _ => None,
            }
        })
        .collect()
}

#[test]
fn test_reachable_positions_count() {
    // Well-known count of legal positions reachable in play.
    assert_eq!(reachable_boards().len(), 5478);
}

#[test]
fn test_single_line_reports_its_mark() {
    for (board, _) in reachable_boards() {
        let lines = complete_lines(&board);
        if lines.len() == 1 {
            assert_eq!(evaluate(&board), GameStatus::won_by(lines[0]));
        }
    }
}

#[test]
fn test_full_board_without_line_is_draw() {
    for (board, _) in reachable_boards() {
        if winner(&board).is_none() && board.empty_cells().is_empty() {
            assert_eq!(evaluate(&board), GameStatus::Draw);
        }
    }
}

#[test]
fn test_open_board_without_line_in_progress() {
    for (board, _) in reachable_boards() {
        if winner(&board).is_none() && !board.empty_cells().is_empty() {
            assert_eq!(evaluate(&board), GameStatus::InProgress);
        }
    }
}

#[test]
fn test_apply_move_changes_one_cell_or_rejects() {
    for (board, to_move) in reachable_boards() {
        let live = !evaluate(&board).is_terminal();
        for index in 0..CELL_COUNT {
            match apply_move(&board, index, to_move) {
                Ok(after) => {
                    assert!(live && board.is_empty(index));
                    for i in 0..CELL_COUNT {
                        if i == index {
                            assert_eq!(after.get(i), Some(Cell::Marked(to_move)));
                        } else {
                            assert_eq!(after.get(i), board.get(i));
                        }
                    }
                }
                Err(EngineError::InvalidMove(reason)) => {
                    assert!(!live || !board.is_empty(index), "{reason}");
                }
                Err(other) => panic!("unexpected error {other}"),
            }
        }
    }
}

#[test]
fn test_opponent_takes_available_win() {
    for (board, to_move) in reachable_boards() {
        if to_move != Mark::Opponent || evaluate(&board).is_terminal() {
            continue;
        }
        let can_win = board.empty_cells().into_iter().any(|i| {
            evaluate(&apply_move(&board, i, Mark::Opponent).expect("empty"))
                == GameStatus::OpponentWins
        });
        if can_win {
            let index = OpponentPolicy::seeded(5).choose_move(&board).expect("live board");
            let after = apply_move(&board, index, Mark::Opponent).expect("empty");
            assert_eq!(evaluate(&after), GameStatus::OpponentWins, "{}", board.display());
        }
    }
}

#[test]
fn test_opponent_blocks_when_it_cannot_win() {
    for (board, to_move) in reachable_boards() {
        if to_move != Mark::Opponent || evaluate(&board).is_terminal() {
            continue;
        }
        let empty = board.empty_cells();
        let completes = |mark: Mark| {
            empty
                .iter()
                .copied()
                .filter(|&i| {
                    evaluate(&apply_move(&board, i, mark).expect("empty")) == GameStatus::won_by(mark)
                })
                .collect::<Vec<_>>()
        };
        let threats = completes(Mark::Player);
        if completes(Mark::Opponent).is_empty() && !threats.is_empty() {
            let index = OpponentPolicy::seeded(11).choose_move(&board).expect("live board");
            assert!(threats.contains(&index), "{}", board.display());
        }
    }
}

#[test]
fn test_policy_always_picks_an_empty_cell() {
    let mut policy = OpponentPolicy::seeded(2024);
    for (board, to_move) in reachable_boards() {
        if to_move == Mark::Opponent && !evaluate(&board).is_terminal() {
            let index = policy.choose_move(&board).expect("live board");
            assert!(board.is_empty(index));
        }
    }
}

#[test]
fn test_empty_board_opponent_takes_center() {
    assert_eq!(OpponentPolicy::seeded(0).choose_move(&Board::new()), Ok(4));
}

#[test]
fn test_corner_scenario() {
    let board = parse("O.. .X. ..X");
    for seed in 0..64 {
        let index = OpponentPolicy::seeded(seed).choose_move(&board).expect("live board");
        assert!([2, 6].contains(&index));
    }
}

#[test]
fn test_draw_scenario() {
    assert_eq!(evaluate(&parse("XOX XOO OXX")), GameStatus::Draw);
}

#[test]
fn test_player_diagonal_scenario() {
    let mut game = Game::new();
    game.play(0, Mark::Player).expect("valid");
    game.play(1, Mark::Opponent).expect("valid");
    game.play(4, Mark::Player).expect("valid");
    game.play(2, Mark::Opponent).expect("valid");
    assert_eq!(game.status(), GameStatus::InProgress);
    let snap = game.play(8, Mark::Player).expect("valid");
    assert_eq!(snap.status, GameStatus::PlayerWins);

    assert_eq!(
        game.play(5, Mark::Opponent),
        Err(EngineError::InvalidMove(InvalidMoveReason::GameOver))
    );
}

#[test]
fn test_full_game_against_policy_terminates() {
    for seed in 0..50 {
        let mut game = Game::new();
        let mut policy = OpponentPolicy::seeded(seed);
        while !game.status().is_terminal() {
            match game.turn() {
                Turn::PlayerTurn => {
                    let index = game.board().empty_cells()[0];
                    game.play(index, Mark::Player).expect("empty cell");
                }
                Turn::OpponentTurn => {
                    game.play_opponent(&mut policy).expect("live game");
                }
            }
        }
        assert!(game.move_count() <= CELL_COUNT);
    }
}

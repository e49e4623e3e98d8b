//! Keyboard mapping.

use crossterm::event::KeyCode;
use tictactoe_engine::Position;

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move the cursor to this position.
    Cursor(Position),
    /// Place a mark at the cursor.
    PlaceAtCursor,
    /// Place a mark at this position directly.
    PlaceAt(Position),
    /// Start a new game.
    NewGame,
    /// Share the finished game.
    Share,
    /// Leave the app.
    Quit,
}

/// Maps a key to a command given the current cursor.
pub fn command_for(key: KeyCode, cursor: Position) -> Option<Command> {
    match key {
        KeyCode::Up => Some(Command::Cursor(cursor.up())),
        KeyCode::Down => Some(Command::Cursor(cursor.down())),
        KeyCode::Left => Some(Command::Cursor(cursor.left())),
        KeyCode::Right => Some(Command::Cursor(cursor.right())),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Command::PlaceAtCursor),
        KeyCode::Char(c @ '1'..='9') => c
            .to_digit(10)
            .and_then(|d| Position::from_index(d as usize - 1))
            .map(Command::PlaceAt),
        KeyCode::Char('n' | 'N' | 'r' | 'R') => Some(Command::NewGame),
        KeyCode::Char('s' | 'S') => Some(Command::Share),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

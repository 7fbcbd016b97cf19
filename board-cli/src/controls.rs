use std::time::Duration;

use board_lib::{BoardController, BoardError, Status};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::error;

const VOLUME_STEP: i64 = 5;

/// Interactive selection and the last reported outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub row: usize,
    pub col: usize,
    pub status: Status,
    pub error: Option<String>,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            row: 0,
            col: 0,
            status: Status::Ready,
            error: None,
        }
    }
}

/// Wait up to `timeout` for a key and apply it. Returns false to quit.
pub fn handle_key_event(board: &mut BoardController, state: &mut BoardState, timeout: Duration) -> bool {
    if event::poll(timeout).unwrap_or(false) {
        if let Ok(Event::Key(key)) = event::read() {
            if key.kind != KeyEventKind::Press {
                return true;
            }
            return apply_key(board, state, key.code);
        }
    }

    true
}

pub fn apply_key(board: &mut BoardController, state: &mut BoardState, code: KeyCode) -> bool {
    let rows = board.grid().rows();
    let cols = board.grid().cols();
    state.row = state.row.min(rows - 1);
    state.col = state.col.min(cols - 1);

    let result: Result<Status, BoardError> = match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            board.stop();
            return false;
        }
        KeyCode::Up => {
            state.row = state.row.saturating_sub(1);
            return true;
        }
        KeyCode::Down => {
            state.row = (state.row + 1).min(rows - 1);
            return true;
        }
        KeyCode::Left => {
            state.col = state.col.saturating_sub(1);
            return true;
        }
        KeyCode::Right => {
            state.col = (state.col + 1).min(cols - 1);
            return true;
        }
        KeyCode::Enter | KeyCode::Char(' ') => board.press_cell(state.row, state.col),
        KeyCode::Char(c) if c.is_ascii_digit() => {
            // 1..9 then 0 map to the first ten columns of the first row.
            let col = match c.to_digit(10) {
                Some(0) => 9,
                Some(digit) => digit as usize - 1,
                None => return true,
            };
            if col >= cols {
                return true;
            }
            state.row = 0;
            state.col = col;
            board.press_cell(0, col)
        }
        KeyCode::Char('s') | KeyCode::Char('S') => Ok(board.stop()),
        KeyCode::Char('-') => board.set_volume(i64::from(board.volume()) - VOLUME_STEP),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            board.set_volume(i64::from(board.volume()) + VOLUME_STEP)
        }
        KeyCode::Char('l') | KeyCode::Char('L') => {
            let next = if board.language() == "en" { "es" } else { "en" };
            board.switch_language(next)
        }
        _ => return true,
    };

    match result {
        Ok(status) => {
            state.status = status;
            state.error = None;
        }
        Err(err) => {
            error!("{}", err);
            state.error = Some(err.to_string());
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_lib::playback::SilentOutput;
    use board_lib::BoardSettings;
    use tempfile::TempDir;

    fn board() -> (BoardController, TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let board = BoardController::open(
            dir.path().join("board.json"),
            BoardSettings::default(),
            Box::new(SilentOutput::default()),
        );
        (board, dir)
    }

    #[test]
    fn arrows_stay_inside_the_grid() {
        let (mut board, _dir) = board();
        let mut state = BoardState::default();
        for _ in 0..10 {
            apply_key(&mut board, &mut state, KeyCode::Right);
            apply_key(&mut board, &mut state, KeyCode::Down);
        }
        assert_eq!((state.row, state.col), (2, 3));
        apply_key(&mut board, &mut state, KeyCode::Up);
        apply_key(&mut board, &mut state, KeyCode::Left);
        assert_eq!((state.row, state.col), (1, 2));
    }

    #[test]
    fn digits_press_the_first_row() {
        let (mut board, _dir) = board();
        let mut state = BoardState::default();
        assert!(apply_key(&mut board, &mut state, KeyCode::Char('3')));
        assert_eq!((state.row, state.col), (0, 2));
        assert_eq!(state.status, Status::NoFileAssigned);

        state.status = Status::Ready;
        apply_key(&mut board, &mut state, KeyCode::Char('9'));
        assert_eq!(state.status, Status::Ready);
    }

    #[test]
    fn volume_and_language_keys() {
        let (mut board, _dir) = board();
        let mut state = BoardState::default();
        apply_key(&mut board, &mut state, KeyCode::Char('-'));
        assert_eq!(state.status, Status::VolumeChanged(75));
        apply_key(&mut board, &mut state, KeyCode::Char('+'));
        apply_key(&mut board, &mut state, KeyCode::Char('+'));
        assert_eq!(board.volume(), 85);

        apply_key(&mut board, &mut state, KeyCode::Char('l'));
        assert_eq!(board.language(), "en");
        apply_key(&mut board, &mut state, KeyCode::Char('l'));
        assert_eq!(board.language(), "es");
    }

    #[test]
    fn q_quits() {
        let (mut board, _dir) = board();
        let mut state = BoardState::default();
        assert!(!apply_key(&mut board, &mut state, KeyCode::Char('q')));
    }
}

use std::{io, time::Duration};

use board_lib::board::{MissingFilePolicy, VolumePersistence};
use board_lib::config::DEFAULT_CONFIG_FILE;
use board_lib::playback::{AudioOutput, RodioOutput, SilentOutput};
use board_lib::{BoardController, BoardError, BoardSettings};
use clap::ArgMatches;
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::{cli, controls, logging, texts::Texts, ui};

const TICK_MS: u64 = 50;

pub fn run(args: &ArgMatches, log_buffer: logging::LogBuffer) -> Result<i32, BoardError> {
    info!("Starting fxboard");
    let Some((name, sub)) = args.subcommand() else {
        return Ok(2);
    };

    let mut board = open_board(sub);
    let texts = Texts::default();

    if name == "board" {
        return Ok(run_board(&mut board, &texts, &log_buffer));
    }
    cli::commands::execute(name, sub, &mut board, &texts)
}

fn open_board(args: &ArgMatches) -> BoardController {
    let path = args
        .get_one::<String>("config")
        .cloned()
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

    let mut settings = BoardSettings::default();
    if args.get_flag("purge-missing") {
        settings.missing_file_policy = MissingFilePolicy::Purge;
    }
    if args.get_flag("persist-volume") {
        settings.volume_persistence = VolumePersistence::Immediate;
    }

    let output: Box<dyn AudioOutput> = if args.get_flag("no-audio") {
        Box::new(SilentOutput::default())
    } else {
        Box::new(RodioOutput::new())
    };
    BoardController::open(path, settings, output)
}

fn run_board(board: &mut BoardController, texts: &Texts, log_buffer: &logging::LogBuffer) -> i32 {
    let _raw_mode = match RawModeGuard::enable() {
        Ok(guard) => guard,
        Err(err) => {
            error!("failed to enable raw mode: {}", err);
            return 1;
        }
    };
    let mut stdout = io::stdout();
    let _ = execute!(stdout, EnterAlternateScreen, cursor::Hide);
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(terminal) => terminal,
        Err(err) => {
            let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
            error!("failed to open terminal: {}", err);
            return 1;
        }
    };

    let mut state = controls::BoardState::default();
    loop {
        if let Some(status) = board.tick() {
            state.status = status;
        }
        let log_lines = logging::snapshot(log_buffer);
        ui::draw_board(&mut terminal, board, &state, texts, &log_lines);

        if !controls::handle_key_event(board, &mut state, Duration::from_millis(TICK_MS)) {
            break;
        }
    }

    // Restore the terminal state before exiting.
    let _ = terminal.show_cursor();
    let stdout = terminal.backend_mut();
    let _ = execute!(stdout, LeaveAlternateScreen, cursor::Show);

    0
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

//! One-shot subcommands: run a single board operation and print its outcome.

use std::path::PathBuf;
use std::thread::sleep;
use std::time::Duration;

use board_lib::playback::Phase;
use board_lib::{BoardController, BoardError, Status};
use clap::ArgMatches;

use super::args::{count, index};
use crate::texts::Texts;

const WAIT_TICK_MS: u64 = 50;

/// Run subcommand `name` against `board`.
///
/// Returns the process exit code.
pub fn execute(
    name: &str,
    args: &ArgMatches,
    board: &mut BoardController,
    texts: &Texts,
) -> Result<i32, BoardError> {
    let status = match name {
        "show" => {
            print!("{}", render_grid(board, texts));
            return Ok(0);
        }
        "press" => {
            let status = board.press_cell(index(args, "ROW"), index(args, "COL"))?;
            println!("{}", texts.status(board.language(), &status));
            wait_until_idle(board, texts);
            return Ok(0);
        }
        "assign" => {
            let file = string_arg(args, "FILE");
            let status = board.assign_file(index(args, "ROW"), index(args, "COL"), &file)?;
            println!("{}", texts.status(board.language(), &status));
            wait_until_idle(board, texts);
            return Ok(0);
        }
        "rename" => board.rename_cell(
            index(args, "ROW"),
            index(args, "COL"),
            &string_arg(args, "TEXT"),
        )?,
        "clear" => board.clear_cell(index(args, "ROW"), index(args, "COL"))?,
        "resize" => board.resize_grid(count(args, "ROWS"), count(args, "COLS"))?,
        "lang" => board.switch_language(&string_arg(args, "LANG"))?,
        "volume" => {
            let value = args.get_one::<i64>("VALUE").copied().unwrap_or_default();
            board.set_volume(value)?
        }
        "save-as" => {
            let path = match args.get_one::<String>("PATH") {
                Some(path) => PathBuf::from(path),
                None => board.suggested_save_path()?,
            };
            board.save_as(&path)?
        }
        "load" => board.load_from(&PathBuf::from(string_arg(args, "PATH")))?,
        "reset" => board.reset_to_default()?,
        "sounds" => {
            let folder = board.ensure_sounds_folder()?;
            println!(
                "{} {}",
                texts.get(board.language()).sounds_folder,
                folder.display()
            );
            return Ok(0);
        }
        _ => return Ok(2),
    };

    println!("{}", texts.status(board.language(), &status));
    Ok(0)
}

/// Text rendering of the grid, one line per row. Assigned cells are marked
/// with `*`.
pub fn render_grid(board: &BoardController, texts: &Texts) -> String {
    let strings = texts.get(board.language());
    let views = board.views();
    let width = views
        .iter()
        .map(|view| view.label.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = format!(
        "{} [{}]  {}: {}\n",
        strings.title,
        board.language().to_uppercase(),
        strings.volume,
        board.volume()
    );
    for row in views.chunks(board.grid().cols()) {
        let cells: Vec<String> = row
            .iter()
            .map(|view| {
                let marker = if view.assigned { '*' } else { ' ' };
                format!("{}{:<width$}", marker, view.label, width = width)
            })
            .collect();
        out.push_str(cells.join(" |").trim_end());
        out.push('\n');
    }
    out
}

/// Keep ticking until the channel is silent so the sound is not cut off by
/// process exit.
fn wait_until_idle(board: &mut BoardController, texts: &Texts) {
    loop {
        if let Some(status @ Status::PlaybackFailed(_)) = board.tick() {
            println!("{}", texts.status(board.language(), &status));
        }
        if board.playback().phase == Phase::Idle {
            break;
        }
        sleep(Duration::from_millis(WAIT_TICK_MS));
    }
}

fn string_arg(args: &ArgMatches, name: &str) -> String {
    args.get_one::<String>(name).cloned().unwrap_or_default()
}

//! # FX Board
//!
//! Command line and terminal front end for the Effects Board.

use log::{error, LevelFilter};

mod cli;
mod controls;
mod logging;
mod runner;
mod texts;
mod ui;

fn main() {
    dotenv::dotenv().ok();
    let args = cli::args::build_cli().get_matches();

    let interactive = args.subcommand_name() == Some("board");
    let debug = args
        .subcommand()
        .map(|(_, sub)| sub.get_flag("debug"))
        .unwrap_or(false);
    // The interactive board owns the terminal; everything else reports
    // warnings on stderr.
    let echo_level = if interactive {
        LevelFilter::Off
    } else {
        LevelFilter::Warn
    };
    let log_buffer = logging::init(echo_level, debug);

    let code = match runner::run(&args, log_buffer) {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err);
            1
        }
    };

    std::process::exit(code)
}

//! CLI argument definitions for `fxboard`.

use board_lib::config::DEFAULT_CONFIG_FILE;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

/// Build the CLI argument parser and command definitions.
pub fn build_cli() -> Command {
    Command::new("fxboard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Grid of sound effect cells, played one at a time")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("PATH")
                .default_value(DEFAULT_CONFIG_FILE)
                .global(true)
                .help("Board configuration file"),
        )
        .arg(
            Arg::new("purge-missing")
                .long("purge-missing")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Drop a cell's file reference when the file is gone"),
        )
        .arg(
            Arg::new("persist-volume")
                .long("persist-volume")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Write every volume change to the configuration right away"),
        )
        .arg(
            Arg::new("no-audio")
                .long("no-audio")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Do not open an audio device"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .short('d')
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Show debug output"),
        )
        .subcommand(Command::new("show").about("Print the grid"))
        .subcommand(
            Command::new("press")
                .about("Play the sound of a cell")
                .arg(coordinate("ROW"))
                .arg(coordinate("COL")),
        )
        .subcommand(
            Command::new("assign")
                .about("Bind a .wav/.mp3 file to a cell and preview it")
                .arg(coordinate("ROW"))
                .arg(coordinate("COL"))
                .arg(Arg::new("FILE").required(true).help("Audio file path")),
        )
        .subcommand(
            Command::new("rename")
                .about("Set a cell's label in the active language")
                .arg(coordinate("ROW"))
                .arg(coordinate("COL"))
                .arg(Arg::new("TEXT").required(true).help("New label")),
        )
        .subcommand(
            Command::new("clear")
                .about("Unbind a cell")
                .arg(coordinate("ROW"))
                .arg(coordinate("COL")),
        )
        .subcommand(
            Command::new("resize")
                .about("Change the grid dimensions, keeping cells that still fit")
                .arg(coordinate("ROWS"))
                .arg(coordinate("COLS")),
        )
        .subcommand(
            Command::new("lang")
                .about("Switch the display language")
                .arg(Arg::new("LANG").required(true).help("Language code, e.g. en or es")),
        )
        .subcommand(
            Command::new("volume")
                .about("Set the volume (0-100)")
                .arg(
                    Arg::new("VALUE")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(i64))
                        .help("Volume; values outside 0-100 are clamped"),
                ),
        )
        .subcommand(
            Command::new("save-as")
                .about("Save the board to another file and make it the active one")
                .arg(Arg::new("PATH").help("Target file (default: configs/buttons_<lang>.json)")),
        )
        .subcommand(
            Command::new("load")
                .about("Replace the board with another configuration file")
                .arg(Arg::new("PATH").required(true).help("Configuration file")),
        )
        .subcommand(Command::new("reset").about("Unbind every cell and restore the default volume"))
        .subcommand(Command::new("sounds").about("Create the sounds folder and print its path"))
        .subcommand(Command::new("board").about("Open the interactive board"))
}

/// One-based grid coordinate or dimension.
fn coordinate(name: &'static str) -> Arg {
    Arg::new(name)
        .required(true)
        .value_parser(value_parser!(u64).range(1..))
        .help("Starts at 1")
}

/// Read a one-based argument as a zero-based index.
pub fn index(args: &ArgMatches, name: &str) -> usize {
    args.get_one::<u64>(name)
        .map(|value| value.saturating_sub(1) as usize)
        .unwrap_or(0)
}

/// Read a one-based argument as a count.
pub fn count(args: &ArgMatches, name: &str) -> usize {
    args.get_one::<u64>(name).copied().unwrap_or(1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_are_one_based() {
        let matches = build_cli()
            .try_get_matches_from(["fxboard", "press", "2", "3"])
            .expect("parse");
        let (_, press) = matches.subcommand().expect("subcommand");
        assert_eq!(index(press, "ROW"), 1);
        assert_eq!(index(press, "COL"), 2);
    }

    #[test]
    fn zero_coordinate_is_rejected() {
        assert!(build_cli()
            .try_get_matches_from(["fxboard", "press", "0", "1"])
            .is_err());
    }

    #[test]
    fn volume_accepts_negative_values() {
        let matches = build_cli()
            .try_get_matches_from(["fxboard", "volume", "-20"])
            .expect("parse");
        let (_, volume) = matches.subcommand().expect("subcommand");
        assert_eq!(volume.get_one::<i64>("VALUE"), Some(&-20));
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let matches = build_cli()
            .try_get_matches_from(["fxboard", "show", "--config", "x.json", "--purge-missing"])
            .expect("parse");
        let (_, show) = matches.subcommand().expect("subcommand");
        assert_eq!(show.get_one::<String>("config").map(String::as_str), Some("x.json"));
        assert!(show.get_flag("purge-missing"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }
}

//! The operation set the UI layer calls.
//!
//! `BoardController` owns the grid, the playback engine and the active
//! configuration path. Every operation validates its arguments before it
//! mutates anything, persists structural edits to the active path right away
//! and reports what happened as a [`Status`]. File-system and device failures
//! never escape as panics; the UI re-reads [`BoardController::views`] to
//! render.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{info, warn};

use crate::config::{self, Config, Meta, DEFAULT_LANGUAGE};
use crate::grid::{GridError, GridModel};
use crate::language;
use crate::playback::{AudioOutput, FadeToken, PlaybackEngine, PlaybackState};
use crate::tools::clock::Clock;

mod controls;
mod edits;
mod error;
mod files;
mod settings;
mod status;

pub use error::BoardError;
pub use settings::{BoardSettings, MissingFilePolicy, VolumePersistence, STOP_FADE_MS};
pub use status::{CellView, Status};

pub struct BoardController {
    grid: GridModel,
    language: String,
    volume: u8,
    active_path: PathBuf,
    engine: PlaybackEngine,
    settings: BoardSettings,
    /// Cells whose file was found missing on press this session.
    missing: BTreeSet<(usize, usize)>,
}

impl BoardController {
    /// Open the board configuration at `path`, creating it when absent.
    ///
    /// An unreadable or malformed document is logged and replaced in memory
    /// by the defaults; `path` stays the active path and is not overwritten
    /// until the next edit.
    pub fn open(path: impl Into<PathBuf>, settings: BoardSettings, output: Box<dyn AudioOutput>) -> Self {
        Self::with_engine(path, settings, PlaybackEngine::new(output))
    }

    /// Like [`open`](Self::open), with fades timed by `clock`.
    pub fn open_with_clock(
        path: impl Into<PathBuf>,
        settings: BoardSettings,
        output: Box<dyn AudioOutput>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self::with_engine(path, settings, PlaybackEngine::with_clock(output, clock))
    }

    fn with_engine(path: impl Into<PathBuf>, settings: BoardSettings, mut engine: PlaybackEngine) -> Self {
        let active_path = path.into();
        engine.set_supersede_fade_ms(settings.supersede_fade_ms);

        let config = match config::load_or_init(&active_path) {
            Ok(loaded) => {
                info!("Loaded {} ({:?})", active_path.display(), loaded.origin);
                loaded.config
            }
            Err(err) => {
                warn!("{}; starting with defaults", err);
                Config::default()
            }
        };
        let (grid, language, volume) = match board_state(&config) {
            Ok(state) => state,
            Err(err) => {
                warn!("{}; starting with defaults", err);
                default_state()
            }
        };

        engine.set_volume(f32::from(volume) / 100.0);
        Self {
            grid,
            language,
            volume,
            active_path,
            engine,
            settings,
            missing: BTreeSet::new(),
        }
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    /// Active display language.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Volume in `0..=100`.
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Configuration path that edits are persisted to.
    pub fn active_path(&self) -> &Path {
        &self.active_path
    }

    pub fn playback(&self) -> PlaybackState {
        self.engine.state()
    }

    /// Cancellation handle of the fade currently scheduled on the channel.
    pub fn pending_fade(&self) -> Option<FadeToken> {
        self.engine.pending_fade()
    }

    /// Every cell resolved for the active language, row-major.
    pub fn views(&self) -> Vec<CellView> {
        self.grid
            .cells()
            .map(|cell| CellView {
                row: cell.row,
                col: cell.col,
                label: language::resolve(cell, &self.language),
                assigned: cell.has_file() && !self.missing.contains(&(cell.row, cell.col)),
            })
            .collect()
    }

    pub fn view(&self, row: usize, col: usize) -> Result<CellView, GridError> {
        let cell = self.grid.get_cell(row, col)?;
        Ok(CellView {
            row,
            col,
            label: language::resolve(cell, &self.language),
            assigned: cell.has_file() && !self.missing.contains(&(row, col)),
        })
    }

    /// Current state as a persistable document.
    pub fn to_config(&self) -> Config {
        Config {
            grid_dimensions: self.grid.dimensions(),
            cells: self.grid.to_cells(),
            meta: Meta {
                volume: self.volume,
                language: self.language.clone(),
            },
        }
    }

    fn persist(&self) -> Result<(), BoardError> {
        config::save(&self.to_config(), &self.active_path)?;
        Ok(())
    }
}

fn board_state(config: &Config) -> Result<(GridModel, String, u8), GridError> {
    let grid = GridModel::from_config(config)?;
    let mut language = config::normalize_language(&config.meta.language);
    if language.is_empty() {
        language = DEFAULT_LANGUAGE.to_string();
    }
    Ok((grid, language, config.meta.volume.min(100)))
}

fn default_state() -> (GridModel, String, u8) {
    let meta = Meta::default();
    (GridModel::default(), meta.language, meta.volume)
}

#[cfg(test)]
pub(crate) mod harness {
    use std::fs;
    use std::path::PathBuf;
    use std::rc::Rc;

    use tempfile::TempDir;

    use super::{BoardController, BoardSettings};
    use crate::playback::testing::RecordingOutput;
    use crate::tools::clock::ManualClock;

    /// Controller wired to a recording output, a manual clock and a
    /// throwaway directory.
    pub struct Board {
        pub board: BoardController,
        pub output: RecordingOutput,
        pub clock: ManualClock,
        pub dir: TempDir,
    }

    impl Board {
        pub fn new() -> Self {
            let dir = tempfile::tempdir().expect("tempdir");
            Self::in_dir(dir, |_| {})
        }

        pub fn in_dir(dir: TempDir, tweak: impl FnOnce(&mut BoardSettings)) -> Self {
            let mut settings = BoardSettings {
                sounds_dir: dir.path().join("SOUND EFFECTS"),
                configs_dir: dir.path().join("configs"),
                ..BoardSettings::default()
            };
            tweak(&mut settings);
            let output = RecordingOutput::default();
            let clock = ManualClock::new();
            let board = BoardController::open_with_clock(
                dir.path().join("button_config.json"),
                settings,
                Box::new(output.clone()),
                Rc::new(clock.clone()),
            );
            Self {
                board,
                output,
                clock,
                dir,
            }
        }

        /// Let any preview or fade run to completion.
        pub fn settle(&mut self) {
            for _ in 0..3 {
                self.clock.advance_ms(500);
                self.board.tick();
            }
        }

        pub fn config_path(&self) -> PathBuf {
            self.dir.path().join("button_config.json")
        }

        pub fn asset(&self, name: &str) -> String {
            let path = self.dir.path().join(name);
            fs::write(&path, b"RIFF").expect("write asset");
            path.display().to_string()
        }

        pub fn persisted(&self) -> crate::config::Config {
            crate::config::load(&self.config_path())
                .expect("persisted config")
                .config
        }
    }
}

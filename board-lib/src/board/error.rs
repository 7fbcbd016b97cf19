use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::grid::GridError;
use crate::playback::PlaybackError;

/// Errors returned by [`BoardController`](super::BoardController) operations.
///
/// Grid errors are contract violations raised before anything changes.
/// Config write errors are raised after the in-memory edit, which is kept.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error("invalid language code '{0}'")]
    InvalidLanguage(String),

    #[error("failed to prepare folder '{}': {reason}", path.display())]
    Folder { path: PathBuf, reason: String },
}

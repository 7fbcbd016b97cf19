use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for reading and writing persisted board configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document could not be read from disk.
    #[error("failed to read config '{}': {reason}", path.display())]
    Read { path: PathBuf, reason: String },

    /// The document was read but is not a valid board configuration.
    #[error("malformed config '{}': {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// The destination could not be written.
    #[error("failed to write config '{}': {reason}", path.display())]
    Write { path: PathBuf, reason: String },
}

impl ConfigError {
    pub(crate) fn read(path: &Path, reason: impl ToString) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn parse(path: &Path, reason: impl ToString) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: &Path, reason: impl ToString) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// True for the read-side failures a caller recovers from by starting
    /// with a default configuration.
    pub fn is_read_error(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Parse { .. })
    }
}

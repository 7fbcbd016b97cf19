use std::path::Path;

use log::{info, warn};

use crate::config::clamp_volume;
use crate::playback::PlaybackError;

use super::{BoardController, BoardError, MissingFilePolicy, Status, VolumePersistence};

impl BoardController {
    /// Play the sound bound to `(row, col)`.
    ///
    /// An unbound cell reports [`Status::NoFileAssigned`]. A bound file that
    /// is gone from disk reports [`Status::FileNotFound`] without touching the
    /// channel and clears the cell's assigned marker; under
    /// [`MissingFilePolicy::Purge`] the reference is also dropped and
    /// persisted. Device failures come back as [`Status::PlaybackFailed`].
    pub fn press_cell(&mut self, row: usize, col: usize) -> Result<Status, BoardError> {
        let cell = self.grid.get_cell(row, col)?;
        let Some(path) = cell.file_path.clone() else {
            return Ok(Status::NoFileAssigned);
        };

        if !Path::new(&path).is_file() {
            return self.file_missing(row, col, path);
        }

        self.missing.remove(&(row, col));
        match self.engine.play_file(&path) {
            Ok(()) => Ok(Status::Playing(path)),
            Err(PlaybackError::AssetNotFound { .. }) => self.file_missing(row, col, path),
            Err(err) => {
                warn!("cell ({}, {}): {}", row, col, err);
                Ok(Status::PlaybackFailed(err.to_string()))
            }
        }
    }

    fn file_missing(&mut self, row: usize, col: usize, path: String) -> Result<Status, BoardError> {
        warn!("cell ({}, {}): file not found: {}", row, col, path);
        match self.settings.missing_file_policy {
            MissingFilePolicy::Keep => {
                self.missing.insert((row, col));
            }
            MissingFilePolicy::Purge => {
                info!("dropping stale file reference of cell ({}, {})", row, col);
                self.grid.clear(row, col)?;
                self.missing.remove(&(row, col));
                self.persist()?;
            }
        }
        Ok(Status::FileNotFound(path))
    }

    /// Fade the channel out over the configured stop fade.
    pub fn stop(&mut self) -> Status {
        self.engine.stop(self.settings.stop_fade_ms);
        Status::Stopped
    }

    /// Set the volume, clamped into `0..=100`, and apply it right away.
    ///
    /// The value is written to disk immediately only under
    /// [`VolumePersistence::Immediate`]; otherwise it rides along with the
    /// next persisted edit.
    pub fn set_volume(&mut self, volume: i64) -> Result<Status, BoardError> {
        let volume = clamp_volume(volume);
        self.volume = volume;
        self.engine.set_volume(f32::from(volume) / 100.0);
        if self.settings.volume_persistence == VolumePersistence::Immediate {
            self.persist()?;
        }
        Ok(Status::VolumeChanged(volume))
    }

    /// Advance scheduled fades. Call this regularly from the UI loop.
    ///
    /// Returns a status only when a deferred sound failed to start.
    pub fn tick(&mut self) -> Option<Status> {
        match self.engine.tick() {
            Ok(()) => None,
            Err(err) => {
                warn!("{}", err);
                Some(Status::PlaybackFailed(err.to_string()))
            }
        }
    }
}

use std::path::PathBuf;

use crate::assets::{DEFAULT_CONFIGS_DIR, DEFAULT_SOUNDS_DIR};
use crate::playback::{PREVIEW_FADE_MS, PREVIEW_MS, SUPERSEDE_FADE_MS};

use super::BoardController;

/// Default fade applied by [`BoardController::stop`].
pub const STOP_FADE_MS: u64 = 150;

/// What pressing a cell does to a binding whose file is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingFilePolicy {
    /// Leave the persisted reference alone; only the session marker changes.
    #[default]
    Keep,
    /// Drop the file reference and persist.
    Purge,
}

/// When a bare volume change reaches disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VolumePersistence {
    /// Written with the next structural edit or explicit save.
    #[default]
    Deferred,
    /// Written on every change.
    Immediate,
}

/// Runtime knobs for a [`BoardController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSettings {
    pub preview_ms: u64,
    pub preview_fade_ms: u64,
    pub supersede_fade_ms: u64,
    pub stop_fade_ms: u64,
    pub sounds_dir: PathBuf,
    pub configs_dir: PathBuf,
    pub missing_file_policy: MissingFilePolicy,
    pub volume_persistence: VolumePersistence,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            preview_ms: PREVIEW_MS,
            preview_fade_ms: PREVIEW_FADE_MS,
            supersede_fade_ms: SUPERSEDE_FADE_MS,
            stop_fade_ms: STOP_FADE_MS,
            sounds_dir: PathBuf::from(DEFAULT_SOUNDS_DIR),
            configs_dir: PathBuf::from(DEFAULT_CONFIGS_DIR),
            missing_file_policy: MissingFilePolicy::default(),
            volume_persistence: VolumePersistence::default(),
        }
    }
}

impl BoardController {
    pub fn settings(&self) -> &BoardSettings {
        &self.settings
    }

    /// Configure the preview length and its fade (ms).
    pub fn set_preview_ms(&mut self, preview_ms: u64, fade_ms: u64) {
        self.settings.preview_ms = preview_ms;
        self.settings.preview_fade_ms = fade_ms;
    }

    /// Configure the fade used when a new sound replaces an audible one (ms).
    pub fn set_supersede_fade_ms(&mut self, ms: u64) {
        self.settings.supersede_fade_ms = ms;
        self.engine.set_supersede_fade_ms(ms);
    }

    /// Configure the fade used by [`stop`](BoardController::stop) (ms).
    pub fn set_stop_fade_ms(&mut self, ms: u64) {
        self.settings.stop_fade_ms = ms;
    }

    pub fn set_missing_file_policy(&mut self, policy: MissingFilePolicy) {
        self.settings.missing_file_policy = policy;
    }

    pub fn set_volume_persistence(&mut self, persistence: VolumePersistence) {
        self.settings.volume_persistence = persistence;
    }
}

use std::path::{Path, PathBuf};

use log::info;

use crate::assets;
use crate::config;

use super::{board_state, BoardController, BoardError, Status};

impl BoardController {
    /// Write the whole board to `path` and make it the active path.
    ///
    /// On failure the active path is unchanged.
    pub fn save_as(&mut self, path: &Path) -> Result<Status, BoardError> {
        config::save(&self.to_config(), path)?;
        self.active_path = path.to_path_buf();
        info!("saved board as {}", path.display());
        Ok(Status::SavedAs(path.display().to_string()))
    }

    /// Replace the whole board with the configuration at `path`.
    ///
    /// Dimensions, cells, volume and language all come from the file, which
    /// becomes the active path. Nothing changes if the file cannot be read or
    /// does not describe a valid grid.
    pub fn load_from(&mut self, path: &Path) -> Result<Status, BoardError> {
        let loaded = config::load(path)?;
        let (grid, language, volume) = board_state(&loaded.config)?;

        self.grid = grid;
        self.language = language;
        self.volume = volume;
        self.engine.set_volume(f32::from(volume) / 100.0);
        self.missing.clear();
        self.active_path = path.to_path_buf();
        info!("loaded board from {} ({:?})", path.display(), loaded.origin);
        Ok(Status::Loaded(path.display().to_string()))
    }

    /// Suggested "save as" target for the active language, creating the
    /// configs folder when needed.
    pub fn suggested_save_path(&self) -> Result<PathBuf, BoardError> {
        let folder = &self.settings.configs_dir;
        let folder = assets::ensure_configs_folder(folder).map_err(|err| BoardError::Folder {
            path: folder.clone(),
            reason: err.to_string(),
        })?;
        Ok(folder.join(assets::suggested_config_name(&self.language)))
    }

    /// Create the sounds folder with its README when absent.
    ///
    /// # Returns
    ///
    /// Absolute path of the folder.
    pub fn ensure_sounds_folder(&self) -> Result<PathBuf, BoardError> {
        let folder = &self.settings.sounds_dir;
        assets::ensure_sounds_folder(folder).map_err(|err| BoardError::Folder {
            path: folder.clone(),
            reason: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::super::harness::Board;
    use super::*;
    use crate::config::GridDimensions;

    #[test]
    fn save_as_switches_the_active_path() {
        let mut rig = Board::new();
        let target = rig.dir.path().join("live.json");
        let status = rig.board.save_as(&target).unwrap();
        assert_eq!(status, Status::SavedAs(target.display().to_string()));
        assert_eq!(rig.board.active_path(), target.as_path());

        rig.board.rename_cell(0, 0, "Intro").unwrap();
        let saved = config::load(&target).unwrap().config;
        assert_eq!(saved, rig.board.to_config());
        assert_ne!(rig.persisted(), saved);
    }

    #[test]
    fn failed_save_as_keeps_the_active_path() {
        let mut rig = Board::new();
        let bad = rig.dir.path().join("missing").join("x.json");
        assert!(matches!(
            rig.board.save_as(&bad),
            Err(BoardError::Config(_))
        ));
        assert_eq!(rig.board.active_path(), rig.config_path().as_path());
    }

    #[test]
    fn load_replaces_everything() {
        let mut rig = Board::new();
        rig.board.assign_file(0, 0, "kick.wav").unwrap();

        let other = rig.dir.path().join("other.json");
        fs::write(
            &other,
            r#"{"grid":{"rows":2,"cols":2},"buttons":[{"row":1,"col":1,"label":"Boom","file":"boom.mp3"}],"__meta__":{"volume":35,"lang":"en"}}"#,
        )
        .unwrap();

        let status = rig.board.load_from(&other).unwrap();
        assert_eq!(status, Status::Loaded(other.display().to_string()));
        assert_eq!(rig.board.grid().dimensions(), GridDimensions::new(2, 2));
        assert_eq!(rig.board.language(), "en");
        assert_eq!(rig.board.volume(), 35);
        assert_eq!(rig.board.playback().volume, 0.35);
        assert_eq!(rig.board.view(0, 0).unwrap().label, "1,1");
        assert!(!rig.board.view(0, 0).unwrap().assigned);
        assert_eq!(rig.board.view(1, 1).unwrap().label, "Boom");
        assert_eq!(rig.board.active_path(), other.as_path());
    }

    #[test]
    fn failed_load_changes_nothing() {
        let mut rig = Board::new();
        rig.board.assign_file(0, 0, "kick.wav").unwrap();
        let before = rig.board.to_config();

        let broken = rig.dir.path().join("broken.json");
        fs::write(&broken, "[1, 2").unwrap();
        assert!(rig.board.load_from(&broken).is_err());

        let empty_grid = rig.dir.path().join("empty.json");
        fs::write(&empty_grid, r#"{"gridDimensions":{"rows":0,"cols":0}}"#).unwrap();
        assert!(matches!(
            rig.board.load_from(&empty_grid),
            Err(BoardError::Grid(_))
        ));

        assert!(rig.board.load_from(&rig.dir.path().join("absent.json")).is_err());
        assert_eq!(rig.board.to_config(), before);
        assert_eq!(rig.board.active_path(), rig.config_path().as_path());
    }

    #[test]
    fn suggested_path_uses_language_and_creates_folder() {
        let mut rig = Board::new();
        rig.board.switch_language("en").unwrap();
        let path = rig.board.suggested_save_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "buttons_en.json");
        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn sounds_folder_is_created_with_readme() {
        let rig = Board::new();
        let folder = rig.board.ensure_sounds_folder().unwrap();
        assert!(folder.is_absolute());
        assert!(folder.join("README.md").is_file());
    }
}

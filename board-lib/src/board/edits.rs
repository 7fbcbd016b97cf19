use log::{info, warn};

use crate::assets;
use crate::config::{normalize_language, DEFAULT_VOLUME};
use crate::language::coordinate_label;

use super::{BoardController, BoardError, Status};

impl BoardController {
    /// Bind `path` to `(row, col)` and preview it.
    ///
    /// The active language's label becomes the file name without extension;
    /// labels in other languages are kept. A failed preview is logged and does
    /// not undo the assignment.
    pub fn assign_file(&mut self, row: usize, col: usize, path: &str) -> Result<Status, BoardError> {
        self.grid.set_file(row, col, path)?;
        let stem = assets::file_stem(path);
        self.grid.set_label(row, col, &self.language, &stem)?;
        self.missing.remove(&(row, col));
        info!("cell ({}, {}) -> {}", row, col, path);

        if let Err(err) = self.engine.preview(
            path,
            self.settings.preview_ms,
            self.settings.preview_fade_ms,
        ) {
            warn!("preview of {} failed: {}", path, err);
        }

        self.persist()?;
        Ok(Status::Assigned(path.to_string()))
    }

    /// Set the active language's label of `(row, col)`.
    pub fn rename_cell(&mut self, row: usize, col: usize, text: &str) -> Result<Status, BoardError> {
        self.grid.set_label(row, col, &self.language, text)?;
        self.persist()?;
        Ok(Status::Renamed)
    }

    /// Unbind `(row, col)` and restore its active-language label to the
    /// coordinates.
    pub fn clear_cell(&mut self, row: usize, col: usize) -> Result<Status, BoardError> {
        self.grid.clear(row, col)?;
        self.grid
            .set_label(row, col, &self.language, &coordinate_label(row, col))?;
        self.missing.remove(&(row, col));
        self.persist()?;
        Ok(Status::Cleared)
    }

    /// Resize the grid, keeping every cell that stays in range.
    pub fn resize_grid(&mut self, rows: usize, cols: usize) -> Result<Status, BoardError> {
        self.grid.resize(rows, cols)?;
        let dimensions = self.grid.dimensions();
        self.missing
            .retain(|&(row, col)| dimensions.contains(row, col));
        info!("grid resized to {}x{}", rows, cols);
        self.persist()?;
        Ok(Status::Resized)
    }

    /// Make `lang` the active display language and persist the choice.
    ///
    /// Codes are trimmed and lowercased. Anything empty or containing more
    /// than ASCII letters, digits, `-` and `_` is rejected.
    pub fn switch_language(&mut self, lang: &str) -> Result<Status, BoardError> {
        let lang = normalize_language(lang);
        if lang.is_empty()
            || !lang
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(BoardError::InvalidLanguage(lang));
        }
        self.language = lang.clone();
        self.persist()?;
        Ok(Status::LanguageChanged(lang))
    }

    /// Unbind every cell and reset the active-language labels and volume.
    ///
    /// Grid dimensions and the active language are kept.
    pub fn reset_to_default(&mut self) -> Result<Status, BoardError> {
        self.grid.reset_all(&self.language);
        self.missing.clear();
        self.volume = DEFAULT_VOLUME;
        self.engine.set_volume(f32::from(DEFAULT_VOLUME) / 100.0);
        info!("board reset");
        self.persist()?;
        Ok(Status::Reset)
    }
}

//! In-memory grid of cells.
//!
//! `GridModel` is the single owner of cell state. Cells are stored row-major
//! in a flat vector and addressed by zero-based `(row, col)`. Widgets and
//! other views are derived from it, never the other way round.

use std::ops::Index;

use log::debug;

use crate::assets;
use crate::config::{CellConfig, Config, GridDimensions};
use crate::language::coordinate_label;

mod error;

pub use error::GridError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridModel {
    dimensions: GridDimensions,
    cells: Vec<CellConfig>,
}

impl GridModel {
    /// Create a grid of unbound cells with coordinate labels.
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        check_dimensions(rows, cols)?;
        Ok(Self::blank(GridDimensions::new(rows, cols)))
    }

    fn blank(dimensions: GridDimensions) -> Self {
        let GridDimensions { rows, cols } = dimensions;
        let cells = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| CellConfig::with_default_labels(row, col)))
            .collect();
        Self { dimensions, cells }
    }

    /// Build a grid from a persisted configuration.
    ///
    /// Entries outside the stored dimensions are ignored; when a coordinate
    /// appears more than once the last entry wins.
    pub fn from_config(config: &Config) -> Result<Self, GridError> {
        let GridDimensions { rows, cols } = config.grid_dimensions;
        let mut grid = Self::new(rows, cols)?;
        for item in &config.cells {
            if !grid.dimensions.contains(item.row, item.col) {
                debug!(
                    "ignoring cell ({}, {}) outside {}x{} grid",
                    item.row, item.col, rows, cols
                );
                continue;
            }
            let index = grid.offset(item.row, item.col);
            grid.cells[index] = item.clone();
        }
        Ok(grid)
    }

    /// Every cell in row-major order, ready to persist.
    pub fn to_cells(&self) -> Vec<CellConfig> {
        self.cells.clone()
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    pub fn rows(&self) -> usize {
        self.dimensions.rows
    }

    pub fn cols(&self) -> usize {
        self.dimensions.cols
    }

    /// Iterate cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &CellConfig> {
        self.cells.iter()
    }

    /// Rebuild the grid to `rows x cols`.
    ///
    /// Cells in the intersection of the old and new dimensions keep their
    /// file and labels. New positions start unbound with coordinate labels and
    /// positions outside the new range are dropped.
    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<(), GridError> {
        check_dimensions(rows, cols)?;
        let old = std::mem::take(&mut self.cells);
        let old_dimensions = self.dimensions;
        let dimensions = GridDimensions::new(rows, cols);

        let mut cells = Vec::with_capacity(dimensions.cell_count());
        for row in 0..rows {
            for col in 0..cols {
                if old_dimensions.contains(row, col) {
                    cells.push(old[row * old_dimensions.cols + col].clone());
                } else {
                    cells.push(CellConfig::with_default_labels(row, col));
                }
            }
        }

        self.dimensions = dimensions;
        self.cells = cells;
        Ok(())
    }

    /// Borrow the cell at `(row, col)`.
    pub fn get_cell(&self, row: usize, col: usize) -> Result<&CellConfig, GridError> {
        self.check(row, col)?;
        Ok(&self.cells[self.offset(row, col)])
    }

    /// Bind `path` to the cell at `(row, col)`.
    ///
    /// # Errors
    ///
    /// [`GridError::OutOfRange`] for bad coordinates and
    /// [`GridError::UnsupportedFormat`] for anything but `.wav`/`.mp3`. The
    /// cell is untouched in both cases.
    pub fn set_file(&mut self, row: usize, col: usize, path: &str) -> Result<(), GridError> {
        self.check(row, col)?;
        if !assets::is_supported(path) {
            return Err(GridError::UnsupportedFormat {
                path: path.to_string(),
            });
        }
        let index = self.offset(row, col);
        self.cells[index].file_path = Some(path.to_string());
        Ok(())
    }

    /// Set the label of `(row, col)` for `lang`, leaving other languages alone.
    pub fn set_label(
        &mut self,
        row: usize,
        col: usize,
        lang: &str,
        text: &str,
    ) -> Result<(), GridError> {
        self.check(row, col)?;
        let index = self.offset(row, col);
        self.cells[index]
            .labels
            .insert(lang.to_string(), text.to_string());
        Ok(())
    }

    /// Remove the file binding of `(row, col)`. Labels are kept.
    pub fn clear(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        self.check(row, col)?;
        let index = self.offset(row, col);
        self.cells[index].file_path = None;
        Ok(())
    }

    /// Unbind every cell and reset its `lang` label to the coordinates.
    pub fn reset_all(&mut self, lang: &str) {
        for cell in &mut self.cells {
            cell.file_path = None;
            cell.labels
                .insert(lang.to_string(), coordinate_label(cell.row, cell.col));
        }
    }

    fn check(&self, row: usize, col: usize) -> Result<(), GridError> {
        if self.dimensions.contains(row, col) {
            Ok(())
        } else {
            Err(GridError::OutOfRange {
                row,
                col,
                rows: self.dimensions.rows,
                cols: self.dimensions.cols,
            })
        }
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.dimensions.cols + col
    }
}

/// Default 3x4 grid.
impl Default for GridModel {
    fn default() -> Self {
        Self::blank(GridDimensions::default())
    }
}

/// Panicking accessor for render code that iterates known-good coordinates.
impl Index<(usize, usize)> for GridModel {
    type Output = CellConfig;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(
            self.dimensions.contains(row, col),
            "cell ({}, {}) is outside the {}x{} grid",
            row,
            col,
            self.dimensions.rows,
            self.dimensions.cols
        );
        &self.cells[self.offset(row, col)]
    }
}

fn check_dimensions(rows: usize, cols: usize) -> Result<(), GridError> {
    if rows == 0 || cols == 0 {
        return Err(GridError::InvalidDimensions { rows, cols });
    }
    Ok(())
}

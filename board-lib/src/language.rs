//! Display label resolution.

use crate::config::CellConfig;

/// Coordinate label for a zero-based cell position, e.g. `(0, 0)` -> `"1,1"`.
pub fn coordinate_label(row: usize, col: usize) -> String {
    format!("{},{}", row + 1, col + 1)
}

/// Label to show for `cell` in `lang`.
///
/// Never fails: a missing entry for `lang` falls back to the coordinate
/// label, never to another language's text.
pub fn resolve(cell: &CellConfig, lang: &str) -> String {
    cell.labels
        .get(lang)
        .cloned()
        .unwrap_or_else(|| coordinate_label(cell.row, cell.col))
}

use thiserror::Error;

/// Errors raised by [`GridModel`](super::GridModel) operations.
///
/// All of them are raised before any cell is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Coordinates outside the current dimensions. A caller bug, not a user
    /// condition.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Asset extension is not one of the allowed audio formats.
    #[error("unsupported audio format: {path} (expected .wav or .mp3)")]
    UnsupportedFormat { path: String },

    /// A grid needs at least one row and one column.
    #[error("invalid grid dimensions {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
}

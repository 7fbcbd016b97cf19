/// Outcome of a controller operation, for the UI to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ready,
    NoFileAssigned,
    /// The bound file is gone from disk. Carries the stale path.
    FileNotFound(String),
    Playing(String),
    /// The device or decoder refused the sound. Carries the reason.
    PlaybackFailed(String),
    Assigned(String),
    Renamed,
    Cleared,
    Resized,
    LanguageChanged(String),
    VolumeChanged(u8),
    SavedAs(String),
    Loaded(String),
    Reset,
    Stopped,
}

/// Resolved state of one cell, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
    pub row: usize,
    pub col: usize,
    pub label: String,
    /// Bound to a file that has not been found missing this session.
    pub assigned: bool,
}

use thiserror::Error;

/// Errors from the playback channel.
///
/// None of these are fatal; after any of them the channel is `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The requested file does not exist on disk.
    #[error("audio file not found: {path}")]
    AssetNotFound { path: String },

    /// The output device could not be opened or used.
    #[error("audio device error: {0}")]
    Device(String),

    /// The file exists but could not be opened or decoded.
    #[error("failed to decode '{path}': {reason}")]
    Decode { path: String, reason: String },

    /// `play` was called with nothing loaded.
    #[error("nothing is loaded")]
    NothingLoaded,
}

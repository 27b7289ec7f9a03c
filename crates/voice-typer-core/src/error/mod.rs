use error_location::ErrorLocation;
use thiserror::Error;

/// Session-layer errors with source location tracking.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The transcription worker process could not be started.
    #[error("Failed to spawn worker: {reason} {location}")]
    WorkerSpawnFailed {
        /// Description of the spawn failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No live worker process is available to accept commands.
    #[error("Worker unavailable: {reason} {location}")]
    WorkerUnavailable {
        /// Why the worker cannot be reached.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A hotkey string could not be parsed.
    #[error("Invalid hotkey {input:?}: {reason} {location}")]
    InvalidHotkey {
        /// The rejected input.
        input: String,
        /// What is wrong with it.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No input-synthesis backend is available for typing.
    #[error("Keyboard synthesis unavailable {location}")]
    KeyboardUnavailable {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Synthesized typing failed.
    #[error("Typing failed: {reason} {location}")]
    TypingFailed {
        /// Description of the typing failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Clipboard access or write failed.
    #[error("Clipboard error: {reason} {location}")]
    ClipboardFailed {
        /// Description of the clipboard failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The synthesized paste keystroke failed.
    #[error("Paste failed: {reason} {location}")]
    PasteFailed {
        /// Description of the paste failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// History file could not be read or written.
    #[error("History IO error: {source} {location}")]
    HistoryIo {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// History file contents could not be (de)serialized.
    #[error("History format error: {source} {location}")]
    HistoryFormat {
        /// The underlying serde_json error.
        #[source]
        source: serde_json::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Persisting the indicator position failed.
    #[error("Position store error: {reason} {location}")]
    PositionStore {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

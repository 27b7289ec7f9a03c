use crate::protocol::RecordingMode;

/// Fire-and-forget notices for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A recording session began.
    RecordingStarted {
        /// Mode the worker was started in.
        mode: RecordingMode,
    },
    /// The active recording ended.
    RecordingStopped,
    /// Live preview text.
    TranscriptionPartial(String),
    /// Final transcript about to be injected.
    TranscriptionFinal(String),
    /// Outcome of registering a global hotkey.
    HotkeyRegistration {
        /// Combo as shown to the user.
        combo: String,
        /// Whether the OS accepted it.
        ok: bool,
    },
    /// The worker could not be started or reached.
    WorkerUnavailable(String),
    /// Text was left on the clipboard instead of being typed or pasted.
    InjectionIncomplete,
    /// Paste-last was requested with an empty history.
    NoTranscriptAvailable,
}

/// Tray icon states corresponding to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// Ready to start recording.
    Idle,
    /// Currently recording audio.
    Recording,
    /// The transcription worker could not be started or died.
    Unavailable,
}

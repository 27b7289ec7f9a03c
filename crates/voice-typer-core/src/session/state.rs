use std::fmt;

/// Phase of the single dictation session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Nothing is being recorded.
    #[default]
    Idle,
    /// Recording while the hold combo is held.
    HoldRecording,
    /// Recording until the toggle combo is pressed again.
    ToggleRecording,
    /// Tearing down a recording; always followed by `Idle`.
    Finalizing,
}

impl SessionState {
    /// Whether a recording is active (and the indicator should be visible).
    pub fn is_recording(&self) -> bool {
        matches!(
            self,
            SessionState::HoldRecording | SessionState::ToggleRecording
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Idle => "Idle",
            SessionState::HoldRecording => "HoldRecording",
            SessionState::ToggleRecording => "ToggleRecording",
            SessionState::Finalizing => "Finalizing",
        };
        f.write_str(label)
    }
}

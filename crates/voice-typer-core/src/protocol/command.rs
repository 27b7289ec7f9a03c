use std::fmt;

/// Recording mode announced to the worker before each `START`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingMode {
    /// Record while the hold combo is physically held.
    Hold,
    /// Record from one toggle press to the next.
    Toggle,
}

impl RecordingMode {
    /// Wire spelling of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordingMode::Hold => "HOLD",
            RecordingMode::Toggle => "TOGGLE",
        }
    }
}

impl fmt::Display for RecordingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command line written to the worker's stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerCommand {
    /// `SET_MODE <mode>`
    SetMode(RecordingMode),
    /// `SET_HOLD_KEYS <combo>`, combo already in worker spelling.
    SetHoldKeys(String),
    /// `START`
    Start,
    /// `STOP`
    Stop,
}

impl WorkerCommand {
    /// Serialize as a single newline-terminated line.
    pub fn to_line(&self) -> String {
        format!("{self}\n")
    }
}

impl fmt::Display for WorkerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerCommand::SetMode(mode) => write!(f, "SET_MODE {mode}"),
            WorkerCommand::SetHoldKeys(combo) => write!(f, "SET_HOLD_KEYS {combo}"),
            WorkerCommand::Start => f.write_str("START"),
            WorkerCommand::Stop => f.write_str("STOP"),
        }
    }
}

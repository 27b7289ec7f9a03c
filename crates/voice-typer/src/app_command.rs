use crate::HotkeyRole;

/// Commands delivered to the session loop from other threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// A registered global hotkey was pressed.
    Hotkey(HotkeyRole),
    /// Stop the active recording (indicator right click).
    StopRequested,
    /// Request application shutdown.
    Shutdown,
}

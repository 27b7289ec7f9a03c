use crate::{TrayIconState, config::HotkeyConfig};

/// Commands sent from the async runtime to the main UI thread.
///
/// The main thread owns the tray icon, the indicator window and the hotkey
/// manager (none of them are `Send`), so every mutation of those flows
/// through this enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    /// Update the tray icon to a new state.
    SetState(TrayIconState),
    /// Show live preview text in the tray tooltip; `None` clears it.
    SetPreview(Option<String>),
    /// Make the recording indicator visible.
    ShowIndicator,
    /// Hide the recording indicator.
    HideIndicator,
    /// Take input focus away from our own windows before injection.
    ReleaseFocus,
    /// Re-register global hotkeys from reloaded settings.
    RegisterHotkeys(HotkeyConfig),
    /// Shut down the application. The main thread will exit the event loop.
    Shutdown,
}

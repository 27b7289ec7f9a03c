use crate::{AppError, AppResult};

use std::panic::Location;

use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use error_location::ErrorLocation;

/// Returns the platform-specific paste modifier key.
///
/// macOS uses Cmd (Meta), Windows and Linux use Ctrl.
pub(crate) fn paste_modifier() -> Key {
    #[cfg(target_os = "macos")]
    {
        Key::Meta
    }
    #[cfg(not(target_os = "macos"))]
    {
        Key::Control
    }
}

/// Holds the paste modifier down for its lifetime.
///
/// The modifier is released on drop even when the keystroke in between
/// fails, so the user's keyboard is never left with Ctrl/Cmd stuck. A failed
/// release is ignored; the OS resets modifier state on the next physical key
/// event.
pub struct PasteKeyGuard {
    enigo: Enigo,
    modifier: Key,
}

impl PasteKeyGuard {
    /// Press the paste modifier and return a guard that will release it.
    #[track_caller]
    pub(crate) fn new() -> AppResult<Self> {
        let modifier = paste_modifier();

        let mut enigo =
            Enigo::new(&Settings::default()).map_err(|e| AppError::KeyboardFailed {
                reason: format!("Failed to create Enigo: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        enigo
            .key(modifier, Direction::Press)
            .map_err(|e| AppError::KeyboardFailed {
                reason: format!("Failed to press paste modifier: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self { enigo, modifier })
    }

    /// Tap `V` while the modifier is held.
    #[track_caller]
    pub(crate) fn tap_v(&mut self) -> AppResult<()> {
        self.enigo
            .key(Key::Unicode('v'), Direction::Click)
            .map_err(|e| AppError::KeyboardFailed {
                reason: format!("Failed to press V: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

impl Drop for PasteKeyGuard {
    fn drop(&mut self) {
        let _ = self.enigo.key(self.modifier, Direction::Release);
    }
}

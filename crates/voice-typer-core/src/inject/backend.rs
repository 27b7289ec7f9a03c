use crate::CoreResult;

/// Non-printing keys typed as discrete key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthKey {
    /// Enter / Return, for `\n`.
    Return,
    /// Tab, for `\t`.
    Tab,
}

/// System input-synthesis capability.
pub trait KeyboardBackend: Send {
    /// Type a whole string in one call.
    fn type_text(&mut self, text: &str) -> CoreResult<()>;
    /// Type a single printable character.
    fn type_char(&mut self, ch: char) -> CoreResult<()>;
    /// Tap a non-printing key.
    fn tap_key(&mut self, key: SynthKey) -> CoreResult<()>;
    /// Send the platform paste shortcut.
    fn paste(&mut self) -> CoreResult<()>;
}

/// System clipboard.
pub trait ClipboardBackend: Send {
    /// Replace the clipboard's text content.
    fn set_text(&mut self, text: &str) -> CoreResult<()>;
}

/// The host application's own windows.
///
/// They must not hold input focus while text is injected, or the text
/// lands in this application instead of the user's target.
pub trait HostWindows: Send {
    /// Hide or defocus every host window.
    fn hide(&mut self);
    /// Whether a host window currently holds input focus.
    fn has_focus(&self) -> bool;
}

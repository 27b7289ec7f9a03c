use crate::{
    CoreError, CoreResult,
    inject::{ClipboardBackend, KeyboardBackend, SynthKey},
};

use std::{fmt, panic::Location, time::Duration};

use error_location::ErrorLocation;

/// Which strategy delivered the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionMethod {
    /// Whole-string synthesized typing.
    TypedWhole,
    /// Character-by-character synthesized typing.
    TypedPerChar,
    /// Clipboard write followed by a paste keystroke.
    ClipboardPaste,
    /// Clipboard write only; the user has to paste.
    ClipboardOnly,
}

impl InjectionMethod {
    /// Whether the text reached the target without user action.
    pub fn is_automatic(&self) -> bool {
        !matches!(self, InjectionMethod::ClipboardOnly)
    }
}

impl fmt::Display for InjectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InjectionMethod::TypedWhole => "typed",
            InjectionMethod::TypedPerChar => "typed per character",
            InjectionMethod::ClipboardPaste => "clipboard + paste",
            InjectionMethod::ClipboardOnly => "clipboard only",
        };
        f.write_str(label)
    }
}

/// Backends a strategy may use.
pub(crate) struct Backends {
    pub(crate) keyboard: Option<Box<dyn KeyboardBackend>>,
    pub(crate) clipboard: Box<dyn ClipboardBackend>,
    pub(crate) typing_enabled: bool,
    pub(crate) clipboard_settle: Duration,
}

impl Backends {
    #[track_caller]
    fn typing_keyboard(&mut self) -> CoreResult<&mut Box<dyn KeyboardBackend>> {
        if !self.typing_enabled {
            return Err(CoreError::KeyboardUnavailable {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.keyboard_mut()
    }

    #[track_caller]
    fn keyboard_mut(&mut self) -> CoreResult<&mut Box<dyn KeyboardBackend>> {
        self.keyboard
            .as_mut()
            .ok_or_else(|| CoreError::KeyboardUnavailable {
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

pub(crate) type Strategy = fn(&mut Backends, &str) -> CoreResult<()>;

/// Strategies in the order they are attempted.
pub(crate) const STRATEGIES: [(InjectionMethod, Strategy); 4] = [
    (InjectionMethod::TypedWhole, type_whole),
    (InjectionMethod::TypedPerChar, type_per_char),
    (InjectionMethod::ClipboardPaste, clipboard_paste),
    (InjectionMethod::ClipboardOnly, clipboard_only),
];

fn type_whole(backends: &mut Backends, text: &str) -> CoreResult<()> {
    backends.typing_keyboard()?.type_text(text)
}

fn type_per_char(backends: &mut Backends, text: &str) -> CoreResult<()> {
    let keyboard = backends.typing_keyboard()?;

    for ch in text.chars() {
        match ch {
            '\n' => keyboard.tap_key(SynthKey::Return)?,
            '\t' => keyboard.tap_key(SynthKey::Tab)?,
            '\r' => {}
            _ => keyboard.type_char(ch)?,
        }
    }

    Ok(())
}

fn clipboard_paste(backends: &mut Backends, text: &str) -> CoreResult<()> {
    // Check first so a missing keyboard does not touch the clipboard twice.
    backends.keyboard_mut()?;
    backends.clipboard.set_text(text)?;

    if !backends.clipboard_settle.is_zero() {
        std::thread::sleep(backends.clipboard_settle);
    }

    backends.keyboard_mut()?.paste()
}

fn clipboard_only(backends: &mut Backends, text: &str) -> CoreResult<()> {
    backends.clipboard.set_text(text)
}

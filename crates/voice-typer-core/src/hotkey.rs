//! Key-combination descriptor shared by configuration, the OS hotkey
//! backend and the worker's `SET_HOLD_KEYS` command.

use crate::{CoreError, CoreResult};

use std::{fmt, panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// Normalized modifier set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Control (or Command-or-Control).
    pub ctrl: bool,
    /// Alt / Option.
    pub alt: bool,
    /// Shift.
    pub shift: bool,
    /// Windows / Super key.
    pub win: bool,
}

impl Modifiers {
    fn is_empty(&self) -> bool {
        !(self.ctrl || self.alt || self.shift || self.win)
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        [
            (self.ctrl, "ctrl"),
            (self.alt, "alt"),
            (self.shift, "shift"),
            (self.win, "win"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
    }
}

/// A global key combination: modifiers plus exactly one key.
///
/// Equality is structural, so `"Ctrl+Win+Space"` and `"super+control+space"`
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hotkey {
    modifiers: Modifiers,
    key: String,
}

impl Hotkey {
    /// Parse a user-facing combo string such as `Ctrl+Win+Space`.
    #[track_caller]
    pub fn parse(input: &str) -> CoreResult<Self> {
        let caller = Location::caller();
        let invalid = |reason: &str| CoreError::InvalidHotkey {
            input: input.to_string(),
            reason: reason.to_string(),
            location: ErrorLocation::from(caller),
        };

        let mut modifiers = Modifiers::default();
        let mut key: Option<String> = None;

        for token in input.split('+').map(|t| t.trim().to_ascii_lowercase()) {
            match token.as_str() {
                "" => return Err(invalid("empty key segment")),
                "ctrl" | "control" | "commandorcontrol" | "cmdorctrl" | "cmd" | "command" => {
                    modifiers.ctrl = true
                }
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "win" | "super" | "windows" | "meta" => modifiers.win = true,
                _ => {
                    if key.replace(token).is_some() {
                        return Err(invalid("more than one non-modifier key"));
                    }
                }
            }
        }

        let key = key.ok_or_else(|| invalid("missing non-modifier key"))?;

        if modifiers.is_empty() {
            return Err(invalid("global hotkeys need at least one modifier"));
        }

        Ok(Self { modifiers, key })
    }

    /// The modifier set.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// The non-modifier key, lowercase.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Lowercase `+`-joined spelling understood by the worker, e.g.
    /// `ctrl+win+space`.
    pub fn worker_combo(&self) -> String {
        self.modifiers
            .names()
            .chain(std::iter::once(self.key.as_str()))
            .collect::<Vec<_>>()
            .join("+")
    }

    /// Spelling accepted by the OS hotkey backend (`super` instead of `win`).
    pub fn registration_string(&self) -> String {
        self.modifiers
            .names()
            .map(|name| if name == "win" { "super" } else { name })
            .chain(std::iter::once(self.key.as_str()))
            .collect::<Vec<_>>()
            .join("+")
    }
}

impl FromStr for Hotkey {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        Hotkey::parse(s)
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.modifiers.names().map(capitalize).collect();
        parts.push(capitalize(&self.key));
        f.write_str(&parts.join("+"))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

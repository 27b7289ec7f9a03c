use crate::{
    AppResult, HotkeyRole,
    config::{
        DEFAULT_HOLD_HOTKEY, DEFAULT_PASTE_LAST_HOTKEY, DEFAULT_TOGGLE_HOTKEY,
        default_hold_hotkey, default_paste_last_hotkey, default_toggle_hotkey,
    },
};

use serde::{Deserialize, Serialize};
use tracing::warn;
use voice_typer_core::Hotkey;

/// Global hotkey combos, as the user wrote them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeyConfig {
    /// Record while held.
    #[serde(default = "default_hold_hotkey")]
    pub hold: String,

    /// Start or stop a recording.
    #[serde(default = "default_toggle_hotkey")]
    pub toggle: String,

    /// Re-inject the newest transcript.
    #[serde(default = "default_paste_last_hotkey")]
    pub paste_last: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            hold: default_hold_hotkey(),
            toggle: default_toggle_hotkey(),
            paste_last: default_paste_last_hotkey(),
        }
    }
}

impl HotkeyConfig {
    /// Configured string for `role`.
    pub fn combo(&self, role: HotkeyRole) -> &str {
        match role {
            HotkeyRole::Hold => &self.hold,
            HotkeyRole::Toggle => &self.toggle,
            HotkeyRole::PasteLast => &self.paste_last,
        }
    }

    /// Parsed combo for `role`, falling back to the built-in default when
    /// the configured string is malformed.
    #[track_caller]
    pub fn hotkey(&self, role: HotkeyRole) -> AppResult<Hotkey> {
        let value = self.combo(role);

        match Hotkey::parse(value) {
            Ok(hotkey) => Ok(hotkey),
            Err(e) => {
                warn!(%role, value, error = %e, "Invalid hotkey in config, using default");
                let fallback = match role {
                    HotkeyRole::Hold => DEFAULT_HOLD_HOTKEY,
                    HotkeyRole::Toggle => DEFAULT_TOGGLE_HOTKEY,
                    HotkeyRole::PasteLast => DEFAULT_PASTE_LAST_HOTKEY,
                };
                Ok(Hotkey::parse(fallback)?)
            }
        }
    }
}

use crate::config::{default_auto_type, default_clipboard_settle_ms, default_focus_settle_ms};

use std::time::Duration;

use serde::{Deserialize, Serialize};
use voice_typer_core::inject::InjectorSettings;

/// Application behavior configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Type final transcripts into the focused window. When false the text
    /// is pasted, or left on the clipboard if pasting is impossible.
    #[serde(default = "default_auto_type")]
    pub auto_type: bool,

    /// Milliseconds to wait after hiding our windows before injecting.
    #[serde(default = "default_focus_settle_ms")]
    pub focus_settle_ms: u64,

    /// Milliseconds between the clipboard write and the paste keystroke.
    #[serde(default = "default_clipboard_settle_ms")]
    pub clipboard_settle_ms: u64,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            auto_type: default_auto_type(),
            focus_settle_ms: default_focus_settle_ms(),
            clipboard_settle_ms: default_clipboard_settle_ms(),
        }
    }
}

impl BehaviourConfig {
    /// Injector tuning derived from these settings.
    pub fn injector_settings(&self) -> InjectorSettings {
        InjectorSettings {
            typing_enabled: self.auto_type,
            focus_settle: Duration::from_millis(self.focus_settle_ms),
            clipboard_settle: Duration::from_millis(self.clipboard_settle_ms),
        }
    }
}

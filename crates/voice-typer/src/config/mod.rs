mod behaviour_config;
#[allow(clippy::module_inception)]
mod config;
mod hotkey_config;
mod indicator_state;
mod position_store;
mod worker_config;

pub(crate) use {
    behaviour_config::BehaviourConfig, config::Config, hotkey_config::HotkeyConfig,
    indicator_state::IndicatorState, position_store::StatePositionStore,
    worker_config::WorkerConfig,
};

pub(crate) const DEFAULT_HOLD_HOTKEY: &str = "Ctrl+Win+Space";
pub(crate) const DEFAULT_TOGGLE_HOTKEY: &str = "Ctrl+Shift+Space";
pub(crate) const DEFAULT_PASTE_LAST_HOTKEY: &str = "Alt+Shift+Z";
pub(crate) const DEFAULT_AUTO_TYPE: bool = true;
pub(crate) const DEFAULT_FOCUS_SETTLE_MS: u64 = 100;
pub(crate) const DEFAULT_CLIPBOARD_SETTLE_MS: u64 = 50;
pub(crate) const WORKER_SCRIPT: &str = "whisper_service.py";

#[cfg(windows)]
pub(crate) const DEFAULT_WORKER_PROGRAM: &str = "python";
#[cfg(not(windows))]
pub(crate) const DEFAULT_WORKER_PROGRAM: &str = "python3";

pub(crate) fn default_hold_hotkey() -> String {
    DEFAULT_HOLD_HOTKEY.to_string()
}

pub(crate) fn default_toggle_hotkey() -> String {
    DEFAULT_TOGGLE_HOTKEY.to_string()
}

pub(crate) fn default_paste_last_hotkey() -> String {
    DEFAULT_PASTE_LAST_HOTKEY.to_string()
}

pub(crate) fn default_auto_type() -> bool {
    DEFAULT_AUTO_TYPE
}

pub(crate) fn default_focus_settle_ms() -> u64 {
    DEFAULT_FOCUS_SETTLE_MS
}

pub(crate) fn default_clipboard_settle_ms() -> u64 {
    DEFAULT_CLIPBOARD_SETTLE_MS
}

pub(crate) fn default_worker_program() -> String {
    DEFAULT_WORKER_PROGRAM.to_string()
}

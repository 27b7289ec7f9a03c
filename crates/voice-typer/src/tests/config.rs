use crate::{
    HotkeyRole,
    config::{BehaviourConfig, Config, HotkeyConfig, IndicatorState, StatePositionStore},
};

use std::{fs, time::Duration};

use tempfile::TempDir;
use voice_typer_core::indicator::{IndicatorPosition, PositionStore};

/// WHAT: Default config survives a TOML round trip
/// WHY: The file written on first launch must load back unchanged
#[test]
#[allow(clippy::unwrap_used)]
fn given_default_config_when_serialized_then_round_trips() {
    // Given: The default config
    let config = Config::default();

    // When: Serializing and parsing it again
    let text = toml::to_string_pretty(&config).unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();

    // Then: Nothing changed and the documented defaults are present
    assert_eq!(parsed, config);
    assert_eq!(parsed.hotkeys.hold, "Ctrl+Win+Space");
    assert_eq!(parsed.hotkeys.toggle, "Ctrl+Shift+Space");
    assert_eq!(parsed.hotkeys.paste_last, "Alt+Shift+Z");
    assert!(parsed.behavior.auto_type);
}

/// WHAT: Missing keys and tables take their defaults
/// WHY: Users edit the file by hand and delete what they do not need
#[test]
#[allow(clippy::unwrap_used)]
fn given_partial_file_when_loading_then_defaults_fill_gaps() {
    // Given: A file that only sets the toggle combo, plus a stale table
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "[hotkeys]\ntoggle = \"Alt+Space\"\n\n[indicator]\nx = 10\ny = 20\n",
    )
    .unwrap();

    // When: Loading it
    let config = Config::load_from(&path).unwrap();

    // Then: The given values win and everything else is default
    assert_eq!(config.hotkeys.toggle, "Alt+Space");
    assert_eq!(config.hotkeys.hold, "Ctrl+Win+Space");
    assert_eq!(config.behavior, BehaviourConfig::default());
}

/// WHAT: Loading a missing file does not create it
/// WHY: Only the first-launch path should write a default file
#[test]
#[allow(clippy::unwrap_used)]
fn given_missing_file_when_loading_from_then_defaults_without_write() {
    // Given: A path with no file
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    // When: Loading it
    let config = Config::load_from(&path).unwrap();

    // Then: Defaults are returned and the file still does not exist
    assert_eq!(config, Config::default());
    assert!(!path.exists());
}

/// WHAT: A malformed file is an error
/// WHY: The caller decides whether to fall back to defaults
#[test]
#[allow(clippy::unwrap_used)]
fn given_malformed_file_when_loading_then_config_error() {
    // Given: A file that is not TOML
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[hotkeys\nhold = ").unwrap();

    // When: Loading it
    let result = Config::load_from(&path);

    // Then: A config error is reported
    assert!(matches!(result, Err(crate::AppError::ConfigError { .. })));
}

/// WHAT: Saving the indicator position leaves config.toml byte for byte
/// WHY: Rewriting the user's file on every drag would strip their comments
#[test]
#[allow(clippy::unwrap_used)]
fn given_commented_config_when_position_saved_then_config_untouched() {
    // Given: A hand-written config with a comment, and a state file beside it
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    let state_path = dir.path().join("indicator.toml");
    let written = "# my dictation keys\n[hotkeys]\nhold = \"Alt+Shift+H\"\n";
    fs::write(&config_path, written).unwrap();

    // When: The indicator position is saved through the store
    let mut store = StatePositionStore::new(state_path.clone());
    store.save(IndicatorPosition::new(-300, 40)).unwrap();

    // Then: The config is unchanged and the position reads back
    assert_eq!(fs::read_to_string(&config_path).unwrap(), written);
    assert_eq!(store.load(), Some(IndicatorPosition::new(-300, 40)));
    assert_eq!(
        IndicatorState::load_from(&state_path).unwrap().position(),
        Some(IndicatorPosition::new(-300, 40))
    );
    assert!(!dir.path().join("indicator.toml.tmp").exists());
}

/// WHAT: A corrupt state file is replaced on the next save
/// WHY: A bad file must not pin the indicator to the centre forever
#[test]
#[allow(clippy::unwrap_used)]
fn given_corrupt_state_file_when_position_saved_then_replaced() {
    // Given: A state file that is not TOML
    let dir = TempDir::new().unwrap();
    let state_path = dir.path().join("indicator.toml");
    fs::write(&state_path, "x = [").unwrap();
    let mut store = StatePositionStore::new(state_path);
    assert_eq!(store.load(), None);

    // When: A position is saved
    store.save(IndicatorPosition::new(12, 34)).unwrap();

    // Then: It loads back
    assert_eq!(store.load(), Some(IndicatorPosition::new(12, 34)));
}

/// WHAT: A malformed combo falls back to the role's default
/// WHY: A typo must not leave the user without a way to dictate
#[test]
#[allow(clippy::unwrap_used)]
fn given_malformed_hotkey_when_resolving_then_default_used() {
    // Given: A hold combo with no key
    let config = HotkeyConfig {
        hold: "Ctrl+".to_string(),
        ..HotkeyConfig::default()
    };

    // When: Resolving each role
    let hold = config.hotkey(HotkeyRole::Hold).unwrap();
    let toggle = config.hotkey(HotkeyRole::Toggle).unwrap();

    // Then: Hold falls back, toggle is untouched
    assert_eq!(hold.worker_combo(), "ctrl+win+space");
    assert_eq!(toggle.worker_combo(), "ctrl+shift+space");
}

/// WHAT: Behavior settings map onto injector settings
/// WHY: Millisecond values in the file must become real delays
#[test]
fn given_behaviour_when_converting_then_injector_settings_match() {
    // Given: Custom behavior
    let behaviour = BehaviourConfig {
        auto_type: false,
        focus_settle_ms: 250,
        clipboard_settle_ms: 75,
    };

    // When: Converting
    let settings = behaviour.injector_settings();

    // Then: Every field carries over
    assert!(!settings.typing_enabled);
    assert_eq!(settings.focus_settle, Duration::from_millis(250));
    assert_eq!(settings.clipboard_settle, Duration::from_millis(75));
}

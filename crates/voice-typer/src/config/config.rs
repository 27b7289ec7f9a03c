//! Configuration management for voice-typer.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{BehaviourConfig, HotkeyConfig, WorkerConfig},
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

const HISTORY_FILE: &str = "history.json";
const STATE_FILE: &str = "indicator.toml";

/// Main configuration struct.
///
/// Every table is optional in the file; missing keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Global hotkey combos.
    #[serde(default)]
    pub hotkeys: HotkeyConfig,
    /// Transcription worker launch line.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Injection behavior.
    #[serde(default)]
    pub behavior: BehaviourConfig,
}

impl Config {
    /// Load configuration from the platform config directory, creating a
    /// default file if none exists.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let config = Self::load_from(&config_path)?;
            info!(config_path = ?config_path, "Configuration loaded");
            Ok(config)
        } else {
            info!("No config found, creating default");
            Self::create_default(&config_path)
        }
    }

    /// Read the file at `path`. A missing file yields the defaults and is
    /// not created.
    #[track_caller]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Save to `path` using the atomic write pattern.
    #[track_caller]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        write_atomic(path, &contents)?;
        debug!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Location of `config.toml`, creating its directory if needed.
    #[track_caller]
    pub fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Location of the indicator state file, kept apart from `config.toml`
    /// so that saving a window position never rewrites the user's file.
    #[track_caller]
    pub fn state_path() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join(STATE_FILE))
    }

    /// Location of the transcript history file.
    #[track_caller]
    pub fn history_path() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join(HISTORY_FILE))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "voice-typer", "Voice-Typer").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }

    #[track_caller]
    fn create_default(config_path: &Path) -> AppResult<Self> {
        let data_dir = Self::project_dirs()?.data_dir().to_path_buf();

        let config = Config {
            worker: WorkerConfig::in_data_dir(&data_dir),
            ..Config::default()
        };

        config.save_to(config_path)?;

        warn!(
            worker = ?config.worker.args,
            "Default config created. The transcription worker script must be installed before recording."
        );

        Ok(config)
    }
}

/// Write `contents` to a temporary file next to `path`, then rename it into
/// place so a crash never leaves a torn file.
#[track_caller]
pub(crate) fn write_atomic(path: &Path, contents: &str) -> AppResult<()> {
    let caller = Location::caller();
    let write_err = |action: &str, e: std::io::Error| AppError::ConfigError {
        reason: format!("Failed to {} {}: {}", action, path.display(), e),
        location: ErrorLocation::from(caller),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| write_err("create directory for", e))?;
    }

    let mut temp_name = path.as_os_str().to_os_string();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let mut temp_file =
        fs::File::create(&temp_path).map_err(|e| write_err("create temp file for", e))?;
    temp_file
        .write_all(contents.as_bytes())
        .map_err(|e| write_err("write temp file for", e))?;
    temp_file
        .sync_all()
        .map_err(|e| write_err("sync temp file for", e))?;
    fs::rename(&temp_path, path).map_err(|e| write_err("replace", e))?;

    Ok(())
}

use crate::{AppError, AppResult, config::config::write_atomic};

use std::{fs, panic::Location, path::Path};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use voice_typer_core::indicator::IndicatorPosition;

/// Remembered indicator placement, in physical pixels.
///
/// Lives in its own file next to the history, not in `config.toml`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorState {
    /// Left edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    /// Top edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
}

impl IndicatorState {
    /// Read the file at `path`. A missing file is an empty state.
    #[track_caller]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;

        toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse indicator state: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Replace the file at `path`.
    #[track_caller]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize indicator state: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        write_atomic(path, &contents)
    }

    /// The saved position, if both coordinates are present.
    pub fn position(&self) -> Option<IndicatorPosition> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(IndicatorPosition::new(x, y)),
            _ => None,
        }
    }

    /// Remember `position`.
    pub fn set_position(&mut self, position: IndicatorPosition) {
        self.x = Some(position.x);
        self.y = Some(position.y);
    }
}

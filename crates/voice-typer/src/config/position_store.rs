use crate::config::IndicatorState;

use std::{panic::Location, path::PathBuf};

use error_location::ErrorLocation;
use tracing::debug;
use voice_typer_core::{
    CoreError, CoreResult,
    indicator::{IndicatorPosition, PositionStore},
};

/// Keeps the indicator position in a small state file of its own, so the
/// user's hand-edited `config.toml` is never rewritten by a window drag.
pub struct StatePositionStore {
    path: PathBuf,
}

impl StatePositionStore {
    /// Store backed by the state file at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PositionStore for StatePositionStore {
    fn load(&self) -> Option<IndicatorPosition> {
        match IndicatorState::load_from(&self.path) {
            Ok(state) => state.position(),
            Err(e) => {
                debug!(error = %e, "No saved indicator position");
                None
            }
        }
    }

    #[track_caller]
    fn save(&mut self, position: IndicatorPosition) -> CoreResult<()> {
        let caller = Location::caller();
        let store_err = |reason: String| CoreError::PositionStore {
            reason,
            location: ErrorLocation::from(caller),
        };

        let mut state = IndicatorState::load_from(&self.path).unwrap_or_default();

        if state.position() == Some(position) {
            return Ok(());
        }

        state.set_position(position);
        state
            .save_to(&self.path)
            .map_err(|e| store_err(e.to_string()))?;

        debug!(x = position.x, y = position.y, "Indicator position saved");

        Ok(())
    }
}

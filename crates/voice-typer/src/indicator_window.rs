//! The recording indicator window.
//!
//! A small undecorated, always-on-top tao window. It lives on the main
//! thread; the session toggles it through [`ProxyIndicator`].

use crate::{AppError, AppResult, UiCommand};

use std::panic::Location;

use error_location::ErrorLocation;
use tao::{
    dpi::{LogicalSize, PhysicalPosition},
    event_loop::{EventLoopProxy, EventLoopWindowTarget},
    window::{Window, WindowBuilder},
};
use tracing::{debug, info, instrument};
use voice_typer_core::{
    indicator::{IndicatorPosition, IndicatorSize, IndicatorSurface, WorkArea},
    session::IndicatorPort,
};

/// Indicator width in logical pixels.
pub const INDICATOR_WIDTH: f64 = 150.0;
/// Indicator height in logical pixels.
pub const INDICATOR_HEIGHT: f64 = 32.0;

/// Create the hidden indicator window.
#[track_caller]
#[instrument(skip(target))]
pub fn build_indicator_window(target: &EventLoopWindowTarget<UiCommand>) -> AppResult<Window> {
    let window = WindowBuilder::new()
        .with_title("Voice Typer")
        .with_inner_size(LogicalSize::new(INDICATOR_WIDTH, INDICATOR_HEIGHT))
        .with_decorations(false)
        .with_resizable(false)
        .with_always_on_top(true)
        .with_focused(false)
        .with_visible(false)
        .build(target)
        .map_err(|e| AppError::WindowError {
            reason: format!("Failed to create indicator window: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    info!("Indicator window created");

    Ok(window)
}

/// [`IndicatorSurface`] over a tao window.
pub struct TaoIndicatorSurface {
    window: Window,
}

impl TaoIndicatorSurface {
    /// Take ownership of the indicator window.
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    /// The underlying window, for event routing and dragging.
    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl IndicatorSurface for TaoIndicatorSurface {
    fn set_visible(&mut self, visible: bool) {
        self.window.set_visible(visible);
    }

    fn position(&self) -> Option<IndicatorPosition> {
        self.window
            .outer_position()
            .ok()
            .map(|pos| IndicatorPosition::new(pos.x, pos.y))
    }

    fn set_position(&mut self, position: IndicatorPosition) {
        self.window
            .set_outer_position(PhysicalPosition::new(position.x, position.y));
    }

    fn size(&self) -> IndicatorSize {
        let size = self.window.outer_size();
        IndicatorSize {
            width: size.width,
            height: size.height,
        }
    }

    fn work_area(&self) -> Option<WorkArea> {
        let monitor = self
            .window
            .current_monitor()
            .or_else(|| self.window.primary_monitor())?;

        let position = monitor.position();
        let size = monitor.size();

        debug!(
            x = position.x,
            y = position.y,
            width = size.width,
            height = size.height,
            "Indicator display bounds"
        );

        Some(WorkArea {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        })
    }
}

/// Session-side indicator that forwards to the main thread.
pub struct ProxyIndicator {
    proxy: EventLoopProxy<UiCommand>,
}

impl ProxyIndicator {
    /// Forward through `proxy`.
    pub fn new(proxy: EventLoopProxy<UiCommand>) -> Self {
        Self { proxy }
    }
}

impl IndicatorPort for ProxyIndicator {
    fn show(&mut self) {
        let _ = self.proxy.send_event(UiCommand::ShowIndicator);
    }

    fn hide(&mut self) {
        let _ = self.proxy.send_event(UiCommand::HideIndicator);
    }
}

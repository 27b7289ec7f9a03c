use crate::{
    indicator::{IndicatorPosition, IndicatorSize, PositionStore, WorkArea},
    session::IndicatorPort,
};

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

/// Quiet period after the last move before the position is written.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

/// The platform window behind the indicator.
pub trait IndicatorSurface {
    /// Show or hide the window.
    fn set_visible(&mut self, visible: bool);
    /// Current top-left corner, if the platform reports one.
    fn position(&self) -> Option<IndicatorPosition>;
    /// Move the window.
    fn set_position(&mut self, position: IndicatorPosition);
    /// Outer window size.
    fn size(&self) -> IndicatorSize;
    /// Work area of the display the window is on.
    fn work_area(&self) -> Option<WorkArea>;
}

/// Keeps the indicator window in step with the recording state and
/// remembers where the user dragged it.
pub struct IndicatorController<S, P> {
    surface: S,
    store: P,
    visible: bool,
    moved_to: Option<IndicatorPosition>,
    save_due: Option<Instant>,
}

impl<S: IndicatorSurface, P: PositionStore> IndicatorController<S, P> {
    /// Take ownership of a freshly created, hidden window and place it.
    ///
    /// A saved position is reused only if the whole window fits in the
    /// current work area; otherwise the window is centred and the centred
    /// position saved.
    pub fn new(surface: S, store: P) -> Self {
        let mut controller = Self {
            surface,
            store,
            visible: false,
            moved_to: None,
            save_due: None,
        };
        controller.place();
        controller
    }

    fn place(&mut self) {
        let size = self.surface.size();
        let saved = self.store.load();

        let Some(area) = self.surface.work_area() else {
            if let Some(position) = saved {
                self.surface.set_position(position);
            }
            return;
        };

        match saved {
            Some(position) if area.contains(position, size) => {
                debug!(?position, "Restoring indicator position");
                self.surface.set_position(position);
            }
            _ => {
                if saved.is_some() {
                    info!("Saved indicator position is out of bounds, centering");
                }
                let centered = area.centered(size);
                self.surface.set_position(centered);
                self.write(centered);
            }
        }
    }

    /// Whether the indicator is currently shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show the indicator. Returns `false` if it was already visible.
    pub fn show(&mut self) -> bool {
        if self.visible {
            return false;
        }
        self.surface.set_visible(true);
        self.visible = true;
        true
    }

    /// Hide the indicator and save its position. Returns `false` if it was
    /// already hidden.
    pub fn hide(&mut self) -> bool {
        if !self.visible {
            return false;
        }
        self.surface.set_visible(false);
        self.visible = false;
        self.save_now();
        true
    }

    /// The window was moved; schedule a debounced save.
    pub fn on_moved(&mut self, position: IndicatorPosition, now: Instant) {
        self.moved_to = Some(position);
        self.save_due = Some(now + SAVE_DEBOUNCE);
    }

    /// Perform a save whose quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) {
        if self.save_due.is_some_and(|due| now >= due) {
            self.save_now();
        }
    }

    /// When [`poll`](Self::poll) next needs to run.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.save_due
    }

    /// The window is closing; save immediately.
    pub fn close(&mut self) {
        self.save_now();
    }

    /// Borrow the platform window.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn save_now(&mut self) {
        self.save_due = None;
        let position = self.moved_to.take().or_else(|| self.surface.position());
        if let Some(position) = position {
            self.write(position);
        }
    }

    fn write(&mut self, position: IndicatorPosition) {
        match self.store.save(position) {
            Ok(()) => debug!(x = position.x, y = position.y, "Indicator position saved"),
            Err(e) => warn!(error = %e, "Failed to save indicator position"),
        }
    }
}

impl<S, P> IndicatorPort for IndicatorController<S, P>
where
    S: IndicatorSurface + Send,
    P: PositionStore + Send,
{
    fn show(&mut self) {
        IndicatorController::show(self);
    }

    fn hide(&mut self) {
        IndicatorController::hide(self);
    }
}

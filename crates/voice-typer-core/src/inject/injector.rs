use crate::inject::{
    ClipboardBackend, HostWindows, InjectionMethod, KeyboardBackend,
    strategy::{Backends, STRATEGIES},
};

use std::time::Duration;

use tracing::{debug, info, instrument, warn};

/// Tunable delays and switches for [`TextInjector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InjectorSettings {
    /// Try synthesized typing before falling back to the clipboard.
    pub typing_enabled: bool,
    /// Wait after hiding host windows so OS focus can move back to the
    /// user's target.
    pub focus_settle: Duration,
    /// Wait between the clipboard write and the paste keystroke.
    pub clipboard_settle: Duration,
}

impl Default for InjectorSettings {
    fn default() -> Self {
        Self {
            typing_enabled: true,
            focus_settle: Duration::from_millis(100),
            clipboard_settle: Duration::from_millis(50),
        }
    }
}

/// Result of one injection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionOutcome {
    /// Input was empty after trimming; nothing happened.
    Empty,
    /// A strategy succeeded.
    Delivered(InjectionMethod),
    /// Every strategy failed, including the clipboard.
    Failed,
}

impl InjectionOutcome {
    /// Whether the text reached the target without user action.
    pub fn is_automatic(&self) -> bool {
        matches!(self, InjectionOutcome::Delivered(method) if method.is_automatic())
    }
}

/// Types or pastes final transcripts into the focused application.
///
/// Blocking: run it on a blocking thread, never on the session loop.
pub struct TextInjector {
    backends: Backends,
    host: Box<dyn HostWindows>,
    focus_settle: Duration,
}

impl TextInjector {
    /// Build an injector. `keyboard` is `None` when no input-synthesis
    /// backend could be created.
    pub fn new(
        keyboard: Option<Box<dyn KeyboardBackend>>,
        clipboard: Box<dyn ClipboardBackend>,
        host: Box<dyn HostWindows>,
        settings: InjectorSettings,
    ) -> Self {
        Self {
            backends: Backends {
                keyboard,
                clipboard,
                typing_enabled: settings.typing_enabled,
                clipboard_settle: settings.clipboard_settle,
            },
            host,
            focus_settle: settings.focus_settle,
        }
    }

    /// Replace delays and the typing switch, e.g. after a settings reload.
    pub fn apply_settings(&mut self, settings: InjectorSettings) {
        self.backends.typing_enabled = settings.typing_enabled;
        self.backends.clipboard_settle = settings.clipboard_settle;
        self.focus_settle = settings.focus_settle;
    }

    /// Inject `text`; `true` when it reached the target automatically.
    pub fn inject(&mut self, text: &str) -> bool {
        self.inject_with_outcome(text).is_automatic()
    }

    /// Inject `text` and report which strategy won.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn inject_with_outcome(&mut self, text: &str) -> InjectionOutcome {
        if text.trim().is_empty() {
            debug!("Nothing to inject");
            return InjectionOutcome::Empty;
        }

        self.release_focus();

        let mut delivered = None;
        for (method, strategy) in STRATEGIES {
            match strategy(&mut self.backends, text) {
                Ok(()) => {
                    delivered = Some(method);
                    break;
                }
                Err(e) => warn!(%method, error = %e, "Injection strategy failed"),
            }
        }

        let Some(method) = delivered else {
            warn!("All injection strategies failed");
            return InjectionOutcome::Failed;
        };

        // The clipboard strategies already left the text there.
        let typed = matches!(
            method,
            InjectionMethod::TypedWhole | InjectionMethod::TypedPerChar
        );
        if typed {
            if let Err(e) = self.backends.clipboard.set_text(text) {
                warn!(error = %e, "Failed to leave recovery copy on clipboard");
            }
        }

        info!(%method, "Text injected");

        InjectionOutcome::Delivered(method)
    }

    fn release_focus(&mut self) {
        self.host.hide();
        settle(self.focus_settle);

        if self.host.has_focus() {
            debug!("Host window still focused, hiding again");
            self.host.hide();
            settle(self.focus_settle);
        }
    }
}

fn settle(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}

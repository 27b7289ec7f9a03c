//! System backends for text injection.
//!
//! Keyboard synthesis goes through enigo, the clipboard through arboard.
//! [`InjectorOutput`] is what the session hands final transcripts to: it
//! runs the blocking [`TextInjector`] off the session loop.

use crate::{PasteKeyGuard, UiCommand};

use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use arboard::Clipboard;
use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use error_location::ErrorLocation;
use tao::event_loop::EventLoopProxy;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, info, instrument, warn};
use voice_typer_core::{
    CoreError, CoreResult,
    inject::{
        ClipboardBackend, HostWindows, InjectionOutcome, KeyboardBackend, SynthKey, TextInjector,
    },
    session::{Notification, TranscriptOutput},
};

/// Gap around the paste keystroke. Some applications and input method
/// editors drop key events that arrive back to back.
const KEY_EVENT_DELAY: Duration = Duration::from_millis(10);

#[track_caller]
fn typing_failed(reason: String) -> CoreError {
    CoreError::TypingFailed {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}

/// Keyboard synthesis through enigo.
///
/// Enigo is not `Send`, so each operation creates its own instance on the
/// calling (blocking) thread.
pub struct EnigoKeyboard;

impl EnigoKeyboard {
    /// `Some` if input synthesis works on this desktop.
    #[instrument]
    pub fn probe() -> Option<Self> {
        match Enigo::new(&Settings::default()) {
            Ok(_) => Some(Self),
            Err(e) => {
                warn!(error = %e, "Keyboard synthesis unavailable, clipboard only");
                None
            }
        }
    }

    #[track_caller]
    fn enigo() -> CoreResult<Enigo> {
        Enigo::new(&Settings::default()).map_err(|e| typing_failed(e.to_string()))
    }

    fn click(key: Key) -> CoreResult<()> {
        Self::enigo()?
            .key(key, Direction::Click)
            .map_err(|e| typing_failed(e.to_string()))
    }
}

impl KeyboardBackend for EnigoKeyboard {
    fn type_text(&mut self, text: &str) -> CoreResult<()> {
        Self::enigo()?
            .text(text)
            .map_err(|e| typing_failed(e.to_string()))
    }

    fn type_char(&mut self, ch: char) -> CoreResult<()> {
        Self::click(Key::Unicode(ch))
    }

    fn tap_key(&mut self, key: SynthKey) -> CoreResult<()> {
        match key {
            SynthKey::Return => Self::click(Key::Return),
            SynthKey::Tab => Self::click(Key::Tab),
        }
    }

    #[track_caller]
    fn paste(&mut self) -> CoreResult<()> {
        let caller = Location::caller();
        let paste_err = |e: crate::AppError| CoreError::PasteFailed {
            reason: e.to_string(),
            location: ErrorLocation::from(caller),
        };

        let mut guard = PasteKeyGuard::new().map_err(paste_err)?;

        std::thread::sleep(KEY_EVENT_DELAY);
        guard.tap_v().map_err(paste_err)?;
        std::thread::sleep(KEY_EVENT_DELAY);

        // Guard drops here and releases the modifier.
        debug!("Paste keystroke sent");

        Ok(())
    }
}

/// The system clipboard through arboard.
///
/// The handle is created on first use and kept: on X11 the contents vanish
/// when the owning handle is dropped.
#[derive(Default)]
pub struct SystemClipboard {
    clipboard: Option<Clipboard>,
}

impl SystemClipboard {
    /// A clipboard that connects lazily.
    pub fn new() -> Self {
        Self::default()
    }

    #[track_caller]
    fn handle(&mut self) -> CoreResult<&mut Clipboard> {
        if self.clipboard.is_none() {
            let clipboard = Clipboard::new().map_err(|e| CoreError::ClipboardFailed {
                reason: format!("Failed to initialize clipboard: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
            self.clipboard = Some(clipboard);
        }

        self.clipboard
            .as_mut()
            .ok_or_else(|| CoreError::ClipboardFailed {
                reason: "clipboard handle missing".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

impl ClipboardBackend for SystemClipboard {
    #[track_caller]
    fn set_text(&mut self, text: &str) -> CoreResult<()> {
        let result = self.handle()?.set_text(text);

        if let Err(e) = result {
            // A stale connection is reopened on the next call.
            self.clipboard = None;
            return Err(CoreError::ClipboardFailed {
                reason: format!("Failed to set clipboard: {}", e),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        debug!(text_len = text.len(), "Text copied to clipboard");

        Ok(())
    }
}

/// Our own windows, as seen by the injector.
///
/// Hiding is delegated to the main thread; focus is tracked there from
/// window events and read here.
pub struct ProxyHostWindows {
    proxy: EventLoopProxy<UiCommand>,
    focused: Arc<AtomicBool>,
}

impl ProxyHostWindows {
    /// `focused` must be kept current by the main thread.
    pub fn new(proxy: EventLoopProxy<UiCommand>, focused: Arc<AtomicBool>) -> Self {
        Self { proxy, focused }
    }
}

impl HostWindows for ProxyHostWindows {
    fn hide(&mut self) {
        if self.proxy.send_event(UiCommand::ReleaseFocus).is_err() {
            debug!("Event loop closed, nothing to hide");
        }
    }

    fn has_focus(&self) -> bool {
        self.focused.load(Ordering::SeqCst)
    }
}

/// Whether an injection outcome leaves work for the user.
pub fn needs_attention(outcome: InjectionOutcome) -> bool {
    match outcome {
        InjectionOutcome::Empty => false,
        InjectionOutcome::Delivered(method) => !method.is_automatic(),
        InjectionOutcome::Failed => true,
    }
}

/// Session output that injects on a blocking thread.
///
/// Transcripts go through one channel to one task, which injects them
/// strictly in delivery order. The mutex is shared with settings reload.
pub struct InjectorOutput {
    queue: mpsc::UnboundedSender<String>,
}

impl InjectorOutput {
    /// Start the injection task. Must be called inside a tokio runtime.
    pub fn spawn(
        injector: Arc<Mutex<TextInjector>>,
        notifications: mpsc::UnboundedSender<Notification>,
    ) -> Self {
        let (queue, pending) = mpsc::unbounded_channel();
        tokio::spawn(run_injections(injector, pending, notifications));
        Self { queue }
    }
}

impl TranscriptOutput for InjectorOutput {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    fn deliver(&mut self, text: String) {
        if self.queue.send(text).is_err() {
            warn!("Injection task stopped, transcript left undelivered");
        }
    }
}

async fn run_injections(
    injector: Arc<Mutex<TextInjector>>,
    mut pending: mpsc::UnboundedReceiver<String>,
    notifications: mpsc::UnboundedSender<Notification>,
) {
    while let Some(text) = pending.recv().await {
        let injector = Arc::clone(&injector);
        let injected =
            tokio::task::spawn_blocking(move || injector.blocking_lock().inject_with_outcome(&text))
                .await;

        match injected {
            Ok(outcome) if needs_attention(outcome) => {
                info!(?outcome, "Text left on clipboard for manual paste");
                let _ = notifications.send(Notification::InjectionIncomplete);
            }
            Ok(outcome) => debug!(?outcome, "Transcript injected"),
            Err(e) => {
                error!(error = %e, "Injection task panicked");
                let _ = notifications.send(Notification::InjectionIncomplete);
            }
        }
    }

    debug!("Injection queue closed");
}

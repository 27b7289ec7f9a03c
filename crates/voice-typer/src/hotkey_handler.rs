//! Global hotkey registration and press forwarding.
//!
//! Registration happens on the main thread (the platform needs its message
//! pump); presses are forwarded to the session loop as [`AppCommand`]s by
//! [`HotkeyHandler`], which can live on any thread.

use crate::{AppCommand, AppError, AppResult, config::HotkeyConfig};

use std::{collections::HashMap, fmt, panic::Location, str::FromStr, time::Duration};

use error_location::ErrorLocation;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState, hotkey::HotKey};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};
use voice_typer_core::{Hotkey, session::Notification};

/// What a registered combo does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyRole {
    /// Record while held.
    Hold,
    /// Start or stop a recording.
    Toggle,
    /// Re-inject the newest transcript.
    PasteLast,
}

impl HotkeyRole {
    /// Every role, in registration order.
    pub const ALL: [HotkeyRole; 3] = [HotkeyRole::Hold, HotkeyRole::Toggle, HotkeyRole::PasteLast];
}

impl fmt::Display for HotkeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HotkeyRole::Hold => "hold",
            HotkeyRole::Toggle => "toggle",
            HotkeyRole::PasteLast => "paste_last",
        };
        f.write_str(label)
    }
}

/// Convert a parsed combo into the OS backend's hotkey type.
#[track_caller]
pub fn to_global_hotkey(hotkey: &Hotkey) -> AppResult<HotKey> {
    HotKey::from_str(&hotkey.registration_string()).map_err(|e| {
        AppError::HotkeyRegistrationFailed {
            reason: format!("{} is not supported: {}", hotkey, e),
            location: ErrorLocation::from(Location::caller()),
        }
    })
}

/// Map from OS hotkey id to role.
///
/// Ids are derived from the combo itself, so both threads can compute the
/// same bindings from the same config without sharing the manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotkeyBindings {
    roles: HashMap<u32, HotkeyRole>,
}

impl HotkeyBindings {
    /// Bindings for every role whose combo the OS backend understands.
    pub fn from_config(config: &HotkeyConfig) -> Self {
        let mut roles = HashMap::new();

        for role in HotkeyRole::ALL {
            let bound = config
                .hotkey(role)
                .and_then(|hotkey| to_global_hotkey(&hotkey));

            match bound {
                Ok(hotkey) => {
                    if let Some(previous) = roles.insert(hotkey.id(), role) {
                        warn!(%role, %previous, "Two roles share one combo");
                    }
                }
                Err(e) => warn!(%role, error = %e, "Hotkey not bound"),
            }
        }

        Self { roles }
    }

    /// Role bound to the OS hotkey `id`.
    pub fn role_for(&self, id: u32) -> Option<HotkeyRole> {
        self.roles.get(&id).copied()
    }

    /// Command to send for a raw hotkey event. Only presses count; the
    /// worker watches for the hold release itself.
    pub fn command_for(&self, event: &GlobalHotKeyEvent) -> Option<AppCommand> {
        if event.state != HotKeyState::Pressed {
            return None;
        }
        self.role_for(event.id).map(AppCommand::Hotkey)
    }
}

/// Owns the OS hotkey registrations. Main thread only.
pub struct HotkeyRegistrar {
    manager: GlobalHotKeyManager,
    registered: Vec<HotKey>,
}

impl HotkeyRegistrar {
    /// Create the platform hotkey manager.
    ///
    /// Must be called on a thread with a message pump (e.g. the main thread
    /// running a `tao` event loop) so that `WM_HOTKEY` messages are
    /// dispatched on Windows.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to create manager: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self {
            manager,
            registered: Vec::new(),
        })
    }

    /// Replace all registrations with the combos in `config`.
    ///
    /// Each outcome is reported as a [`Notification::HotkeyRegistration`];
    /// a combo the OS refuses stays inactive and the rest still register.
    #[instrument(skip(self, config, notifications))]
    pub fn apply(
        &mut self,
        config: &HotkeyConfig,
        notifications: &mpsc::UnboundedSender<Notification>,
    ) {
        for hotkey in self.registered.drain(..) {
            if let Err(e) = self.manager.unregister(hotkey) {
                debug!(error = %e, "Failed to unregister hotkey");
            }
        }

        for role in HotkeyRole::ALL {
            let combo = config.combo(role).to_string();

            let ok = match self.register(config, role) {
                Ok(hotkey) => {
                    self.registered.push(hotkey);
                    info!(%role, combo = %combo, "Global hotkey registered");
                    true
                }
                Err(e) => {
                    error!(%role, combo = %combo, error = %e, "Failed to register hotkey");
                    false
                }
            };

            let _ = notifications.send(Notification::HotkeyRegistration { combo, ok });
        }
    }

    #[track_caller]
    fn register(&self, config: &HotkeyConfig, role: HotkeyRole) -> AppResult<HotKey> {
        let hotkey = to_global_hotkey(&config.hotkey(role)?)?;

        self.manager
            .register(hotkey)
            .map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to register {}: {}", config.combo(role), e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(hotkey)
    }
}

/// Forwards OS hotkey presses to the session loop.
pub struct HotkeyHandler {
    command_tx: mpsc::Sender<AppCommand>,
    bindings: watch::Receiver<HotkeyBindings>,
}

impl HotkeyHandler {
    /// Create a handler; `bindings` is updated whenever settings reload.
    pub fn new(
        command_tx: mpsc::Sender<AppCommand>,
        bindings: watch::Receiver<HotkeyBindings>,
    ) -> Self {
        Self {
            command_tx,
            bindings,
        }
    }

    /// Run the forwarding loop until a shutdown signal is received.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let receiver = GlobalHotKeyEvent::receiver().clone();
        let (event_tx, mut event_rx) = mpsc::channel(32);

        // GlobalHotKeyEvent::receiver() is a blocking crossbeam receiver;
        // one persistent blocking task forwards it. It exits on the first
        // event after event_rx is dropped.
        let handle = tokio::task::spawn_blocking(move || {
            while let Ok(event) = receiver.recv() {
                if event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Hotkey handler shutting down");
                    break;
                }
                Some(event) = event_rx.recv() => {
                    let command = self.bindings.borrow().command_for(&event);
                    if let Some(command) = command {
                        self.forward(command).await?;
                    }
                }
            }
        }

        drop(event_rx);

        // Best-effort join: the blocking task may sit in recv() until the
        // next hotkey event. The runtime cleans it up on exit regardless.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Hotkey event forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Hotkey event forwarder task panicked"),
            Err(_) => debug!(
                "Hotkey event forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }

    async fn forward(&self, command: AppCommand) -> AppResult<()> {
        debug!(?command, "Hotkey pressed");

        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to forward hotkey: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

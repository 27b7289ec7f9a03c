use crate::{
    AppCommand, AppResult, HotkeyBindings, HotkeyRole, TrayMenuIds, UiCommand, config::Config,
};

use std::{path::PathBuf, sync::Arc, time::Instant};

use tao::event_loop::EventLoopProxy;
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{error, info, instrument, warn};
use tray_icon::menu::MenuEvent;
use voice_typer_core::{
    inject::TextInjector,
    session::{Notification, SessionController},
    worker::{WorkerSignal, WorkerSupervisor},
};

/// Main application state.
///
/// Runs on the async runtime thread and owns the session outright: hotkey
/// presses, worker output, tray menu picks and both timers are handled one
/// at a time by [`App::run`]. UI changes are sent back to the main thread
/// through `ui_proxy` because the tray icon and windows are `!Send`.
pub struct App {
    pub(crate) session: SessionController<WorkerSupervisor>,
    pub(crate) signal_rx: mpsc::UnboundedReceiver<WorkerSignal>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) notifications: mpsc::UnboundedSender<Notification>,
    pub(crate) injector: Arc<Mutex<TextInjector>>,
    pub(crate) ui_proxy: EventLoopProxy<UiCommand>,
    pub(crate) bindings_tx: watch::Sender<HotkeyBindings>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) menu_ids: TrayMenuIds,
    pub(crate) config_path: PathBuf,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Voice-Typer starting");

        self.session.start_worker();

        // MenuEvent::receiver() is a blocking crossbeam receiver; one
        // persistent blocking task forwards it. The task exits on the first
        // menu event after tray_event_rx is dropped.
        let (tray_event_tx, mut tray_event_rx) = mpsc::channel(32);
        let tray_handle = tokio::task::spawn_blocking(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if tray_event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            let watchdog = self.session.watchdog_deadline();
            let retry = self.session.worker().retry_deadline();

            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    if !self.handle_command(cmd) {
                        break;
                    }
                }

                Some(signal) = self.signal_rx.recv() => {
                    self.session.on_worker_signal(signal);
                }

                Some(event) = tray_event_rx.recv() => {
                    if !self.handle_tray_event(event).await {
                        break;
                    }
                }

                _ = sleep_until(watchdog) => {
                    self.session.poll_watchdog(Instant::now());
                }

                _ = sleep_until(retry) => {
                    if let Err(e) = self.session.worker_mut().flush_pending() {
                        error!(error = %e, "Queued worker commands dropped");
                        let _ = self
                            .notifications
                            .send(Notification::WorkerUnavailable(e.to_string()));
                    }
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        drop(tray_event_rx);

        match tokio::time::timeout(std::time::Duration::from_secs(1), tray_handle).await {
            Ok(Ok(())) => info!("Tray event forwarder stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Tray event forwarder task panicked"),
            Err(_) => info!(
                "Tray event forwarder did not stop within timeout, \
                     will be cleaned up on exit"
            ),
        }

        self.session.worker_mut().shutdown();
        let _ = self.shutdown_tx.send(true);
        let _ = self.ui_proxy.send_event(UiCommand::Shutdown);
        info!("Voice-Typer shut down successfully");

        Ok(())
    }

    /// Apply one command. Returns `false` to stop the loop.
    #[instrument(skip(self))]
    fn handle_command(&mut self, cmd: AppCommand) -> bool {
        match cmd {
            AppCommand::Hotkey(HotkeyRole::Hold) => self.session.on_hold_pressed(Instant::now()),
            AppCommand::Hotkey(HotkeyRole::Toggle) => self.session.on_toggle_pressed(),
            AppCommand::Hotkey(HotkeyRole::PasteLast) => self.session.paste_last(),
            AppCommand::StopRequested => self.session.stop_requested(),
            AppCommand::Shutdown => {
                info!("Shutdown requested");
                return false;
            }
        }
        true
    }

    /// Handle tray menu events. Returns `false` to stop the loop.
    #[instrument(skip(self))]
    async fn handle_tray_event(&mut self, event: MenuEvent) -> bool {
        let event_id = &event.id;

        if *event_id == self.menu_ids.toggle {
            self.session.on_toggle_pressed();
        } else if *event_id == self.menu_ids.paste_last {
            self.session.paste_last();
        } else if *event_id == self.menu_ids.reload {
            if let Err(e) = self.reload_settings().await {
                error!(error = %e, "Failed to reload settings");
            }
        } else if *event_id == self.menu_ids.open_settings {
            match open::that(&self.config_path) {
                Ok(()) => info!(config_path = ?self.config_path, "Opened settings file"),
                Err(e) => warn!(error = %e, "Failed to open settings file"),
            }
        } else if *event_id == self.menu_ids.exit {
            info!("Exit requested from tray menu");
            return false;
        }

        true
    }

    /// Re-read the config file and apply hotkeys and injection behavior.
    ///
    /// The worker launch line only takes effect on the next respawn.
    #[instrument(skip(self))]
    async fn reload_settings(&mut self) -> AppResult<()> {
        let config = Config::load_from(&self.config_path)?;

        let hold = config.hotkeys.hotkey(HotkeyRole::Hold)?;
        let toggle = config.hotkeys.hotkey(HotkeyRole::Toggle)?;
        self.session.set_hotkeys(hold, toggle);

        self.injector
            .lock()
            .await
            .apply_settings(config.behavior.injector_settings());

        let _ = self
            .bindings_tx
            .send(HotkeyBindings::from_config(&config.hotkeys));
        let _ = self
            .ui_proxy
            .send_event(UiCommand::RegisterHotkeys(config.hotkeys.clone()));

        info!("Settings reloaded");

        Ok(())
    }
}

/// Sleep until `deadline`, or forever when there is none.
async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        }
        None => std::future::pending().await,
    }
}

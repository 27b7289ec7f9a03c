//! Voice-Typer: hotkey-driven dictation into whatever window has focus.

mod app;
mod app_command;
mod config;
mod error;
mod hotkey_handler;
mod indicator_window;
mod notifier;
mod output_handler;
mod paste_key_guard;
#[cfg(test)]
mod tests;
mod tray_icon_state;
mod tray_manager;
mod ui_command;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    hotkey_handler::{HotkeyBindings, HotkeyHandler, HotkeyRegistrar, HotkeyRole},
    indicator_window::{ProxyIndicator, TaoIndicatorSurface},
    output_handler::{EnigoKeyboard, InjectorOutput, ProxyHostWindows, SystemClipboard},
    paste_key_guard::PasteKeyGuard,
    tray_icon_state::TrayIconState,
    tray_manager::{TrayManager, TrayMenuIds},
    ui_command::UiCommand,
};

use crate::config::{Config, StatePositionStore};

use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Instant,
};

use tao::{
    event::{ElementState, Event, MouseButton, StartCause, WindowEvent},
    event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy},
};
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use voice_typer_core::{
    HistoryLog,
    indicator::{IndicatorController, IndicatorPosition},
    inject::{KeyboardBackend, TextInjector},
    session::{Notification, SessionController, SessionPorts},
    worker::WorkerSupervisor,
};

const DEFAULT_LOG_FILTER: &str = "voice_typer=debug,voice_typer_core=debug";

/// Everything the session thread needs, handed over once at startup.
struct SessionSeed {
    config: Config,
    config_path: PathBuf,
    command_tx: mpsc::Sender<AppCommand>,
    command_rx: mpsc::Receiver<AppCommand>,
    notify_tx: mpsc::UnboundedSender<Notification>,
    notify_rx: mpsc::UnboundedReceiver<Notification>,
    ui_proxy: EventLoopProxy<UiCommand>,
    focused: Arc<AtomicBool>,
    menu_ids: TrayMenuIds,
}

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let event_loop = EventLoopBuilder::<UiCommand>::with_user_event().build();
    let ui_proxy = event_loop.create_proxy();

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    let mut tray_manager = match TrayManager::new() {
        Ok(tm) => tm,
        Err(e) => {
            error!("Failed to create TrayManager: {:?}", e);
            std::process::exit(1);
        }
    };

    let config_path = match Config::config_path() {
        Ok(path) => path,
        Err(e) => {
            warn!(error = %e, "No config directory, using working directory");
            PathBuf::from("config.toml")
        }
    };

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };

    let state_path = match Config::state_path() {
        Ok(path) => path,
        Err(e) => {
            warn!(error = %e, "No data directory, using working directory");
            PathBuf::from("indicator.toml")
        }
    };

    let window = match indicator_window::build_indicator_window(&event_loop) {
        Ok(window) => window,
        Err(e) => {
            error!("Failed to create indicator window: {:?}", e);
            std::process::exit(1);
        }
    };
    let indicator_id = window.id();
    let mut indicator = IndicatorController::new(
        TaoIndicatorSurface::new(window),
        StatePositionStore::new(state_path),
    );

    let focused = Arc::new(AtomicBool::new(false));
    let (command_tx, command_rx) = mpsc::channel(32);
    let (notify_tx, notify_rx) = mpsc::unbounded_channel();

    let hotkey_config = config.hotkeys.clone();
    let mut seed = Some(SessionSeed {
        config,
        config_path,
        command_tx: command_tx.clone(),
        command_rx,
        notify_tx: notify_tx.clone(),
        notify_rx,
        ui_proxy,
        focused: Arc::clone(&focused),
        menu_ids: tray_manager.menu_ids().clone(),
    });

    // Dropping the registrar unregisters every hotkey, so it lives in the
    // closure for the app's lifetime.
    let mut hotkeys: Option<HotkeyRegistrar> = None;

    event_loop.run(move |event, _, control_flow| {
        let now = Instant::now();
        indicator.poll(now);

        *control_flow = match indicator.next_deadline() {
            Some(deadline) => ControlFlow::WaitUntil(deadline),
            None => ControlFlow::Wait,
        };

        match event {
            Event::NewEvents(StartCause::Init) => {
                // Register on the main thread: tao's event loop pumps the
                // Windows messages needed for WM_HOTKEY delivery.
                match HotkeyRegistrar::new() {
                    Ok(mut registrar) => {
                        registrar.apply(&hotkey_config, &notify_tx);
                        hotkeys = Some(registrar);
                    }
                    Err(e) => {
                        error!(error = %e, "Global hotkeys unavailable");
                        for role in HotkeyRole::ALL {
                            let _ = notify_tx.send(Notification::HotkeyRegistration {
                                combo: hotkey_config.combo(role).to_string(),
                                ok: false,
                            });
                        }
                    }
                }

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                if let Some(seed) = seed.take() {
                    spawn_session_thread(seed);
                }
            }

            Event::UserEvent(cmd) => match cmd {
                UiCommand::SetState(state) => {
                    if let Err(e) = tray_manager.update_state(state) {
                        error!(error = ?e, "Failed to update tray icon");
                    }
                }
                UiCommand::SetPreview(preview) => {
                    if let Err(e) = tray_manager.set_preview(preview.as_deref()) {
                        error!(error = ?e, "Failed to update tray tooltip");
                    }
                }
                UiCommand::ShowIndicator => {
                    indicator.show();
                }
                UiCommand::HideIndicator => {
                    indicator.hide();
                }
                UiCommand::ReleaseFocus => {
                    // The indicator is the only window that can take focus.
                    if focused.load(Ordering::SeqCst) {
                        indicator.hide();
                    }
                }
                UiCommand::RegisterHotkeys(config) => {
                    if let Some(registrar) = hotkeys.as_mut() {
                        registrar.apply(&config, &notify_tx);
                    }
                }
                UiCommand::Shutdown => {
                    indicator.close();
                    *control_flow = ControlFlow::ExitWithCode(0);
                }
            },

            Event::WindowEvent {
                window_id, event, ..
            } if window_id == indicator_id => match event {
                WindowEvent::Focused(is_focused) => {
                    focused.store(is_focused, Ordering::SeqCst);
                }
                WindowEvent::Moved(position) => {
                    indicator.on_moved(IndicatorPosition::new(position.x, position.y), now);
                    if let Some(deadline) = indicator.next_deadline() {
                        *control_flow = ControlFlow::WaitUntil(deadline);
                    }
                }
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    button: MouseButton::Left,
                    ..
                } => {
                    if let Err(e) = indicator.surface().window().drag_window() {
                        warn!(error = %e, "Failed to start indicator drag");
                    }
                }
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    button: MouseButton::Right,
                    ..
                } => {
                    if command_tx.try_send(AppCommand::StopRequested).is_err() {
                        warn!("Session loop busy, stop request dropped");
                    }
                }
                WindowEvent::CloseRequested => {
                    indicator.hide();
                }
                _ => {}
            },

            Event::LoopDestroyed => {
                indicator.close();
            }

            _ => {}
        }
    });
}

/// Spawn the tokio runtime on its own thread. The tray icon, indicator and
/// hotkey manager stay on the main thread.
fn spawn_session_thread(seed: SessionSeed) {
    std::thread::spawn(move || {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                error!("Failed to create tokio runtime: {:?}", e);
                std::process::exit(1);
            }
        };

        rt.block_on(async move {
            if let Err(e) = run_session(seed).await {
                error!(error = ?e, "Session error");
            }
        });
    });
}

async fn run_session(seed: SessionSeed) -> AppResult<()> {
    let SessionSeed {
        config,
        config_path,
        command_tx,
        command_rx,
        notify_tx,
        notify_rx,
        ui_proxy,
        focused,
        menu_ids,
    } = seed;

    tokio::spawn(notifier::run_notifier(notify_rx, ui_proxy.clone()));

    let keyboard = EnigoKeyboard::probe().map(|k| Box::new(k) as Box<dyn KeyboardBackend>);
    let injector = Arc::new(Mutex::new(TextInjector::new(
        keyboard,
        Box::new(SystemClipboard::new()),
        Box::new(ProxyHostWindows::new(ui_proxy.clone(), focused)),
        config.behavior.injector_settings(),
    )));

    let ports = SessionPorts {
        indicator: Box::new(ProxyIndicator::new(ui_proxy.clone())),
        output: Box::new(InjectorOutput::spawn(
            Arc::clone(&injector),
            notify_tx.clone(),
        )),
        history: Box::new(HistoryLog::open(Config::history_path()?)),
        notifications: notify_tx.clone(),
    };

    let (signal_tx, signal_rx) = mpsc::unbounded_channel();
    let supervisor = WorkerSupervisor::new(config.worker.spec(), signal_tx);

    let session = SessionController::new(
        supervisor,
        ports,
        config.hotkeys.hotkey(HotkeyRole::Hold)?,
        config.hotkeys.hotkey(HotkeyRole::Toggle)?,
    );

    let (bindings_tx, bindings_rx) =
        watch::channel(HotkeyBindings::from_config(&config.hotkeys));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let hotkey_handler = HotkeyHandler::new(command_tx, bindings_rx);

    let app = App {
        session,
        signal_rx,
        command_rx,
        notifications: notify_tx,
        injector,
        ui_proxy,
        bindings_tx,
        shutdown_tx,
        menu_ids,
        config_path,
    };

    info!(worker = %config.worker.program, "Session thread running");

    tokio::join!(
        async {
            if let Err(e) = hotkey_handler.run(shutdown_rx).await {
                error!(error = ?e, "Hotkey handler error");
            }
        },
        async {
            if let Err(e) = app.run().await {
                error!(error = ?e, "App error");
            }
        }
    );

    Ok(())
}

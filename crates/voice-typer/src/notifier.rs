//! Presentation of session notifications: tray state, tooltip preview and
//! desktop notifications.

use crate::{TrayIconState, UiCommand};

use tao::event_loop::EventLoopProxy;
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};
use voice_typer_core::session::Notification;

const NOTIFICATION_SUMMARY: &str = "Voice Typer";

#[cfg(target_os = "macos")]
const PASTE_SHORTCUT: &str = "Cmd+V";
#[cfg(not(target_os = "macos"))]
const PASTE_SHORTCUT: &str = "Ctrl+V";

/// What to do for one notification.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NotificationPlan {
    /// Main-thread update, if any.
    pub ui: Option<UiCommand>,
    /// Desktop notification body, if the user should be told.
    pub toast: Option<String>,
}

/// Decide how to present `notification`.
pub fn plan(notification: &Notification) -> NotificationPlan {
    match notification {
        Notification::RecordingStarted { .. } => NotificationPlan {
            ui: Some(UiCommand::SetState(TrayIconState::Recording)),
            toast: None,
        },
        Notification::RecordingStopped => NotificationPlan {
            ui: Some(UiCommand::SetState(TrayIconState::Idle)),
            toast: None,
        },
        Notification::TranscriptionPartial(text) => NotificationPlan {
            ui: Some(UiCommand::SetPreview(Some(text.clone()))),
            toast: None,
        },
        Notification::TranscriptionFinal(_) => NotificationPlan {
            ui: Some(UiCommand::SetPreview(None)),
            toast: None,
        },
        Notification::HotkeyRegistration { ok: true, .. } => NotificationPlan::default(),
        Notification::HotkeyRegistration { combo, ok: false } => NotificationPlan {
            ui: None,
            toast: Some(format!(
                "Could not register {combo}. Another application may be using it."
            )),
        },
        Notification::WorkerUnavailable(reason) => NotificationPlan {
            ui: Some(UiCommand::SetState(TrayIconState::Unavailable)),
            toast: Some(format!("Transcription worker unavailable: {reason}")),
        },
        Notification::InjectionIncomplete => NotificationPlan {
            ui: None,
            toast: Some(format!(
                "Text copied to clipboard. Press {PASTE_SHORTCUT} to paste."
            )),
        },
        Notification::NoTranscriptAvailable => NotificationPlan {
            ui: None,
            toast: Some("No transcript to paste yet.".to_string()),
        },
    }
}

/// Drain session notifications until every sender is gone.
#[instrument(skip_all)]
pub async fn run_notifier(
    mut notifications: mpsc::UnboundedReceiver<Notification>,
    proxy: EventLoopProxy<UiCommand>,
) {
    while let Some(notification) = notifications.recv().await {
        let NotificationPlan { ui, toast } = plan(&notification);

        if let Some(command) = ui {
            if proxy.send_event(command).is_err() {
                debug!("Event loop closed, stopping notifier");
                break;
            }
        }

        if let Some(body) = toast {
            tokio::task::spawn_blocking(move || show_toast(&body));
        }
    }
}

fn show_toast(body: &str) {
    let shown = notify_rust::Notification::new()
        .summary(NOTIFICATION_SUMMARY)
        .body(body)
        .show();

    if let Err(e) = shown {
        warn!(error = %e, body, "Failed to show desktop notification");
    }
}

use crate::{
    TrayIconState, UiCommand,
    notifier::{NotificationPlan, plan},
};

use voice_typer_core::{protocol::RecordingMode, session::Notification};

/// WHAT: Recording start and stop drive the tray icon only
/// WHY: A toast per recording would be noise
#[test]
fn given_recording_lifecycle_when_planning_then_tray_state_follows() {
    // Given/When: Start and stop notifications
    let started = plan(&Notification::RecordingStarted {
        mode: RecordingMode::Hold,
    });
    let stopped = plan(&Notification::RecordingStopped);

    // Then: Tray state changes without toasts
    assert_eq!(
        started,
        NotificationPlan {
            ui: Some(UiCommand::SetState(TrayIconState::Recording)),
            toast: None,
        }
    );
    assert_eq!(
        stopped.ui,
        Some(UiCommand::SetState(TrayIconState::Idle))
    );
    assert_eq!(stopped.toast, None);
}

/// WHAT: Partials update the preview, finals clear it
/// WHY: Stale preview text would outlive the session
#[test]
fn given_transcripts_when_planning_then_preview_updated_and_cleared() {
    // Given/When: A partial then a final
    let partial = plan(&Notification::TranscriptionPartial("hel".to_string()));
    let final_text = plan(&Notification::TranscriptionFinal("hello".to_string()));

    // Then: Preview is set then cleared
    assert_eq!(
        partial.ui,
        Some(UiCommand::SetPreview(Some("hel".to_string())))
    );
    assert_eq!(final_text.ui, Some(UiCommand::SetPreview(None)));
}

/// WHAT: Failures reach the user as desktop notifications
/// WHY: The app has no window to show errors in
#[test]
fn given_failures_when_planning_then_toasts_shown() {
    // Given/When: Each failure notification
    let hotkey = plan(&Notification::HotkeyRegistration {
        combo: "Ctrl+Win+Space".to_string(),
        ok: false,
    });
    let worker = plan(&Notification::WorkerUnavailable("no python".to_string()));
    let injection = plan(&Notification::InjectionIncomplete);
    let empty = plan(&Notification::NoTranscriptAvailable);

    // Then: Each produces a toast; worker loss also marks the tray
    assert!(hotkey.toast.unwrap_or_default().contains("Ctrl+Win+Space"));
    assert_eq!(
        worker.ui,
        Some(UiCommand::SetState(TrayIconState::Unavailable))
    );
    assert!(worker.toast.unwrap_or_default().contains("no python"));
    assert!(injection.toast.is_some());
    assert!(empty.toast.is_some());
}

/// WHAT: Successful registrations are silent
/// WHY: Every launch registers three hotkeys
#[test]
fn given_successful_registration_when_planning_then_nothing_shown() {
    // Given/When: A successful registration
    let result = plan(&Notification::HotkeyRegistration {
        combo: "Alt+Shift+Z".to_string(),
        ok: true,
    });

    // Then: Nothing happens
    assert_eq!(result, NotificationPlan::default());
}

use crate::{
    HistorySink, Hotkey,
    protocol::{RecordingMode, WorkerCommand, WorkerEvent},
    session::{IndicatorPort, Notification, SessionState, TranscriptOutput},
    worker::{WorkerLink, WorkerSignal},
};

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// A hold recording with no `Release` or `Final` is stopped after this long.
pub const HOLD_WATCHDOG: Duration = Duration::from_secs(30);

/// Collaborators the session drives besides the worker.
pub struct SessionPorts {
    /// Recording indicator.
    pub indicator: Box<dyn IndicatorPort>,
    /// Injection of final transcripts.
    pub output: Box<dyn TranscriptOutput>,
    /// Transcript history.
    pub history: Box<dyn HistorySink>,
    /// Presentation-layer notifications.
    pub notifications: mpsc::UnboundedSender<Notification>,
}

/// Owns the dictation session and every piece of state around it.
///
/// Driven from a single event loop: hotkey presses, worker signals and the
/// watchdog deadline all arrive as method calls, so none of the fields need
/// locking. Callers pass `now` explicitly; the controller never reads the
/// clock on its own.
pub struct SessionController<W: WorkerLink> {
    worker: W,
    ports: SessionPorts,
    state: SessionState,
    hold_key: Hotkey,
    toggle_key: Hotkey,
    hold_pressed: bool,
    watchdog: Option<Instant>,
    session_id: Option<Uuid>,
    awaiting_final: bool,
    last_delivered: Option<String>,
}

impl<W: WorkerLink> SessionController<W> {
    /// Create an idle controller for the given combos.
    pub fn new(mut worker: W, ports: SessionPorts, hold_key: Hotkey, toggle_key: Hotkey) -> Self {
        worker.set_hold_keys(hold_key.worker_combo());

        Self {
            worker,
            ports,
            state: SessionState::Idle,
            hold_key,
            toggle_key,
            hold_pressed: false,
            watchdog: None,
            session_id: None,
            awaiting_final: false,
            last_delivered: None,
        }
    }

    /// Current session phase.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the hold latch is set.
    pub fn is_hold_pressed(&self) -> bool {
        self.hold_pressed
    }

    /// When the hold watchdog fires, if armed.
    pub fn watchdog_deadline(&self) -> Option<Instant> {
        self.watchdog
    }

    /// Active hold combo.
    pub fn hold_key(&self) -> &Hotkey {
        &self.hold_key
    }

    /// Active toggle combo.
    pub fn toggle_key(&self) -> &Hotkey {
        &self.toggle_key
    }

    /// The worker link.
    pub fn worker(&self) -> &W {
        &self.worker
    }

    /// Mutable access to the worker link.
    pub fn worker_mut(&mut self) -> &mut W {
        &mut self.worker
    }

    /// Start the worker ahead of the first session.
    #[instrument(skip(self))]
    pub fn start_worker(&mut self) {
        if let Err(e) = self.worker.ensure_running() {
            error!(error = %e, "Failed to pre-start worker");
            self.notify(Notification::WorkerUnavailable(e.to_string()));
        }
    }

    /// The hold combo went down.
    #[instrument(skip(self))]
    pub fn on_hold_pressed(&mut self, now: Instant) {
        if self.hold_pressed || self.state != SessionState::Idle {
            debug!(state = %self.state, "Hold press ignored");
            return;
        }

        self.hold_pressed = true;

        if self.begin(RecordingMode::Hold) {
            self.watchdog = Some(now + HOLD_WATCHDOG);
        } else {
            self.hold_pressed = false;
        }
    }

    /// The toggle combo was pressed.
    #[instrument(skip(self))]
    pub fn on_toggle_pressed(&mut self) {
        match self.state {
            SessionState::Idle | SessionState::Finalizing => {
                self.begin(RecordingMode::Toggle);
            }
            SessionState::ToggleRecording => {
                self.worker.send(WorkerCommand::Stop);
                self.end_recording("toggle pressed");
            }
            SessionState::HoldRecording => {
                debug!("Toggle press ignored during hold recording");
            }
        }
    }

    /// Stop the active recording from a source other than its own hotkey.
    #[instrument(skip(self))]
    pub fn stop_requested(&mut self) {
        if !self.state.is_recording() {
            debug!(state = %self.state, "Stop requested while not recording");
            return;
        }

        self.worker.send(WorkerCommand::Stop);
        self.end_recording("stop requested");
    }

    /// Re-inject the newest history entry.
    #[instrument(skip(self))]
    pub fn paste_last(&mut self) {
        match self.ports.history.last_text() {
            Some(text) => {
                info!(text_len = text.len(), "Pasting last transcript");
                self.ports.output.deliver(text);
            }
            None => {
                info!("No transcript to paste");
                self.notify(Notification::NoTranscriptAvailable);
            }
        }
    }

    /// Replace the active combos and push the hold combo to the worker.
    #[instrument(skip(self))]
    pub fn set_hotkeys(&mut self, hold_key: Hotkey, toggle_key: Hotkey) {
        let combo = hold_key.worker_combo();
        self.worker.set_hold_keys(combo.clone());
        self.worker.send(WorkerCommand::SetHoldKeys(combo));

        info!(hold = %hold_key, toggle = %toggle_key, "Hotkeys updated");

        self.hold_key = hold_key;
        self.toggle_key = toggle_key;
    }

    /// Fire the watchdog if its deadline has passed.
    #[instrument(skip(self))]
    pub fn poll_watchdog(&mut self, now: Instant) {
        let Some(deadline) = self.watchdog else {
            return;
        };

        if now < deadline {
            return;
        }

        self.watchdog = None;

        if self.state == SessionState::HoldRecording {
            warn!(session_id = ?self.session_id, "Hold recording timed out, stopping");
            self.worker.send(WorkerCommand::Stop);
            self.end_recording("watchdog");
        }
    }

    /// Dispatch a signal from the worker's I/O tasks.
    pub fn on_worker_signal(&mut self, signal: WorkerSignal) {
        match signal {
            WorkerSignal::Event { generation, event } => {
                if self.worker.is_current(generation) {
                    self.on_worker_event(event);
                } else {
                    debug!(generation, "Dropping event from replaced worker");
                }
            }
            WorkerSignal::Exited { generation, code } => {
                if self.worker.on_exit(generation, code) {
                    self.on_worker_aborted();
                }
            }
            WorkerSignal::WriteFailed { generation, reason } => {
                self.worker.on_write_failed(generation, &reason);
            }
        }
    }

    /// Apply one parsed worker event.
    pub fn on_worker_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Partial(text) => {
                debug!(text_len = text.len(), "Partial transcript");
                self.notify(Notification::TranscriptionPartial(text));
            }
            WorkerEvent::Release => self.on_release(),
            WorkerEvent::Final(text) => self.on_final(text),
        }
    }

    /// The live worker died.
    ///
    /// The user is only told when a recording or a pending transcript was
    /// lost; an idle worker is simply respawned on the next press.
    #[instrument(skip(self))]
    pub fn on_worker_aborted(&mut self) {
        let lost_transcript = std::mem::take(&mut self.awaiting_final);
        let aborted = self.end_recording("worker exited");

        if !aborted && !lost_transcript {
            info!("Idle worker exited, will respawn on next recording");
            return;
        }

        warn!(aborted, lost_transcript, "Recording aborted by worker exit");
        self.notify(Notification::WorkerUnavailable(
            "transcription worker exited".to_string(),
        ));
    }

    fn on_release(&mut self) {
        if self.state == SessionState::HoldRecording {
            self.end_recording("key released");
        } else {
            debug!(state = %self.state, "Release outside hold recording");
            self.hold_pressed = false;
        }
    }

    #[instrument(skip(self, text), fields(text_len = text.len()))]
    fn on_final(&mut self, text: String) {
        let was_recording = self.state.is_recording();

        if was_recording {
            // Hide first: injection targets whatever has focus.
            self.state = SessionState::Finalizing;
            self.ports.indicator.hide();
        }

        if !was_recording
            && !self.awaiting_final
            && self.last_delivered.as_deref() == Some(text.as_str())
        {
            debug!("Dropping duplicate final transcript");
            return;
        }

        info!(session_id = ?self.session_id, "Final transcript received");

        self.awaiting_final = false;
        self.notify(Notification::TranscriptionFinal(text.clone()));

        if let Err(e) = self.ports.history.append(&text) {
            warn!(error = %e, "Failed to append history");
        }

        if was_recording {
            self.notify(Notification::RecordingStopped);
        }

        self.hold_pressed = false;
        self.watchdog = None;
        self.state = SessionState::Idle;
        self.session_id = None;

        self.last_delivered = Some(text.clone());
        self.ports.output.deliver(text);
    }

    fn begin(&mut self, mode: RecordingMode) -> bool {
        if let Err(e) = self.worker.ensure_running() {
            error!(error = %e, ?mode, "Cannot start recording without a worker");
            self.state = SessionState::Idle;
            self.notify(Notification::WorkerUnavailable(e.to_string()));
            return false;
        }

        let session_id = Uuid::new_v4();
        self.session_id = Some(session_id);
        self.state = match mode {
            RecordingMode::Hold => SessionState::HoldRecording,
            RecordingMode::Toggle => SessionState::ToggleRecording,
        };

        self.ports.indicator.show();

        self.worker.send(WorkerCommand::SetMode(mode));
        if mode == RecordingMode::Hold {
            self.worker
                .send(WorkerCommand::SetHoldKeys(self.hold_key.worker_combo()));
        }
        self.worker.send(WorkerCommand::Start);

        self.awaiting_final = true;
        self.notify(Notification::RecordingStarted { mode });

        info!(session_id = %session_id, %mode, "Recording started");

        true
    }

    /// Leave a recording state. Safe to call when already idle.
    fn end_recording(&mut self, reason: &'static str) -> bool {
        self.hold_pressed = false;
        self.watchdog = None;

        if !self.state.is_recording() {
            self.state = SessionState::Idle;
            return false;
        }

        let previous = self.state;
        self.state = SessionState::Finalizing;
        self.ports.indicator.hide();
        self.notify(Notification::RecordingStopped);
        self.state = SessionState::Idle;

        info!(session_id = ?self.session_id, from = %previous, reason, "Recording stopped");

        true
    }

    fn notify(&self, notification: Notification) {
        let _ = self.ports.notifications.send(notification);
    }
}

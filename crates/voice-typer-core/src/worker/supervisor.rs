use crate::{
    CoreError, CoreResult,
    protocol::{LineFramer, WorkerCommand, WorkerEvent},
    worker::{WorkerLink, WorkerSignal},
};

use std::{
    collections::VecDeque,
    panic::Location,
    process::Stdio,
    time::{Duration, Instant},
};

use error_location::ErrorLocation;
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    process::{Child, ChildStderr, ChildStdin, ChildStdout, Command},
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{debug, error, info, instrument, warn};

/// Delay before commands queued against a missing worker are retried.
pub const WORKER_RETRY_DELAY: Duration = Duration::from_millis(200);

/// How long an exited worker's stdout may take to drain.
const READER_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// How to launch the worker process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSpec {
    /// Executable to run.
    pub program: String,
    /// Arguments passed to the executable.
    pub args: Vec<String>,
}

impl WorkerSpec {
    /// Launch line from a program and its arguments.
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = String>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().collect(),
        }
    }
}

struct WorkerHandle {
    generation: u64,
    commands: mpsc::UnboundedSender<WorkerCommand>,
    // Dropping this kills the process.
    _kill_tx: oneshot::Sender<()>,
}

/// Owns the single live transcription worker.
///
/// All methods are called from the session loop. The process's stdin,
/// stdout, stderr and exit status are serviced by background tasks that
/// report back through the [`WorkerSignal`] channel, so nothing here ever
/// blocks on the child.
pub struct WorkerSupervisor {
    spec: WorkerSpec,
    signal_tx: mpsc::UnboundedSender<WorkerSignal>,
    handle: Option<WorkerHandle>,
    next_generation: u64,
    hold_keys: Option<String>,
    pending: VecDeque<WorkerCommand>,
    retry_at: Option<Instant>,
}

impl WorkerSupervisor {
    /// Create a supervisor. No process is started until
    /// [`ensure_running`](WorkerLink::ensure_running) or a send.
    pub fn new(spec: WorkerSpec, signal_tx: mpsc::UnboundedSender<WorkerSignal>) -> Self {
        Self {
            spec,
            signal_tx,
            handle: None,
            next_generation: 1,
            hold_keys: None,
            pending: VecDeque::new(),
            retry_at: None,
        }
    }

    /// Whether a live process handle exists.
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Deadline at which deferred commands should be flushed.
    pub fn retry_deadline(&self) -> Option<Instant> {
        self.retry_at
    }

    /// Write deferred commands if a worker is now live.
    ///
    /// Commands that still cannot be delivered are dropped; the error tells
    /// the caller how many were lost.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn flush_pending(&mut self) -> CoreResult<()> {
        self.retry_at = None;
        let pending = std::mem::take(&mut self.pending);

        if pending.is_empty() {
            return Ok(());
        }

        let Some(handle) = &self.handle else {
            error!(dropped = pending.len(), "Worker still not available after wait");
            return Err(CoreError::WorkerUnavailable {
                reason: format!("dropped {} queued command(s)", pending.len()),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let generation = handle.generation;
        for command in pending {
            if handle.commands.send(command).is_err() {
                warn!(generation, "Worker writer closed while flushing queued commands");
                self.discard_handle();
                return Err(CoreError::WorkerUnavailable {
                    reason: "worker stdin closed".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        debug!(generation, "Flushed queued worker commands");

        Ok(())
    }

    /// Kill the worker and forget queued commands.
    #[instrument(skip(self))]
    pub fn shutdown(&mut self) {
        self.pending.clear();
        self.retry_at = None;
        if let Some(handle) = self.handle.take() {
            info!(generation = handle.generation, "Stopping worker");
        }
    }

    fn discard_handle(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!(generation = handle.generation, "Worker handle discarded");
        }
    }

    #[track_caller]
    fn spawn(&mut self) -> CoreResult<()> {
        let generation = self.next_generation;
        self.next_generation += 1;

        let caller = Location::caller();
        let spawn_err = |reason: String| CoreError::WorkerSpawnFailed {
            reason,
            location: ErrorLocation::from(caller),
        };

        let mut child = Command::new(&self.spec.program)
            .args(&self.spec.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spawn_err(format!("{}: {}", self.spec.program, e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| spawn_err("worker stdin is unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| spawn_err("worker stdout is unavailable".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| spawn_err("worker stderr is unavailable".to_string()))?;

        let pid = child.id();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (kill_tx, kill_rx) = oneshot::channel();

        tokio::spawn(write_commands(
            generation,
            stdin,
            command_rx,
            self.signal_tx.clone(),
        ));
        let reader = tokio::spawn(read_events(generation, stdout, self.signal_tx.clone()));
        tokio::spawn(log_stderr(generation, stderr));
        tokio::spawn(watch_exit(
            generation,
            child,
            reader,
            kill_rx,
            self.signal_tx.clone(),
        ));

        self.handle = Some(WorkerHandle {
            generation,
            commands: command_tx,
            _kill_tx: kill_tx,
        });

        info!(generation, pid, program = %self.spec.program, "Worker spawned");

        Ok(())
    }
}

impl WorkerLink for WorkerSupervisor {
    #[track_caller]
    #[instrument(skip(self))]
    fn ensure_running(&mut self) -> CoreResult<()> {
        if self.handle.is_some() {
            return Ok(());
        }

        self.spawn()?;

        // A fresh worker starts unconfigured.
        if let (Some(handle), Some(combo)) = (&self.handle, &self.hold_keys) {
            let _ = handle
                .commands
                .send(WorkerCommand::SetHoldKeys(combo.clone()));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    fn send(&mut self, command: WorkerCommand) {
        if !self.pending.is_empty() {
            debug!(%command, "Queueing behind deferred commands");
            self.pending.push_back(command);
            return;
        }

        if let Some(handle) = &self.handle {
            let generation = handle.generation;
            match handle.commands.send(command) {
                Ok(()) => return,
                Err(mpsc::error::SendError(lost)) => {
                    warn!(generation, command = %lost, "Worker stdin closed, respawning");
                    self.discard_handle();
                    if let Err(e) = self.ensure_running() {
                        error!(error = %e, "Failed to respawn worker");
                    }
                    return;
                }
            }
        }

        warn!(%command, "Worker not running, respawning before send");
        if let Err(e) = self.ensure_running() {
            error!(error = %e, "Failed to start worker");
        }
        self.pending.push_back(command);
        self.retry_at = Some(Instant::now() + WORKER_RETRY_DELAY);
    }

    fn set_hold_keys(&mut self, combo: String) {
        self.hold_keys = Some(combo);
    }

    fn is_current(&self, generation: u64) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| handle.generation == generation)
    }

    #[instrument(skip(self))]
    fn on_exit(&mut self, generation: u64, code: Option<i32>) -> bool {
        if !self.is_current(generation) {
            debug!(generation, ?code, "Ignoring exit of replaced worker");
            return false;
        }

        warn!(generation, ?code, "Worker exited");
        self.discard_handle();
        true
    }

    #[instrument(skip(self))]
    fn on_write_failed(&mut self, generation: u64, reason: &str) {
        if !self.is_current(generation) {
            return;
        }

        warn!(generation, reason, "Worker write failed, respawning");
        self.discard_handle();
        if let Err(e) = self.ensure_running() {
            error!(error = %e, "Failed to respawn worker");
        }
    }
}

async fn write_commands(
    generation: u64,
    mut stdin: ChildStdin,
    mut commands: mpsc::UnboundedReceiver<WorkerCommand>,
    signals: mpsc::UnboundedSender<WorkerSignal>,
) {
    while let Some(command) = commands.recv().await {
        let line = command.to_line();
        let written = match stdin.write_all(line.as_bytes()).await {
            Ok(()) => stdin.flush().await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            let _ = signals.send(WorkerSignal::WriteFailed {
                generation,
                reason: e.to_string(),
            });
            return;
        }

        debug!(generation, %command, "Sent command to worker");
    }
}

async fn read_events(
    generation: u64,
    mut stdout: ChildStdout,
    signals: mpsc::UnboundedSender<WorkerSignal>,
) {
    // One framer per process: a respawn never sees the old fragment.
    let mut framer = LineFramer::new();
    let mut buf = [0u8; 4096];

    loop {
        let n = match stdout.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                warn!(generation, error = %e, "Worker stdout read failed");
                break;
            }
        };

        for line in framer.feed(&buf[..n]) {
            match WorkerEvent::parse(&line) {
                Some(event) => {
                    if signals.send(WorkerSignal::Event { generation, event }).is_err() {
                        return;
                    }
                }
                None => debug!(generation, line = %line, "Ignoring unknown worker event"),
            }
        }
    }

    if framer.buffered_len() > 0 {
        debug!(
            generation,
            dropped = framer.buffered_len(),
            "Discarding unterminated worker output"
        );
    }
}

async fn log_stderr(generation: u64, stderr: ChildStderr) {
    let mut lines = BufReader::new(stderr).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        warn!(generation, line = %line, "Worker stderr");

        if line.contains("ModuleNotFoundError") || line.contains("ImportError") {
            warn!(
                "Worker dependencies may be missing; install faster-whisper, pyaudio, keyboard and numpy"
            );
        }
    }
}

/// Reap the child, then report its exit once every line it printed has been
/// forwarded, so a final transcript is never ordered after `Exited`.
async fn watch_exit(
    generation: u64,
    mut child: Child,
    reader: JoinHandle<()>,
    mut kill_rx: oneshot::Receiver<()>,
    signals: mpsc::UnboundedSender<WorkerSignal>,
) {
    let exited = tokio::select! {
        status = child.wait() => Some(status),
        _ = &mut kill_rx => None,
    };

    let status = match exited {
        Some(status) => status,
        None => {
            if let Err(e) = child.start_kill() {
                debug!(generation, error = %e, "Worker already gone");
            }
            child.wait().await
        }
    };

    let code = match status {
        Ok(status) => status.code(),
        Err(e) => {
            warn!(generation, error = %e, "Failed to reap worker");
            None
        }
    };

    // A grandchild holding stdout open would keep the reader alive forever.
    match tokio::time::timeout(READER_DRAIN_TIMEOUT, reader).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(generation, error = %e, "Worker reader task failed"),
        Err(_) => warn!(generation, "Worker stdout still open after exit"),
    }

    let _ = signals.send(WorkerSignal::Exited { generation, code });
}

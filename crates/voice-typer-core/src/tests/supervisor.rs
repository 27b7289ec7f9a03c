#![cfg(unix)]

use crate::{
    CoreError,
    protocol::{WorkerCommand, WorkerEvent},
    worker::{WorkerLink, WorkerSignal, WorkerSpec, WorkerSupervisor},
};

use std::time::Duration;

use tokio::{sync::mpsc, time::timeout};

const SIGNAL_TIMEOUT: Duration = Duration::from_secs(5);

fn echo_worker() -> WorkerSpec {
    WorkerSpec::new(
        "sh",
        [
            "-c".to_string(),
            "while read line; do echo \"ECHO $line\"; done".to_string(),
        ],
    )
}

async fn next_signal(rx: &mut mpsc::UnboundedReceiver<WorkerSignal>) -> Option<WorkerSignal> {
    timeout(SIGNAL_TIMEOUT, rx.recv()).await.ok().flatten()
}

/// WHAT: A fresh worker is given the hold combo before any other command
/// WHY: The worker cannot detect the release without it
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_hold_keys_when_worker_spawned_then_configured_first() {
    // Given: A supervisor that knows the hold combo
    let (signal_tx, mut signal_rx) = mpsc::unbounded_channel();
    let mut supervisor = WorkerSupervisor::new(echo_worker(), signal_tx);
    supervisor.set_hold_keys("ctrl+win+space".to_string());

    // When: The worker starts and receives START
    supervisor.ensure_running().unwrap();
    supervisor.send(WorkerCommand::Start);

    // Then: Both lines come back in order from generation 1
    assert!(supervisor.is_running());
    assert_eq!(
        next_signal(&mut signal_rx).await,
        Some(WorkerSignal::Event {
            generation: 1,
            event: WorkerEvent::Final("ECHO SET_HOLD_KEYS ctrl+win+space".to_string()),
        })
    );
    assert_eq!(
        next_signal(&mut signal_rx).await,
        Some(WorkerSignal::Event {
            generation: 1,
            event: WorkerEvent::Final("ECHO START".to_string()),
        })
    );

    supervisor.shutdown();
}

/// WHAT: A missing executable is reported as a spawn failure
/// WHY: The session has to stay idle and tell the user
#[tokio::test]
async fn given_missing_program_when_ensuring_running_then_spawn_failed() {
    // Given: A launch line pointing at nothing
    let (signal_tx, _signal_rx) = mpsc::unbounded_channel();
    let spec = WorkerSpec::new("/nonexistent/voice-typer-worker", Vec::new());
    let mut supervisor = WorkerSupervisor::new(spec, signal_tx);

    // When: Starting the worker
    let result = supervisor.ensure_running();

    // Then: The spawn fails and no handle is kept
    assert!(matches!(result, Err(CoreError::WorkerSpawnFailed { .. })));
    assert!(!supervisor.is_running());
}

/// WHAT: Worker exit is reported once for the live generation only
/// WHY: A late exit from a replaced worker must not abort a new session
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_worker_exits_when_signal_handled_then_handle_dropped_once() {
    // Given: A worker that exits immediately with code 3
    let (signal_tx, mut signal_rx) = mpsc::unbounded_channel();
    let spec = WorkerSpec::new("sh", ["-c".to_string(), "exit 3".to_string()]);
    let mut supervisor = WorkerSupervisor::new(spec, signal_tx);
    supervisor.ensure_running().unwrap();

    // When: The exit signal arrives
    let signal = next_signal(&mut signal_rx).await;

    // Then: It names generation 1 and is acted on only once
    assert_eq!(
        signal,
        Some(WorkerSignal::Exited {
            generation: 1,
            code: Some(3),
        })
    );
    assert!(supervisor.on_exit(1, Some(3)));
    assert!(!supervisor.is_running());
    assert!(!supervisor.on_exit(1, Some(3)));
}

/// WHAT: Commands sent with no worker are queued and flushed after respawn
/// WHY: The first hotkey press after a crash should still record
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_no_worker_when_sending_then_respawned_and_flushed() {
    // Given: A supervisor with no process yet
    let (signal_tx, mut signal_rx) = mpsc::unbounded_channel();
    let mut supervisor = WorkerSupervisor::new(echo_worker(), signal_tx);

    // When: A command is sent, then the retry deadline is serviced
    supervisor.send(WorkerCommand::Stop);
    assert!(supervisor.retry_deadline().is_some());
    supervisor.flush_pending().unwrap();

    // Then: The worker was spawned and received the command
    assert!(supervisor.retry_deadline().is_none());
    assert_eq!(
        next_signal(&mut signal_rx).await,
        Some(WorkerSignal::Event {
            generation: 1,
            event: WorkerEvent::Final("ECHO STOP".to_string()),
        })
    );

    supervisor.shutdown();
}

/// WHAT: Queued commands are dropped if the worker never comes up
/// WHY: Stale START/STOP must not be replayed much later
#[tokio::test]
async fn given_unstartable_worker_when_flushing_then_unavailable() {
    // Given: Commands queued against a worker that cannot start
    let (signal_tx, _signal_rx) = mpsc::unbounded_channel();
    let spec = WorkerSpec::new("/nonexistent/voice-typer-worker", Vec::new());
    let mut supervisor = WorkerSupervisor::new(spec, signal_tx);
    supervisor.send(WorkerCommand::Start);

    // When: The retry fires
    let result = supervisor.flush_pending();

    // Then: The queue is dropped with an error
    assert!(matches!(result, Err(CoreError::WorkerUnavailable { .. })));
    assert!(supervisor.retry_deadline().is_none());
}

/// WHAT: A line printed just before exit is delivered ahead of the exit signal
/// WHY: Dropping the handle first would discard the last transcript
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_worker_prints_then_exits_when_signals_read_then_final_precedes_exit() {
    // Given: A worker that prints one transcript and exits at once
    let (signal_tx, mut signal_rx) = mpsc::unbounded_channel();
    let spec = WorkerSpec::new(
        "sh",
        ["-c".to_string(), "echo 'hello there'; exit 0".to_string()],
    );
    let mut supervisor = WorkerSupervisor::new(spec, signal_tx);
    supervisor.ensure_running().unwrap();

    // When: Both signals arrive
    let first = next_signal(&mut signal_rx).await;
    let second = next_signal(&mut signal_rx).await;

    // Then: The transcript comes first, while generation 1 is still current
    assert_eq!(
        first,
        Some(WorkerSignal::Event {
            generation: 1,
            event: WorkerEvent::Final("hello there".to_string()),
        })
    );
    assert!(supervisor.is_current(1));
    assert_eq!(
        second,
        Some(WorkerSignal::Exited {
            generation: 1,
            code: Some(0),
        })
    );
}

/// WHAT: A broken stdin pipe respawns the worker without replaying the command
/// WHY: A stale START written to a fresh worker would begin a ghost recording
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_closed_stdin_when_write_fails_then_respawned_without_replay() {
    // Given: A worker whose first run closes stdin and whose later runs echo
    let marker_dir = tempfile::TempDir::new().unwrap();
    let marker = marker_dir.path().join("spawned");
    let script = format!(
        "if [ -e '{0}' ]; then while read line; do echo \"ECHO $line\"; done; \
         else touch '{0}'; exec 0<&-; sleep 5; fi",
        marker.display()
    );
    let (signal_tx, mut signal_rx) = mpsc::unbounded_channel();
    let mut supervisor =
        WorkerSupervisor::new(WorkerSpec::new("sh", ["-c".to_string(), script]), signal_tx);
    supervisor.ensure_running().unwrap();

    // Wait until the first run has closed its stdin.
    timeout(SIGNAL_TIMEOUT, async {
        while !marker.exists() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    // When: A command is written into the closed pipe
    supervisor.set_hold_keys("ctrl+win+space".to_string());
    supervisor.send(WorkerCommand::Start);
    let failed = next_signal(&mut signal_rx).await;

    // Then: The failure names generation 1
    assert!(
        matches!(failed, Some(WorkerSignal::WriteFailed { generation: 1, .. })),
        "unexpected signal: {failed:?}"
    );

    // When: The failure is handled and a new command is sent
    supervisor.on_write_failed(1, "broken pipe");
    assert!(supervisor.is_current(2));
    supervisor.send(WorkerCommand::Stop);

    // Then: Generation 2 saw the hold combo, then STOP, and never START
    let mut echoed = Vec::new();
    while echoed.len() < 2 {
        match next_signal(&mut signal_rx).await {
            Some(WorkerSignal::Event {
                generation: 2,
                event: WorkerEvent::Final(line),
            }) => echoed.push(line),
            Some(_) => continue,
            None => break,
        }
    }
    assert_eq!(
        echoed,
        vec![
            "ECHO SET_HOLD_KEYS ctrl+win+space".to_string(),
            "ECHO STOP".to_string(),
        ]
    );

    supervisor.shutdown();
}

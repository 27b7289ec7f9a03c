use crate::{CoreResult, protocol::WorkerCommand};

/// Command-side view of the worker used by the session controller.
///
/// Implemented by [`WorkerSupervisor`](super::WorkerSupervisor); tests
/// substitute a recording fake.
pub trait WorkerLink: Send {
    /// Spawn the worker unless a live process already exists.
    fn ensure_running(&mut self) -> CoreResult<()>;

    /// Queue a command for the worker, respawning it if necessary.
    fn send(&mut self, command: WorkerCommand);

    /// Remember the hold combo a freshly spawned worker must be given.
    fn set_hold_keys(&mut self, combo: String);

    /// Whether `generation` identifies the live process.
    fn is_current(&self, generation: u64) -> bool;

    /// Handle an exit signal. Returns `true` when the live process died.
    fn on_exit(&mut self, generation: u64, code: Option<i32>) -> bool;

    /// Handle a failed stdin write by discarding the handle and respawning.
    fn on_write_failed(&mut self, generation: u64, reason: &str);
}

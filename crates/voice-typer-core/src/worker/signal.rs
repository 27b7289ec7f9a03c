use crate::protocol::WorkerEvent;

/// Message from a worker's I/O tasks back to the session loop.
///
/// Every signal carries the generation of the process that produced it so
/// that output from a replaced process can be discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerSignal {
    /// A parsed stdout line.
    Event {
        /// Process generation.
        generation: u64,
        /// The parsed event.
        event: WorkerEvent,
    },
    /// Writing to the worker's stdin failed.
    WriteFailed {
        /// Process generation.
        generation: u64,
        /// Description of the write error.
        reason: String,
    },
    /// The worker process exited.
    Exited {
        /// Process generation.
        generation: u64,
        /// Exit code, if the platform reported one.
        code: Option<i32>,
    },
}

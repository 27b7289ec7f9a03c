//! Transcription worker process management.

mod link;
mod signal;
mod supervisor;

pub use {
    link::WorkerLink,
    signal::WorkerSignal,
    supervisor::{WORKER_RETRY_DELAY, WorkerSpec, WorkerSupervisor},
};

//! Line-oriented control protocol spoken with the transcription worker.
//!
//! Commands go down the worker's stdin as newline-terminated text; events
//! come back on stdout and are framed into lines by [`LineFramer`] before
//! being parsed into [`WorkerEvent`]s.

mod command;
mod event;
mod framer;

pub use {
    command::{RecordingMode, WorkerCommand},
    event::WorkerEvent,
    framer::LineFramer,
};

//! Voice-typer Core Library
//!
//! Platform-independent half of a hotkey-driven dictation tool: the line
//! protocol spoken with an external transcription worker, supervision of
//! that worker process, the recording session state machine, the text
//! injection fallback chain, the recording indicator and transcript history.
//!
//! Everything that touches the desktop sits behind a trait
//! ([`inject::KeyboardBackend`], [`indicator::IndicatorSurface`],
//! [`session::IndicatorPort`], ...) implemented by the application crate.
//!
//! # Example
//!
//! ```no_run
//! use voice_typer_core::{
//!     protocol::{WorkerCommand, WorkerEvent},
//!     LineFramer,
//! };
//!
//! let mut framer = LineFramer::new();
//! for line in framer.feed(b"PARTIAL: hel\nhello world\n") {
//!     println!("{:?}", WorkerEvent::parse(&line));
//! }
//! print!("{}", WorkerCommand::Start.to_line());
//! ```

mod error;
mod history;
mod hotkey;
pub mod indicator;
pub mod inject;
pub mod protocol;
pub mod session;
pub mod worker;

pub use {
    error::CoreError,
    error::Result as CoreResult,
    history::{HistoryEntry, HistoryLog, HistorySink, MAX_HISTORY_ENTRIES},
    hotkey::{Hotkey, Modifiers},
    protocol::LineFramer,
};

#[cfg(test)]
mod tests;

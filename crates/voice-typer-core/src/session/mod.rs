//! Hotkey-driven dictation session state machine.

mod controller;
mod notification;
mod ports;
mod state;

pub use {
    controller::{HOLD_WATCHDOG, SessionController, SessionPorts},
    notification::Notification,
    ports::{IndicatorPort, TranscriptOutput},
    state::SessionState,
};

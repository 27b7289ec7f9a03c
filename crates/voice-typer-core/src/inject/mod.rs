//! Delivery of final transcripts into the focused application.
//!
//! The [`TextInjector`] hides the host application's own windows, waits for
//! focus to settle, then walks an ordered list of strategies until one
//! succeeds:
//!
//! | # | Strategy | Needs |
//! |---|----------|-------|
//! | 1 | type the whole string | keyboard backend |
//! | 2 | type character by character | keyboard backend |
//! | 3 | clipboard write + paste keystroke | clipboard + keyboard |
//! | 4 | clipboard write only | clipboard |
//!
//! Whatever branch wins, the text also ends up on the clipboard.

mod backend;
mod injector;
mod strategy;

pub use {
    backend::{ClipboardBackend, HostWindows, KeyboardBackend, SynthKey},
    injector::{InjectionOutcome, InjectorSettings, TextInjector},
    strategy::InjectionMethod,
};

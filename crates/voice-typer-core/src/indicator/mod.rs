//! Always-on-top recording indicator: visibility and remembered position.

mod controller;
mod position;

pub use {
    controller::{IndicatorController, IndicatorSurface, SAVE_DEBOUNCE},
    position::{IndicatorPosition, IndicatorSize, PositionStore, WorkArea},
};

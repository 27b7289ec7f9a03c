use crate::CoreResult;

use serde::{Deserialize, Serialize};

/// Top-left corner of the indicator in physical screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorPosition {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl IndicatorPosition {
    /// Construct a position.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Outer size of the indicator window in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorSize {
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

/// Usable area of the display the indicator lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkArea {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl WorkArea {
    /// Whether a window of `size` at `position` lies entirely inside.
    pub fn contains(&self, position: IndicatorPosition, size: IndicatorSize) -> bool {
        let left = i64::from(self.x);
        let top = i64::from(self.y);
        let right = left + i64::from(self.width);
        let bottom = top + i64::from(self.height);

        let x = i64::from(position.x);
        let y = i64::from(position.y);

        x >= left
            && y >= top
            && x + i64::from(size.width) <= right
            && y + i64::from(size.height) <= bottom
    }

    /// Position that centres a window of `size`.
    pub fn centered(&self, size: IndicatorSize) -> IndicatorPosition {
        let x = i64::from(self.x) + (i64::from(self.width) - i64::from(size.width)) / 2;
        let y = i64::from(self.y) + (i64::from(self.height) - i64::from(size.height)) / 2;

        IndicatorPosition {
            x: clamp_i32(x),
            y: clamp_i32(y),
        }
    }
}

fn clamp_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

/// Persistence for the user-chosen indicator position.
pub trait PositionStore {
    /// The saved position, if any.
    fn load(&self) -> Option<IndicatorPosition>;
    /// Persist `position`.
    fn save(&mut self, position: IndicatorPosition) -> CoreResult<()>;
}

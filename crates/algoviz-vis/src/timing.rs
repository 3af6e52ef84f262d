//! Speed to delay mapping.
//!
//! Speed is a 0–100 slider value; lower is slower. Each widget family has its
//! own delay bounds and the delay interpolates linearly between them.

use std::time::Duration;

use algoviz_steps::Family;
use serde::Serialize;

/// Highest accepted speed value.
pub const MAX_SPEED: u8 = 100;

/// Inter-step delay bounds in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimingPolicy {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl TimingPolicy {
    pub const SORTING: Self = Self { min_ms: 80, max_ms: 1200 };
    pub const TREE: Self = Self { min_ms: 50, max_ms: 1000 };
    pub const GRAPH: Self = Self { min_ms: 50, max_ms: 1000 };
    pub const PATHFINDING: Self = Self { min_ms: 60, max_ms: 900 };

    pub fn for_family(family: Family) -> Self {
        match family {
            Family::Sorting => Self::SORTING,
            Family::Pathfinding => Self::PATHFINDING,
            Family::Tree => Self::TREE,
            Family::Graph => Self::GRAPH,
        }
    }

    /// `floor(min + (1 - speed/100) * (max - min))`, with speed clamped to
    /// 0–100.
    pub fn delay_ms(&self, speed: u8) -> u64 {
        let slow = u64::from(MAX_SPEED - speed.min(MAX_SPEED));
        self.min_ms + slow * (self.max_ms - self.min_ms) / u64::from(MAX_SPEED)
    }

    pub fn delay(&self, speed: u8) -> Duration {
        Duration::from_millis(self.delay_ms(speed))
    }
}

/// Clamp an untrusted speed value into the slider range.
pub fn clamp_speed(speed: u32) -> u8 {
    speed.min(u32::from(MAX_SPEED)) as u8
}

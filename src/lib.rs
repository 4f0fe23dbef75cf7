//! The Unfair Platform - a trap-filled side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic fixed-step simulation (body physics, hazards, session state machine)
//! - `levels`: Declarative level configuration and load-time validation
//! - `tuning`: Data-driven physics and hazard constants
//! - `render`: Read-only snapshot handed to whatever draws the game

pub mod levels;
pub mod render;
pub mod sim;
pub mod tuning;

pub use levels::{LevelConfig, LevelError, LevelSet};
pub use tuning::Tuning;

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;

    /// Default viewport in pixels
    pub const VIEWPORT_WIDTH: f32 = 960.0;
    pub const VIEWPORT_HEIGHT: f32 = 640.0;

    /// Gap left between a resolved body edge and the tile face it hit
    pub const CONTACT_SKIN: f32 = 0.01;
}

/// Axis-aligned rectangle in pixel space (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect.
    /// Empty rectangles never intersect anything.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.w <= 0.0 || self.h <= 0.0 || other.w <= 0.0 || other.h <= 0.0 {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Grow the rectangle upward by `amount`, keeping its bottom edge fixed
    pub fn extend_up(&self, amount: f32) -> Rect {
        Rect::new(self.x, self.y - amount, self.w, self.h + amount)
    }
}

/// Pixel coordinate to cell index (floor division, negative coordinates map to negative cells)
#[inline]
pub fn cell_index(coord: f32, tile_size: f32) -> i32 {
    (coord / tile_size).floor() as i32
}

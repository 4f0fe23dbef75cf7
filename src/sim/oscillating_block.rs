//! Oscillating crusher block
//!
//! Swings sinusoidally around its anchor cell along one axis. Always lethal,
//! never reset: its phase keeps running across deaths and trap resets.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::consts::TICKS_PER_SECOND;
use crate::levels::OscillatingBlockPlacement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn unit(self) -> Vec2 {
        match self {
            Axis::Horizontal => Vec2::X,
            Axis::Vertical => Vec2::Y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OscillatingBlock {
    pub col: i32,
    pub row: i32,
    pub tile: f32,
    /// Peak displacement in pixels
    pub amplitude: f32,
    /// Phase advance per tick (radians)
    pub speed: f32,
    pub axis: Axis,
    pub phase: f32,
    /// Current top-left corner
    pub pos: Vec2,
}

impl OscillatingBlock {
    pub fn new(placement: &OscillatingBlockPlacement, tile: f32) -> Self {
        let mut block = Self {
            col: placement.col,
            row: placement.row,
            tile,
            amplitude: placement.amplitude_tiles * tile,
            speed: placement.speed / TICKS_PER_SECOND as f32,
            axis: placement.axis,
            phase: 0.0,
            pos: Vec2::ZERO,
        };
        block.pos = block.anchor();
        block
    }

    pub fn anchor(&self) -> Vec2 {
        Vec2::new(self.col as f32 * self.tile, self.row as f32 * self.tile)
    }

    pub fn update(&mut self) {
        self.phase += self.speed;
        self.pos = self.anchor() + self.axis.unit() * (self.phase.sin() * self.amplitude);
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.tile, self.tile)
    }
}

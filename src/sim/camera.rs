//! Smoothed follow camera

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Top-left of the view in world pixels
    pub pos: Vec2,
    pub target: Vec2,
    pub viewport: Vec2,
}

impl Camera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            pos: Vec2::ZERO,
            target: Vec2::ZERO,
            viewport,
        }
    }

    /// Aim so the rectangle's center sits in the middle of the view
    pub fn update_target(&mut self, subject: &Rect) {
        let center = Vec2::new(subject.x + subject.w / 2.0, subject.y + subject.h / 2.0);
        self.target = center - self.viewport / 2.0;
    }

    /// Move a fraction of the way toward the target, never past the world origin
    pub fn lerp_to_target(&mut self, factor: f32) {
        self.pos += (self.target - self.pos) * factor;
        self.pos = self.pos.max(Vec2::ZERO);
    }

    /// Jump straight to the subject with no easing
    pub fn snap_to(&mut self, subject: &Rect) {
        self.update_target(subject);
        self.pos = self.target.max(Vec2::ZERO);
    }

    pub fn follow(&mut self, subject: &Rect, factor: f32) {
        self.update_target(subject);
        self.lerp_to_target(factor);
    }

    /// World rectangle currently in view
    pub fn view_rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.viewport.x, self.viewport.y)
    }
}

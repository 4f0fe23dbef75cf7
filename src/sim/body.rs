//! Player body kinematics and tile collision resolution
//!
//! Horizontal and vertical passes are resolved independently against a
//! `SolidMap`, one axis at a time, so a single step can never diverge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::SolidMap;
use super::tick::TickInput;
use crate::consts::CONTACT_SKIN;
use crate::tuning::Tuning;
use crate::{Rect, cell_index};

/// How far below the feet a body that is not rising looks for ground
const GROUND_PROBE: f32 = 2.0 * CONTACT_SKIN;

/// Horizontal speed above which the body counts as running
const RUN_THRESHOLD: f32 = 0.2;

/// Sprite selection for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimState {
    Idle,
    RunLeft,
    RunRight,
    /// Jumping, falling after a jump, or dying
    Airborne,
}

/// The player's kinematic state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner in pixels
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub size: Vec2,
    pub on_ground: bool,
    /// Remaining jump grace after leaving the ground
    pub coyote_ticks: u32,
    pub jump_held: bool,
    pub is_dying: bool,
    /// Set by a jump, cleared on landing
    pub jumping: bool,
}

impl Body {
    /// Standing at `spawn`, at rest, with a full coyote window
    pub fn new(spawn: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos: spawn,
            vel: Vec2::ZERO,
            size: Vec2::new(tuning.player_width, tuning.player_height),
            on_ground: true,
            coyote_ticks: tuning.coyote_ticks,
            jump_held: false,
            is_dying: false,
            jumping: false,
        }
    }

    /// Put the body back at `spawn`, standing and at rest
    pub fn reset(&mut self, spawn: Vec2, tuning: &Tuning) {
        *self = Self::new(spawn, tuning);
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn anim_state(&self) -> AnimState {
        if self.jumping || self.is_dying {
            AnimState::Airborne
        } else if self.vel.x > RUN_THRESHOLD {
            AnimState::RunRight
        } else if self.vel.x < -RUN_THRESHOLD {
            AnimState::RunLeft
        } else {
            AnimState::Idle
        }
    }

    /// One live physics tick: gravity, input, horizontal pass, vertical pass, jump
    pub fn step(&mut self, input: &TickInput, map: &impl SolidMap, tuning: &Tuning) {
        self.apply_gravity(tuning);

        self.jump_held = input.jump_held;
        match input.horizontal() {
            0 => self.apply_friction(tuning),
            dir => self.apply_horizontal(dir as f32 * tuning.accel, tuning),
        }

        self.move_horizontal(map);
        self.move_vertical(map, tuning);

        if input.jump_pressed {
            self.try_jump(tuning);
        }

        if self.on_ground {
            self.jumping = false;
        }
    }

    fn apply_gravity(&mut self, tuning: &Tuning) {
        if !self.on_ground {
            self.vel.y += tuning.gravity;
        }
        self.vel.y = self.vel.y.min(tuning.max_fall);
    }

    /// Accelerate toward a direction; airborne control is reduced unless jump is held
    pub fn apply_horizontal(&mut self, accel: f32, tuning: &Tuning) {
        let control = if self.on_ground || self.jump_held {
            1.0
        } else {
            tuning.air_control
        };
        self.vel.x = (self.vel.x + accel * control).clamp(-tuning.max_speed, tuning.max_speed);
    }

    pub fn apply_friction(&mut self, tuning: &Tuning) {
        self.vel.x *= if self.on_ground {
            tuning.ground_friction
        } else {
            tuning.air_friction
        };
        if self.vel.x.abs() < tuning.friction_snap {
            self.vel.x = 0.0;
        }
    }

    /// Jump if grounded or still inside the coyote window. Returns whether it fired.
    pub fn try_jump(&mut self, tuning: &Tuning) -> bool {
        if !self.on_ground && self.coyote_ticks == 0 {
            return false;
        }
        self.vel.y = tuning.jump_velocity;
        self.on_ground = false;
        self.coyote_ticks = 0;
        self.jumping = true;
        true
    }

    fn move_horizontal(&mut self, map: &impl SolidMap) {
        self.pos.x += self.vel.x;
        if self.vel.x == 0.0 {
            return;
        }

        let ts = map.tile_size();
        let left = cell_index(self.pos.x, ts);
        let right = cell_index(self.pos.x + self.size.x, ts);
        let top = cell_index(self.pos.y, ts);
        let bottom = cell_index(self.pos.y + self.size.y - 1.0, ts);

        for row in top..=bottom {
            if self.vel.x > 0.0 && map.is_solid(right, row) {
                self.pos.x = right as f32 * ts - self.size.x - CONTACT_SKIN;
                self.vel.x = 0.0;
                break;
            }
            if self.vel.x < 0.0 && map.is_solid(left, row) {
                self.pos.x = (left + 1) as f32 * ts + CONTACT_SKIN;
                self.vel.x = 0.0;
                break;
            }
        }
    }

    fn move_vertical(&mut self, map: &impl SolidMap, tuning: &Tuning) {
        self.pos.y += self.vel.y;

        let ts = map.tile_size();
        let rising = self.vel.y < 0.0;
        let left = cell_index(self.pos.x, ts);
        let right = cell_index(self.pos.x + self.size.x - 1.0, ts);
        let top = cell_index(self.pos.y, ts);
        let bottom = cell_index(self.pos.y + self.size.y + GROUND_PROBE, ts);
        self.on_ground = false;

        for col in left..=right {
            if !rising && map.is_solid(col, bottom) {
                self.pos.y = bottom as f32 * ts - self.size.y - CONTACT_SKIN;
                self.vel.y = 0.0;
                self.on_ground = true;
                self.coyote_ticks = tuning.coyote_ticks;
                break;
            }
            if rising && map.is_solid(col, top) {
                self.pos.y = (top + 1) as f32 * ts + CONTACT_SKIN;
                self.vel.y = 0.0;
                break;
            }
        }

        if !self.on_ground {
            self.coyote_ticks = self.coyote_ticks.saturating_sub(1);
        }
    }

    /// Enter the death fall: one upward pop, then no more collision
    pub fn start_dying(&mut self, tuning: &Tuning) {
        self.is_dying = true;
        self.on_ground = false;
        self.vel.y = tuning.death_pop;
    }

    /// Death-fall tick: gravity and motion only, passing through everything
    pub fn step_dying(&mut self, tuning: &Tuning) {
        self.vel.y = (self.vel.y + tuning.gravity).min(tuning.max_fall);
        self.pos += self.vel;
    }
}

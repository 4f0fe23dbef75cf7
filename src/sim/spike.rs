//! Retractable spike trap
//!
//! Hidden in the floor until the player comes near, then eases out of the
//! supporting tile. `offset` is how far the spike is still retracted:
//! `max_height` when hidden, `0` when fully extended.

use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpikeState {
    /// Retracted, waiting for the player
    Armed,
    /// Easing out toward full extension
    Triggering,
    /// Fully extended
    Deployed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spike {
    /// Column of the supporting cell
    pub col: i32,
    /// Row of the supporting cell; the spike rises from its top face
    pub row: i32,
    pub tile: f32,
    pub max_height: f32,
    pub offset: f32,
    pub state: SpikeState,
}

impl Spike {
    pub fn new(col: i32, row: i32, tile: f32, max_height: f32) -> Self {
        Self {
            col,
            row,
            tile,
            max_height,
            offset: max_height,
            state: SpikeState::Armed,
        }
    }

    /// Back to the armed, fully retracted state
    pub fn reset(&mut self) {
        self.offset = self.max_height;
        self.state = SpikeState::Armed;
    }

    /// Horizontal center in pixels
    pub fn center_x(&self) -> f32 {
        self.col as f32 * self.tile + self.tile / 2.0
    }

    /// Visible height above the supporting tile
    pub fn extension(&self) -> f32 {
        self.max_height - self.offset
    }

    /// Advance one tick. Returns true on the tick the trap is sprung.
    pub fn update(&mut self, player: &Rect, tuning: &Tuning) -> bool {
        let player_center = player.x + player.w / 2.0;
        let mut sprung = false;

        if self.state == SpikeState::Armed
            && (player_center - self.center_x()).abs() < tuning.spike_trigger_radius
        {
            self.state = SpikeState::Triggering;
            sprung = true;
        }

        if self.state == SpikeState::Triggering {
            self.offset += (0.0 - self.offset) * tuning.spike_ease;
            if self.offset.abs() < tuning.spike_snap_epsilon {
                self.offset = 0.0;
                self.state = SpikeState::Deployed;
            }
        }

        sprung
    }

    /// Lethal once sprung and mostly extended
    pub fn is_lethal(&self, tuning: &Tuning) -> bool {
        self.state != SpikeState::Armed && self.offset < self.max_height * tuning.spike_lethal_fraction
    }

    /// Current hitbox: inset horizontally, rising from the top of the supporting cell
    pub fn rect(&self, tuning: &Tuning) -> Rect {
        let height = self.extension();
        let base_y = self.row as f32 * self.tile;
        Rect::new(
            self.col as f32 * self.tile + tuning.spike_inset,
            base_y - height,
            self.tile - 2.0 * tuning.spike_inset,
            height,
        )
    }
}

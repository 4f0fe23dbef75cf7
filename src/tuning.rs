//! Physics and hazard tuning
//!
//! Every gameplay constant lives here so balance can be adjusted from a JSON
//! file without touching the simulation. Missing fields fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

/// Gameplay constants, all expressed in pixels and ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Body ===
    /// Downward acceleration per tick while airborne
    pub gravity: f32,
    /// Terminal fall speed (pixels/tick)
    pub max_fall: f32,
    /// Launch velocity of a jump (negative = up)
    pub jump_velocity: f32,
    /// Ticks after leaving the ground during which a jump still succeeds
    pub coyote_ticks: u32,
    /// Horizontal acceleration per tick of held input
    pub accel: f32,
    /// Horizontal speed cap
    pub max_speed: f32,
    /// Airborne acceleration multiplier when jump is not held
    pub air_control: f32,
    /// Velocity multiplier per tick with no input, on the ground
    pub ground_friction: f32,
    /// Velocity multiplier per tick with no input, in the air
    pub air_friction: f32,
    /// Horizontal speeds below this snap to zero under friction
    pub friction_snap: f32,
    /// Vertical velocity applied once when the player dies
    pub death_pop: f32,
    pub player_width: f32,
    pub player_height: f32,

    // === Retractable spike ===
    /// Horizontal distance from spike center that arms the trap
    pub spike_trigger_radius: f32,
    /// Fraction of the remaining offset closed each tick
    pub spike_ease: f32,
    /// Fully retracted offset (spike hidden)
    pub spike_max_height: f32,
    /// Offset below which the spike snaps fully out
    pub spike_snap_epsilon: f32,
    /// Spike is lethal once offset drops below this fraction of max height
    pub spike_lethal_fraction: f32,
    /// Horizontal inset of the spike hitbox on each side
    pub spike_inset: f32,

    // === Collapsing tile ===
    /// Ticks a broken tile stays gone
    pub tile_respawn_ticks: u32,
    /// Ticks an animated tile takes to fade out
    pub tile_fade_ticks: u32,
    /// Height of the contact band above a tile that counts as standing on it
    pub tile_contact_band: f32,

    // === Session ===
    pub intro_ticks: u32,
    pub fade_ticks: u32,
    pub death_ticks: u32,
    /// Distance below the level bottom at which the player is considered lost
    pub fall_death_margin: f32,

    // === Camera ===
    pub camera_lerp: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.55,
            max_fall: 12.0,
            jump_velocity: -10.2,
            coyote_ticks: 10,
            accel: 0.45,
            max_speed: 5.2,
            air_control: 0.5,
            ground_friction: 0.7,
            air_friction: 0.95,
            friction_snap: 0.1,
            death_pop: -3.0,
            player_width: 26.0,
            player_height: 30.0,

            spike_trigger_radius: 50.0,
            spike_ease: 0.25,
            spike_max_height: 24.0,
            spike_snap_epsilon: 1.0,
            spike_lethal_fraction: 0.3,
            spike_inset: 4.0,

            tile_respawn_ticks: 180,
            tile_fade_ticks: 30,
            tile_contact_band: 1.0,

            intro_ticks: 120,
            fade_ticks: 60,
            death_ticks: 60,
            fall_death_margin: 200.0,

            camera_lerp: 0.08,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        log::info!(
            "Loaded tuning (gravity {}, max speed {}, jump {})",
            tuning.gravity,
            tuning.max_speed,
            tuning.jump_velocity
        );
        Ok(tuning)
    }
}

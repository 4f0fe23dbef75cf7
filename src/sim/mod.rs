//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed 60 Hz timestep only
//! - Stable iteration order (hazards update in level-definition order)
//! - No rendering or platform dependencies

pub mod body;
pub mod camera;
pub mod collapsing_tile;
pub mod grid;
pub mod level;
pub mod oscillating_block;
pub mod spike;
pub mod state;
pub mod tick;

pub use body::{AnimState, Body};
pub use camera::Camera;
pub use collapsing_tile::{CollapsingTile, TilePhase};
pub use grid::{Cell, Grid, SolidMap};
pub use level::{DeathCause, Level};
pub use oscillating_block::{Axis, OscillatingBlock};
pub use spike::{Spike, SpikeState};
pub use state::{Fade, GameEvent, Session, SessionPhase};
pub use tick::{InputLatch, TickInput, tick};

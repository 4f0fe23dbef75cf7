//! Collapsing floor tile
//!
//! Solid until the player stands on it, then gone for a while. Immediate tiles
//! break on first contact; animated tiles fade out first and only stop being
//! solid once the fade completes.

use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TilePhase {
    Solid,
    /// Animated tiles only: still solid, fading out
    Fading { elapsed: u32 },
    /// Not solid; `timer` ticks until it returns
    Broken { timer: u32 },
}

/// What happened to a tile during one update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileChange {
    StartedFading,
    Broke,
    Restored,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollapsingTile {
    pub col: i32,
    pub row: i32,
    pub tile: f32,
    pub animated: bool,
    pub phase: TilePhase,
    /// Render opacity, 1 while intact
    pub alpha: f32,
}

impl CollapsingTile {
    pub fn new(col: i32, row: i32, tile: f32, animated: bool) -> Self {
        Self {
            col,
            row,
            tile,
            animated,
            phase: TilePhase::Solid,
            alpha: 1.0,
        }
    }

    pub fn reset(&mut self) {
        self.phase = TilePhase::Solid;
        self.alpha = 1.0;
    }

    pub fn is_solid(&self) -> bool {
        !matches!(self.phase, TilePhase::Broken { .. })
    }

    /// Animated tile that has finished fading and not yet respawned
    pub fn fade_complete(&self) -> bool {
        self.animated && !self.is_solid()
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            self.col as f32 * self.tile,
            self.row as f32 * self.tile,
            self.tile,
            self.tile,
        )
    }

    /// Advance one tick against the player's rectangle
    pub fn update(&mut self, player: &Rect, tuning: &Tuning) -> Option<TileChange> {
        match self.phase {
            TilePhase::Solid => {
                let contact = self.rect().extend_up(tuning.tile_contact_band);
                if !contact.intersects(player) {
                    return None;
                }
                if self.animated {
                    self.phase = TilePhase::Fading { elapsed: 0 };
                    self.advance_fade(tuning);
                    Some(TileChange::StartedFading)
                } else {
                    self.break_now(tuning);
                    Some(TileChange::Broke)
                }
            }
            TilePhase::Fading { .. } => self.advance_fade(tuning),
            TilePhase::Broken { timer } => {
                let timer = timer.saturating_sub(1);
                if timer == 0 {
                    self.reset();
                    Some(TileChange::Restored)
                } else {
                    self.phase = TilePhase::Broken { timer };
                    None
                }
            }
        }
    }

    fn advance_fade(&mut self, tuning: &Tuning) -> Option<TileChange> {
        let TilePhase::Fading { elapsed } = self.phase else {
            return None;
        };
        let elapsed = elapsed + 1;
        let duration = tuning.tile_fade_ticks.max(1);
        if elapsed >= duration {
            self.break_now(tuning);
            return Some(TileChange::Broke);
        }
        self.alpha = 1.0 - elapsed as f32 / duration as f32;
        self.phase = TilePhase::Fading { elapsed };
        None
    }

    fn break_now(&mut self, tuning: &Tuning) {
        self.alpha = 0.0;
        self.phase = TilePhase::Broken {
            timer: tuning.tile_respawn_ticks,
        };
    }
}

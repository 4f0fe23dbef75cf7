//! A loaded level: grid plus hazard collections
//!
//! Built fresh from configuration on every load; nothing carries over from the
//! previous level. Collapsing tiles override the grid cell they sit on, so the
//! body stands on them only while they are intact.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collapsing_tile::{CollapsingTile, TileChange};
use super::grid::{Cell, Grid, SolidMap};
use super::oscillating_block::OscillatingBlock;
use super::spike::Spike;
use crate::Rect;
use crate::levels::{LevelConfig, LevelError, SpawnPoint};
use crate::tuning::Tuning;

/// Why the player died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Dropped past the bottom of the level
    FellOut,
    Spike,
    Crushed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// 1-based level number
    pub number: usize,
    pub name: String,
    pub tagline: String,
    grid: Grid,
    spawn: SpawnPoint,
    spikes: Vec<Spike>,
    tiles: Vec<CollapsingTile>,
    blocks: Vec<OscillatingBlock>,
    /// Row-major index into `tiles` for cells a collapsing tile occupies
    tile_at: Vec<Option<usize>>,
}

impl Level {
    /// Validate and build a level
    pub fn load(number: usize, config: &LevelConfig, tuning: &Tuning) -> Result<Self, LevelError> {
        config.validate()?;
        Ok(Self::build(number, config, tuning))
    }

    /// Build from an already validated configuration
    pub(crate) fn build(number: usize, config: &LevelConfig, tuning: &Tuning) -> Self {
        let grid = Grid::from_config(config);
        let ts = config.tile_size;

        let spikes = config
            .spikes
            .iter()
            .map(|s| Spike::new(s.col, s.row, ts, tuning.spike_max_height))
            .collect();
        let tiles: Vec<CollapsingTile> = config
            .collapsing_tiles
            .iter()
            .map(|t| CollapsingTile::new(t.col, t.row, ts, t.animated))
            .collect();
        let blocks = config
            .oscillating_blocks
            .iter()
            .map(|b| OscillatingBlock::new(b, ts))
            .collect();

        let mut tile_at = vec![None; (grid.cols() * grid.rows()) as usize];
        for (i, tile) in tiles.iter().enumerate() {
            if let Some(slot) = cell_slot(&grid, tile.col, tile.row) {
                tile_at[slot] = Some(i);
            }
        }

        Self {
            number,
            name: config.name.clone(),
            tagline: config.tagline.clone(),
            grid,
            spawn: config.spawn,
            spikes,
            tiles,
            blocks,
            tile_at,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn spikes(&self) -> &[Spike] {
        &self.spikes
    }

    pub fn collapsing_tiles(&self) -> &[CollapsingTile] {
        &self.tiles
    }

    pub fn oscillating_blocks(&self) -> &[OscillatingBlock] {
        &self.blocks
    }

    /// Top-left corner for a body of the tuned size standing on the spawn row
    pub fn spawn_position(&self, tuning: &Tuning) -> Vec2 {
        let ground_y = self.spawn.ground_row as f32 * self.grid.tile_size();
        Vec2::new(self.spawn.x, ground_y - tuning.player_height)
    }

    /// Advance every hazard one tick against the player's rectangle
    pub fn update(&mut self, player: &Rect, tuning: &Tuning) {
        for tile in &mut self.tiles {
            match tile.update(player, tuning) {
                Some(TileChange::StartedFading) => {
                    log::debug!("Tile ({}, {}) fading", tile.col, tile.row)
                }
                Some(TileChange::Broke) => log::debug!("Tile ({}, {}) collapsed", tile.col, tile.row),
                Some(TileChange::Restored) => {
                    log::debug!("Tile ({}, {}) restored", tile.col, tile.row)
                }
                None => {}
            }
        }
        for spike in &mut self.spikes {
            if spike.update(player, tuning) {
                log::debug!("Spike ({}, {}) sprung", spike.col, spike.row);
            }
        }
        for block in &mut self.blocks {
            block.update();
        }
    }

    /// Restore spikes and collapsing tiles; oscillating blocks keep their phase
    pub fn reset_traps(&mut self) {
        for spike in &mut self.spikes {
            spike.reset();
        }
        for tile in &mut self.tiles {
            tile.reset();
        }
    }

    pub fn reached_goal(&self, player: &Rect) -> bool {
        self.grid.overlaps_kind(player, Cell::Goal)
    }

    /// First lethal condition the player meets, if any
    pub fn fatal_contact(&self, player: &Rect, tuning: &Tuning) -> Option<DeathCause> {
        if player.bottom() > self.grid.pixel_height() + tuning.fall_death_margin {
            return Some(DeathCause::FellOut);
        }
        if self
            .spikes
            .iter()
            .any(|s| s.is_lethal(tuning) && s.rect(tuning).intersects(player))
        {
            return Some(DeathCause::Spike);
        }
        if self.blocks.iter().any(|b| b.rect().intersects(player)) {
            return Some(DeathCause::Crushed);
        }
        None
    }
}

fn cell_slot(grid: &Grid, col: i32, row: i32) -> Option<usize> {
    if (0..grid.cols()).contains(&col) && (0..grid.rows()).contains(&row) {
        Some((row * grid.cols() + col) as usize)
    } else {
        None
    }
}

impl SolidMap for Level {
    fn tile_size(&self) -> f32 {
        self.grid.tile_size()
    }

    fn is_solid(&self, col: i32, row: i32) -> bool {
        match cell_slot(&self.grid, col, row).and_then(|slot| self.tile_at[slot]) {
            Some(i) => self.tiles[i].is_solid(),
            None => self.grid.is_solid(col, row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelSet;
    use crate::sim::spike::SpikeState;

    fn load(number: usize) -> (Level, Tuning) {
        let tuning = Tuning::default();
        let levels = LevelSet::builtin().unwrap();
        let level = Level::load(number, levels.get(number).unwrap(), &tuning).unwrap();
        (level, tuning)
    }

    #[test]
    fn test_level_one_contents() {
        let (level, tuning) = load(1);
        assert_eq!(level.spikes().len(), 5);
        assert!(level.collapsing_tiles().is_empty());
        assert!(level.oscillating_blocks().is_empty());
        assert_eq!(level.spawn_position(&tuning), Vec2::new(64.0, 32.0 * 32.0 - 30.0));
    }

    #[test]
    fn test_collapsing_tile_overrides_grid() {
        let (mut level, tuning) = load(2);
        // Col 8 is solid floor in the grid and carries a collapsing tile
        assert!(level.grid().is_solid(8, 32));
        assert!(level.is_solid(8, 32));

        let feet = Rect::new(8.0 * 32.0 + 2.0, 32.0 * 32.0 - 30.0 - 0.01, 26.0, 30.0);
        level.update(&feet, &tuning);
        assert!(!level.is_solid(8, 32));
        assert!(level.grid().is_solid(8, 32));
        // Out-of-range lookups stay harmless
        assert!(!level.is_solid(-1, 32));
        assert!(!level.is_solid(8, 99));
    }

    #[test]
    fn test_spike_contact_is_fatal_only_when_extended() {
        let (mut level, tuning) = load(1);
        // Standing over the spike on col 8
        let player = Rect::new(8.0 * 32.0 + 3.0, 32.0 * 32.0 - 30.0 - 0.01, 26.0, 30.0);
        assert_eq!(level.fatal_contact(&player, &tuning), None);

        level.update(&player, &tuning);
        assert_eq!(level.spikes()[0].state, SpikeState::Triggering);
        for _ in 0..10 {
            level.update(&player, &tuning);
        }
        assert_eq!(level.fatal_contact(&player, &tuning), Some(DeathCause::Spike));

        level.reset_traps();
        assert!(level.spikes().iter().all(|s| s.state == SpikeState::Armed));
        assert_eq!(level.fatal_contact(&player, &tuning), None);
    }

    #[test]
    fn test_fall_out_of_level() {
        let (level, tuning) = load(1);
        let limit = level.grid().pixel_height() + tuning.fall_death_margin;
        let above = Rect::new(100.0, limit - 30.0, 26.0, 30.0);
        assert_eq!(level.fatal_contact(&above, &tuning), None);
        let below = Rect::new(100.0, limit - 29.0, 26.0, 30.0);
        assert_eq!(level.fatal_contact(&below, &tuning), Some(DeathCause::FellOut));
    }

    #[test]
    fn test_goal_detection() {
        let (level, _) = load(1);
        let in_pit = Rect::new(28.0 * 32.0 + 2.0, 32.0 * 32.0 - 20.0, 26.0, 30.0);
        assert!(level.reached_goal(&in_pit));
        let on_floor = Rect::new(20.0 * 32.0, 32.0 * 32.0 - 30.0, 26.0, 30.0);
        assert!(!level.reached_goal(&on_floor));
    }

    #[test]
    fn test_blocks_keep_phase_across_trap_reset() {
        let (mut level, tuning) = load(3);
        let away = Rect::new(0.0, 0.0, 26.0, 30.0);
        for _ in 0..30 {
            level.update(&away, &tuning);
        }
        let phase = level.oscillating_blocks()[0].phase;
        assert!(phase > 0.0);
        level.reset_traps();
        assert_eq!(level.oscillating_blocks()[0].phase, phase);
    }

    #[test]
    fn test_block_contact_is_fatal() {
        let (level, tuning) = load(3);
        let block = level.oscillating_blocks()[0].rect();
        let player = Rect::new(block.x + 2.0, block.y + 2.0, 26.0, 30.0);
        assert_eq!(level.fatal_contact(&player, &tuning), Some(DeathCause::Crushed));
    }
}

//! Declarative level content
//!
//! Levels are plain data loaded wholesale by index. Geometry is validated when
//! a `LevelSet` is built, so the simulation never sees out-of-bounds placements.

use serde::{Deserialize, Serialize};

use crate::sim::oscillating_block::Axis;

/// Upper bound on `cols * rows` for a single level
pub const MAX_CELLS: i32 = 1 << 20;

/// Level data shipped with the game
const BUILTIN_LEVELS: &str = include_str!("../../levels/builtin.json");

/// Configuration failures, reported at load time
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("level data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level set contains no levels")]
    Empty,
    #[error("level '{level}': grid must be at least 1x1 with a positive tile size")]
    BadDimensions { level: String },
    #[error("level '{level}': {cols}x{rows} grid exceeds {max} cells", max = MAX_CELLS)]
    TooLarge { level: String, cols: i32, rows: i32 },
    #[error("level '{level}': {what} at col {col}, row {row} lies outside the grid")]
    OutOfBounds {
        level: String,
        what: &'static str,
        col: i32,
        row: i32,
    },
    #[error("level '{level}': span on row {row} has an invalid range or gap")]
    BadSpan { level: String, row: i32 },
    #[error("level '{level}': spawn x {x} / ground row {ground_row} lies outside the grid")]
    SpawnOutOfBounds {
        level: String,
        x: f32,
        ground_row: i32,
    },
}

/// A single grid cell reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPos {
    pub col: i32,
    pub row: i32,
}

/// A horizontal run of cells on one row, `from` inclusive, `to` exclusive.
/// With `gap_every = n`, columns divisible by `n` are left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSpan {
    pub row: i32,
    pub from: i32,
    pub to: i32,
    #[serde(default)]
    pub gap_every: Option<i32>,
}

impl CellSpan {
    /// Cells covered by this span as `(col, row)`
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let gap = self.gap_every.filter(|n| *n > 0);
        (self.from..self.to)
            .filter(move |c| gap.is_none_or(|n| c % n != 0))
            .map(move |c| (c, self.row))
    }
}

/// Where the player appears on (re)load and respawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Left edge of the body in pixels
    pub x: f32,
    /// Row the body stands on; the body's bottom rests on this row's top face
    pub ground_row: i32,
}

/// A collapsing floor tile placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapsingTilePlacement {
    pub col: i32,
    pub row: i32,
    /// Fade out before breaking instead of vanishing at once
    #[serde(default)]
    pub animated: bool,
}

/// An oscillating block placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OscillatingBlockPlacement {
    pub col: i32,
    pub row: i32,
    pub amplitude_tiles: f32,
    /// Phase speed in radians per second
    pub speed: f32,
    pub axis: Axis,
}

/// Static description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    #[serde(default)]
    pub tagline: String,
    pub cols: i32,
    pub rows: i32,
    pub tile_size: f32,
    pub spawn: SpawnPoint,
    #[serde(default)]
    pub solids: Vec<CellSpan>,
    #[serde(default)]
    pub goals: Vec<CellSpan>,
    #[serde(default)]
    pub spikes: Vec<CellPos>,
    #[serde(default)]
    pub collapsing_tiles: Vec<CollapsingTilePlacement>,
    #[serde(default)]
    pub oscillating_blocks: Vec<OscillatingBlockPlacement>,
}

impl LevelConfig {
    fn in_bounds(&self, col: i32, row: i32) -> bool {
        (0..self.cols).contains(&col) && (0..self.rows).contains(&row)
    }

    fn check_cell(&self, what: &'static str, col: i32, row: i32) -> Result<(), LevelError> {
        if self.in_bounds(col, row) {
            Ok(())
        } else {
            Err(LevelError::OutOfBounds {
                level: self.name.clone(),
                what,
                col,
                row,
            })
        }
    }

    fn check_span(&self, what: &'static str, span: &CellSpan) -> Result<(), LevelError> {
        if span.from > span.to || span.gap_every.is_some_and(|n| n <= 0) {
            return Err(LevelError::BadSpan {
                level: self.name.clone(),
                row: span.row,
            });
        }
        if span.from == span.to {
            return Ok(());
        }
        self.check_cell(what, span.from, span.row)?;
        self.check_cell(what, span.to - 1, span.row)
    }

    /// Reject any geometry that falls outside the grid
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.cols <= 0
            || self.rows <= 0
            || !self.tile_size.is_finite()
            || self.tile_size <= 0.0
        {
            return Err(LevelError::BadDimensions {
                level: self.name.clone(),
            });
        }
        if self.cols.checked_mul(self.rows).is_none_or(|n| n > MAX_CELLS) {
            return Err(LevelError::TooLarge {
                level: self.name.clone(),
                cols: self.cols,
                rows: self.rows,
            });
        }

        let pixel_width = self.cols as f32 * self.tile_size;
        let spawn = self.spawn;
        if !(0.0..pixel_width).contains(&spawn.x) || !(0..self.rows).contains(&spawn.ground_row) {
            return Err(LevelError::SpawnOutOfBounds {
                level: self.name.clone(),
                x: spawn.x,
                ground_row: spawn.ground_row,
            });
        }

        for span in &self.solids {
            self.check_span("solid span", span)?;
        }
        for span in &self.goals {
            self.check_span("goal span", span)?;
        }
        for spike in &self.spikes {
            self.check_cell("spike", spike.col, spike.row)?;
        }
        for tile in &self.collapsing_tiles {
            self.check_cell("collapsing tile", tile.col, tile.row)?;
        }
        for block in &self.oscillating_blocks {
            self.check_cell("oscillating block", block.col, block.row)?;
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct LevelFile {
    levels: Vec<LevelConfig>,
}

/// An ordered, validated collection of levels. Level numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LevelConfig>", into = "Vec<LevelConfig>")]
pub struct LevelSet {
    levels: Vec<LevelConfig>,
}

impl LevelSet {
    /// Validate every level; the set is rejected as a whole on the first error
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::Empty);
        }
        for level in &levels {
            level.validate()?;
        }
        Ok(Self { levels })
    }

    /// Parse a `{ "levels": [...] }` document
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let file: LevelFile = serde_json::from_str(json)?;
        let set = Self::new(file.levels)?;
        log::info!("Loaded {} levels", set.len());
        Ok(set)
    }

    /// The three levels the game ships with
    pub fn builtin() -> Result<Self, LevelError> {
        Self::from_json(BUILTIN_LEVELS)
    }

    /// Level 1; a set always holds at least one level
    pub fn first(&self) -> &LevelConfig {
        &self.levels[0]
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Look up a level by 1-based number
    pub fn get(&self, number: usize) -> Option<&LevelConfig> {
        number.checked_sub(1).and_then(|i| self.levels.get(i))
    }

    /// Number of the level after `number`, wrapping to 1 after the last
    pub fn next_number(&self, number: usize) -> usize {
        if number >= self.levels.len() { 1 } else { number + 1 }
    }
}

impl TryFrom<Vec<LevelConfig>> for LevelSet {
    type Error = LevelError;

    fn try_from(levels: Vec<LevelConfig>) -> Result<Self, Self::Error> {
        Self::new(levels)
    }
}

impl From<LevelSet> for Vec<LevelConfig> {
    fn from(set: LevelSet) -> Self {
        set.levels
    }
}

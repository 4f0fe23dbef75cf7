//! Static tile grid and solidity queries
//!
//! Lookups outside the grid are never an error: they read as `Cell::Empty`, so
//! the level has no implicit boundary walls.

use serde::{Deserialize, Serialize};

use crate::levels::LevelConfig;
use crate::{Rect, cell_index};

/// Classification of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    Solid = 1,
    Goal = 2,
}

/// Anything the body can be resolved against
pub trait SolidMap {
    /// Pixels per cell
    fn tile_size(&self) -> f32;
    /// Whether the cell blocks movement; out-of-range cells never do
    fn is_solid(&self, col: i32, row: i32) -> bool;
}

/// Fixed `rows x cols` tile classification for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cols: i32,
    rows: i32,
    tile_size: f32,
    /// Row-major cells
    cells: Vec<Cell>,
}

impl Grid {
    /// An all-empty grid
    pub fn new(cols: i32, rows: i32, tile_size: f32) -> Self {
        let cols = cols.max(0);
        let rows = rows.max(0);
        Self {
            cols,
            rows,
            tile_size,
            cells: vec![Cell::Empty; (cols * rows) as usize],
        }
    }

    /// Build the grid for a level. Goal spans are written after solids and win on overlap.
    pub fn from_config(config: &LevelConfig) -> Self {
        let mut grid = Self::new(config.cols, config.rows, config.tile_size);
        for span in &config.solids {
            for (col, row) in span.cells() {
                grid.set(col, row, Cell::Solid);
            }
        }
        for span in &config.goals {
            for (col, row) in span.cells() {
                grid.set(col, row, Cell::Goal);
            }
        }
        grid
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if (0..self.cols).contains(&col) && (0..self.rows).contains(&row) {
            Some((row * self.cols + col) as usize)
        } else {
            None
        }
    }

    /// Out-of-range writes are ignored
    pub(crate) fn set(&mut self, col: i32, row: i32, cell: Cell) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = cell;
        }
    }

    pub fn cell(&self, col: i32, row: i32) -> Cell {
        self.index(col, row)
            .map(|i| self.cells[i])
            .unwrap_or(Cell::Empty)
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn pixel_width(&self) -> f32 {
        self.cols as f32 * self.tile_size
    }

    pub fn pixel_height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    /// Pixel rectangle of a cell
    pub fn cell_rect(&self, col: i32, row: i32) -> Rect {
        Rect::new(
            col as f32 * self.tile_size,
            row as f32 * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    /// In-range cells that strictly overlap `rect`, row by row
    pub fn cells_overlapping(&self, rect: &Rect) -> impl Iterator<Item = (i32, i32)> + '_ {
        let ts = self.tile_size;
        let col_min = cell_index(rect.x, ts).max(0);
        let col_max = ((rect.right() / ts).ceil() as i32 - 1).min(self.cols - 1);
        let row_min = cell_index(rect.y, ts).max(0);
        let row_max = ((rect.bottom() / ts).ceil() as i32 - 1).min(self.rows - 1);
        (row_min..=row_max).flat_map(move |row| (col_min..=col_max).map(move |col| (col, row)))
    }

    /// Whether `rect` overlaps any cell of the given kind
    pub fn overlaps_kind(&self, rect: &Rect, kind: Cell) -> bool {
        self.cells_overlapping(rect)
            .any(|(col, row)| self.cell(col, row) == kind)
    }
}

impl SolidMap for Grid {
    fn tile_size(&self) -> f32 {
        self.tile_size
    }

    fn is_solid(&self, col: i32, row: i32) -> bool {
        self.cell(col, row) == Cell::Solid
    }
}

//! Render snapshot
//!
//! Everything a frontend needs to draw one frame, copied out of the session.
//! The snapshot owns its data, so drawing can never mutate simulation state.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::Rect;
use crate::sim::{AnimState, Cell, Session, SessionPhase};

/// Number of decorative stars behind each level
pub const BACKDROP_STARS: usize = 40;

/// Spikes shorter than this are not drawn
const MIN_VISIBLE_SPIKE: f32 = 2.0;

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub rect: Rect,
    pub anim: AnimState,
    /// Sprite opacity; fades out while dying
    pub alpha: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpikeView {
    pub rect: Rect,
    /// Visible height above the supporting tile
    pub extension: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TileView {
    pub rect: Rect,
    pub alpha: f32,
    pub animated: bool,
}

/// Level title card shown during the intro
#[derive(Debug, Clone, Serialize)]
pub struct IntroCard {
    pub title: String,
    pub tagline: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub level_number: usize,
    pub camera: Vec2,
    pub player: PlayerView,
    /// Non-empty cells inside the view as `(col, row, cell)`
    pub cells: Vec<(i32, i32, Cell)>,
    pub spikes: Vec<SpikeView>,
    pub tiles: Vec<TileView>,
    pub blocks: Vec<Rect>,
    /// Full-screen black overlay opacity
    pub overlay_alpha: f32,
    pub intro: Option<IntroCard>,
}

impl RenderSnapshot {
    pub fn capture(session: &Session) -> Self {
        let tuning = &session.tuning;
        let level = &session.level;
        let view = session.camera.view_rect();

        let player_alpha = match session.phase {
            SessionPhase::Dying { ticks } => {
                1.0 - ticks as f32 / tuning.death_ticks.max(1) as f32
            }
            _ => 1.0,
        };

        let grid = level.grid();
        let cells = grid
            .cells_overlapping(&view)
            .filter_map(|(col, row)| match grid.cell(col, row) {
                Cell::Empty => None,
                cell => Some((col, row, cell)),
            })
            .collect();

        let spikes = level
            .spikes()
            .iter()
            .filter(|s| s.extension() >= MIN_VISIBLE_SPIKE)
            .map(|s| SpikeView {
                rect: s.rect(tuning),
                extension: s.extension(),
            })
            .collect();

        let tiles = level
            .collapsing_tiles()
            .iter()
            .filter(|t| t.alpha > 0.0)
            .map(|t| TileView {
                rect: t.rect(),
                alpha: t.alpha,
                animated: t.animated,
            })
            .collect();

        let intro = session.is_intro().then(|| IntroCard {
            title: level.name.clone(),
            tagline: level.tagline.clone(),
        });

        Self {
            level_number: session.current_level,
            camera: session.camera.pos,
            player: PlayerView {
                rect: session.body.rect(),
                anim: session.body.anim_state(),
                alpha: player_alpha.clamp(0.0, 1.0),
            },
            cells,
            spikes,
            tiles,
            blocks: level.oscillating_blocks().iter().map(|b| b.rect()).collect(),
            overlay_alpha: session.overlay_alpha,
            intro,
        }
    }
}

/// Deterministic star positions for a level's backdrop, in screen pixels
pub fn backdrop_stars(level_number: usize, width: u32, height: u32) -> Vec<(u32, u32)> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let mut rng = Pcg32::seed_from_u64(level_number as u64 * 99991);
    (0..BACKDROP_STARS)
        .map(|_| (rng.random_range(0..width), rng.random_range(0..height)))
        .collect()
}

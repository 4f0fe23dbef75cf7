//! Session state: the top-level owner of level, body and camera
//!
//! The session moves through `Intro -> Playing -> Dying -> Playing`, with
//! fades layered on top: a fade-out ends by swapping in the next level, and
//! every load starts with a fade-in that runs alongside the intro.

use serde::{Deserialize, Serialize};

use super::body::Body;
use super::camera::Camera;
use super::level::{DeathCause, Level};
use crate::levels::{LevelError, LevelSet};
use crate::tuning::Tuning;

/// Gameplay phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Level title card; simulation frozen
    Intro { ticks: u32 },
    /// Live play
    Playing,
    /// Death fall in progress; respawn when it runs out
    Dying { ticks: u32 },
}

/// Screen fade, independent of the phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fade {
    Clear,
    /// Fading to black before the next level loads
    Out { ticks: u32 },
    /// Fading in after a load
    In { ticks: u32 },
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { number: usize },
    LevelCompleted { number: usize },
    /// The last level was cleared; play wraps back to level 1
    AllLevelsComplete,
    PlayerDied { cause: DeathCause },
    Respawned,
    ManualReset,
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub tuning: Tuning,
    levels: LevelSet,
    /// 1-based number of the loaded level
    pub current_level: usize,
    pub level: Level,
    pub body: Body,
    pub camera: Camera,
    pub phase: SessionPhase,
    pub fade: Fade,
    /// Full-screen black overlay opacity, 0..=1
    pub overlay_alpha: f32,
    /// Ticks since the session started
    pub time_ticks: u64,
    pub(crate) events: Vec<GameEvent>,
}

impl Session {
    /// Start on level 1 of an already validated level set
    pub fn new(levels: LevelSet, tuning: Tuning) -> Self {
        let level = Level::build(1, levels.first(), &tuning);
        let body = Body::new(level.spawn_position(&tuning), &tuning);
        let camera = Camera::new(glam::Vec2::new(tuning.viewport_width, tuning.viewport_height));

        let mut session = Self {
            tuning,
            levels,
            current_level: 1,
            level,
            body,
            camera,
            phase: SessionPhase::Intro { ticks: 0 },
            fade: Fade::Clear,
            overlay_alpha: 0.0,
            time_ticks: 0,
            events: Vec::new(),
        };
        session.start_intro();
        session
    }

    /// Session over the levels the game ships with
    pub fn with_builtin_levels(tuning: Tuning) -> Result<Self, LevelError> {
        Ok(Self::new(LevelSet::builtin()?, tuning))
    }

    pub fn levels(&self) -> &LevelSet {
        &self.levels
    }

    /// Rebuild the level from configuration and start its intro.
    /// Unknown numbers fall back to level 1.
    pub fn load_level(&mut self, number: usize) {
        let (number, config) = match self.levels.get(number) {
            Some(config) => (number, config),
            None => (1, self.levels.first()),
        };
        self.level = Level::build(number, config, &self.tuning);
        self.current_level = number;

        let spawn = self.level.spawn_position(&self.tuning);
        self.body.reset(spawn, &self.tuning);
        self.start_intro();
    }

    /// Fresh level in place: snap the camera, go dark and begin the intro
    fn start_intro(&mut self) {
        self.camera.snap_to(&self.body.rect());
        self.phase = SessionPhase::Intro { ticks: 0 };
        self.fade = Fade::In { ticks: 0 };
        self.overlay_alpha = 1.0;

        log::info!("Loaded level {}: {}", self.current_level, self.level.name);
        self.events.push(GameEvent::LevelStarted {
            number: self.current_level,
        });
    }

    /// Begin the fade-out that ends in the next level
    pub fn begin_level_exit(&mut self) {
        if matches!(self.fade, Fade::Out { .. }) {
            return;
        }
        log::info!("Level {} complete", self.current_level);
        self.events.push(GameEvent::LevelCompleted {
            number: self.current_level,
        });
        self.fade = Fade::Out { ticks: 0 };
    }

    pub(crate) fn advance_level(&mut self) {
        let next = self.levels.next_number(self.current_level);
        if next <= self.current_level {
            log::info!("All {} levels beaten", self.levels.len());
            self.events.push(GameEvent::AllLevelsComplete);
        }
        self.load_level(next);
    }

    fn reset_attempt(&mut self) {
        self.level.reset_traps();
        let spawn = self.level.spawn_position(&self.tuning);
        self.body.reset(spawn, &self.tuning);
    }

    /// Death sequence finished: traps and body back to their starting state
    pub(crate) fn respawn(&mut self) {
        self.reset_attempt();
        self.phase = SessionPhase::Playing;
        log::info!("Respawned on level {}", self.current_level);
        self.events.push(GameEvent::Respawned);
    }

    /// Player-requested restart: no fade, cancels a death in progress
    pub fn manual_reset(&mut self) {
        self.reset_attempt();
        if matches!(self.phase, SessionPhase::Dying { .. }) {
            self.phase = SessionPhase::Playing;
        }
        self.events.push(GameEvent::ManualReset);
    }

    pub fn is_intro(&self) -> bool {
        matches!(self.phase, SessionPhase::Intro { .. })
    }

    pub fn is_dying(&self) -> bool {
        matches!(self.phase, SessionPhase::Dying { .. })
    }

    /// Events recorded since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

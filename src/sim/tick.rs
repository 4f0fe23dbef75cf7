//! Fixed timestep session tick
//!
//! One call advances the whole game by exactly one 60 Hz step, in a fixed
//! order: reset request, fades, intro, death sequence, then live play
//! (body physics, hazards, goal and death checks, camera).

use serde::{Deserialize, Serialize};

use super::state::{Fade, GameEvent, Session, SessionPhase};

/// Input sampled for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump_held: bool,
    /// Jump key went down since the previous tick
    pub jump_pressed: bool,
    /// Restart the current attempt
    pub reset: bool,
}

impl TickInput {
    /// -1, 0 or 1; opposing keys cancel out
    pub fn horizontal(&self) -> i32 {
        match (self.left, self.right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }
}

/// Collects key events between ticks. Held keys are level-triggered (latest
/// state wins); jump presses and reset requests are consumed by `take`.
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    current: TickInput,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_left(&mut self, down: bool) {
        self.current.left = down;
    }

    pub fn set_right(&mut self, down: bool) {
        self.current.right = down;
    }

    pub fn set_jump(&mut self, down: bool) {
        if down && !self.current.jump_held {
            self.current.jump_pressed = true;
        }
        self.current.jump_held = down;
    }

    pub fn request_reset(&mut self) {
        self.current.reset = true;
    }

    /// Input for the next tick; edge-triggered flags are cleared
    pub fn take(&mut self) -> TickInput {
        let input = self.current.clone();
        self.current.jump_pressed = false;
        self.current.reset = false;
        input
    }
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut Session, input: &TickInput) {
    session.time_ticks += 1;

    if input.reset {
        session.manual_reset();
    }

    // Fading out freezes everything; completion swaps the level
    match session.fade {
        Fade::Out { ticks } => {
            let ticks = ticks + 1;
            let duration = session.tuning.fade_ticks.max(1);
            session.overlay_alpha = (ticks as f32 / duration as f32).min(1.0);
            if ticks >= duration {
                session.advance_level();
            } else {
                session.fade = Fade::Out { ticks };
            }
            return;
        }
        Fade::In { ticks } => {
            let ticks = ticks + 1;
            let duration = session.tuning.fade_ticks.max(1);
            session.overlay_alpha = 1.0 - (ticks as f32 / duration as f32).min(1.0);
            if ticks >= duration {
                session.fade = Fade::Clear;
                session.overlay_alpha = 0.0;
            } else {
                session.fade = Fade::In { ticks };
            }
        }
        Fade::Clear => {}
    }

    match session.phase {
        SessionPhase::Intro { ticks } => {
            let ticks = ticks + 1;
            session.phase = if ticks >= session.tuning.intro_ticks {
                SessionPhase::Playing
            } else {
                SessionPhase::Intro { ticks }
            };
        }
        SessionPhase::Dying { ticks } => {
            let ticks = ticks + 1;
            if ticks >= session.tuning.death_ticks {
                session.respawn();
            } else {
                session.phase = SessionPhase::Dying { ticks };
                session.body.step_dying(&session.tuning);
                session
                    .camera
                    .follow(&session.body.rect(), session.tuning.camera_lerp);
            }
        }
        SessionPhase::Playing => play(session, input),
    }
}

fn play(session: &mut Session, input: &TickInput) {
    session.body.step(input, &session.level, &session.tuning);

    let player = session.body.rect();
    session.level.update(&player, &session.tuning);

    if session.level.reached_goal(&player) {
        session.begin_level_exit();
    } else if let Some(cause) = session.level.fatal_contact(&player, &session.tuning) {
        log::info!("Player died on level {} ({:?})", session.current_level, cause);
        session.body.start_dying(&session.tuning);
        session.phase = SessionPhase::Dying { ticks: 0 };
        session.events.push(GameEvent::PlayerDied { cause });
    }

    session
        .camera
        .follow(&player, session.tuning.camera_lerp);
}

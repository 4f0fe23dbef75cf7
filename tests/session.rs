//! End-to-end session behavior on small hand-built levels

use unfair_platform::levels::{
    CellPos, CellSpan, CollapsingTilePlacement, LevelConfig, OscillatingBlockPlacement, SpawnPoint,
};
use unfair_platform::sim::{
    Axis, Body, DeathCause, Fade, GameEvent, Level, Session, SessionPhase, SpikeState, TickInput,
    TilePhase, tick,
};
use unfair_platform::{LevelSet, Tuning};

const TS: f32 = 32.0;
const GROUND_ROW: i32 = 8;

fn span(row: i32, from: i32, to: i32) -> CellSpan {
    CellSpan {
        row,
        from,
        to,
        gap_every: None,
    }
}

/// 40x12 level with a floor on row 8 and the player spawned at x = 64
fn flat(name: &str) -> LevelConfig {
    LevelConfig {
        name: name.into(),
        tagline: String::new(),
        cols: 40,
        rows: 12,
        tile_size: TS,
        spawn: SpawnPoint {
            x: 64.0,
            ground_row: GROUND_ROW,
        },
        solids: vec![span(GROUND_ROW, 0, 40)],
        goals: vec![],
        spikes: vec![],
        collapsing_tiles: vec![],
        oscillating_blocks: vec![],
    }
}

fn with_goal(name: &str) -> LevelConfig {
    let mut level = flat(name);
    level.goals.push(span(GROUND_ROW, 10, 14));
    level
}

fn session(levels: Vec<LevelConfig>) -> Session {
    Session::new(LevelSet::new(levels).unwrap(), Tuning::default())
}

fn idle() -> TickInput {
    TickInput::default()
}

fn right() -> TickInput {
    TickInput {
        right: true,
        ..Default::default()
    }
}

fn skip_intro(session: &mut Session) {
    for _ in 0..session.tuning.intro_ticks {
        tick(session, &idle());
    }
    assert_eq!(session.phase, SessionPhase::Playing);
    session.drain_events();
}

/// Tick with `input` until `done` holds; returns the number of ticks taken
fn run_until(
    session: &mut Session,
    input: &TickInput,
    limit: u32,
    done: impl Fn(&Session) -> bool,
) -> u32 {
    for n in 1..=limit {
        tick(session, input);
        if done(session) {
            return n;
        }
    }
    panic!("condition not reached within {limit} ticks");
}

fn standing_y(tuning: &Tuning) -> f32 {
    GROUND_ROW as f32 * TS - tuning.player_height - 0.01
}

#[test]
fn intro_freezes_play_while_fading_in() {
    let mut session = session(vec![flat("flat")]);
    let spawn = session.body.pos;
    let held = TickInput {
        right: true,
        jump_held: true,
        jump_pressed: true,
        ..Default::default()
    };

    for _ in 0..session.tuning.fade_ticks / 2 {
        tick(&mut session, &held);
    }
    assert!((session.overlay_alpha - 0.5).abs() < 1e-5);

    for _ in session.tuning.fade_ticks / 2..session.tuning.fade_ticks {
        tick(&mut session, &held);
    }
    assert_eq!(session.fade, Fade::Clear);
    assert_eq!(session.overlay_alpha, 0.0);
    assert!(session.is_intro());

    for _ in session.tuning.fade_ticks..session.tuning.intro_ticks - 1 {
        tick(&mut session, &held);
    }
    assert!(session.is_intro());
    assert_eq!(session.body.pos, spawn);

    tick(&mut session, &held);
    assert_eq!(session.phase, SessionPhase::Playing);
    assert_eq!(session.body.pos, spawn);
}

#[test]
fn walking_right_accelerates_to_max_speed() {
    let mut session = session(vec![flat("flat")]);
    skip_intro(&mut session);
    let tuning = session.tuning.clone();

    let mut expected_x = session.body.pos.x;
    let mut vx = 0.0f32;
    for _ in 0..20 {
        tick(&mut session, &right());
        vx = (vx + tuning.accel).min(tuning.max_speed);
        expected_x += vx;
    }

    assert!((session.body.pos.x - expected_x).abs() < 1e-3);
    assert_eq!(session.body.vel.x, tuning.max_speed);
    assert!((session.body.pos.y - standing_y(&tuning)).abs() < 1e-4);
    assert!(session.body.on_ground);

    // Releasing the key lets ground friction bring the body to rest
    for _ in 0..30 {
        tick(&mut session, &idle());
    }
    assert_eq!(session.body.vel.x, 0.0);
    assert!(session.body.on_ground);
}

#[test]
fn one_second_of_running_on_level_one_stays_on_the_floor() {
    let tuning = Tuning::default();
    let levels = LevelSet::builtin().unwrap();
    let level = Level::load(1, levels.first(), &tuning).unwrap();
    let spawn = level.spawn_position(&tuning);
    let mut body = Body::new(spawn, &tuning);

    let mut expected_x = spawn.x;
    let mut vx = 0.0f32;
    for _ in 0..60 {
        body.step(&right(), &level, &tuning);
        vx = (vx + tuning.accel).min(tuning.max_speed);
        expected_x += vx;
        assert!(body.on_ground);
        assert!(body.rect().bottom() < 32.0 * TS);
    }
    assert!((body.pos.x - expected_x).abs() < 1e-3);
    assert!((body.pos.x - 348.5).abs() < 1e-2);
}

#[test]
fn jump_launches_from_the_ground() {
    let mut session = session(vec![flat("flat")]);
    skip_intro(&mut session);
    tick(&mut session, &idle());

    let jump = TickInput {
        jump_held: true,
        jump_pressed: true,
        ..Default::default()
    };
    tick(&mut session, &jump);
    assert_eq!(session.body.vel.y, session.tuning.jump_velocity);
    assert!(!session.body.on_ground);
    assert!(session.body.jumping);

    let held = TickInput {
        jump_held: true,
        ..Default::default()
    };
    let ticks = run_until(&mut session, &held, 120, |s| s.body.on_ground);
    assert!(ticks > 10);
    assert!(!session.body.jumping);
}

#[test]
fn reaching_the_goal_fades_out_then_loads_the_next_level() {
    let mut session = session(vec![with_goal("one"), with_goal("two")]);
    skip_intro(&mut session);

    run_until(&mut session, &right(), 300, |s| {
        matches!(s.fade, Fade::Out { .. })
    });
    assert_eq!(
        session.drain_events(),
        vec![GameEvent::LevelCompleted { number: 1 }]
    );

    // Everything is frozen while the screen goes dark
    let frozen = session.body.pos;
    for _ in 0..session.tuning.fade_ticks - 1 {
        tick(&mut session, &right());
    }
    assert_eq!(session.current_level, 1);
    assert_eq!(session.body.pos, frozen);
    assert!(session.overlay_alpha > 0.9 && session.overlay_alpha < 1.0);

    tick(&mut session, &right());
    assert_eq!(session.current_level, 2);
    assert_eq!(session.phase, SessionPhase::Intro { ticks: 0 });
    assert_eq!(session.fade, Fade::In { ticks: 0 });
    assert_eq!(session.overlay_alpha, 1.0);
    assert_eq!(
        session.drain_events(),
        vec![GameEvent::LevelStarted { number: 2 }]
    );
}

#[test]
fn clearing_the_last_level_wraps_to_the_first() {
    let mut session = session(vec![with_goal("one"), with_goal("two")]);
    session.load_level(2);
    skip_intro(&mut session);

    run_until(&mut session, &right(), 300, |s| s.current_level == 1);
    let events = session.drain_events();
    assert!(events.contains(&GameEvent::AllLevelsComplete));
    assert_eq!(events.last(), Some(&GameEvent::LevelStarted { number: 1 }));
    assert!(session.is_intro());
}

#[test]
fn reset_during_fade_out_does_not_cancel_the_transition() {
    let mut session = session(vec![with_goal("one"), with_goal("two")]);
    skip_intro(&mut session);
    run_until(&mut session, &right(), 300, |s| {
        matches!(s.fade, Fade::Out { .. })
    });

    let reset = TickInput {
        reset: true,
        ..Default::default()
    };
    tick(&mut session, &reset);
    assert!(matches!(session.fade, Fade::Out { ticks: 1 }));

    for _ in 1..session.tuning.fade_ticks {
        tick(&mut session, &idle());
    }
    assert_eq!(session.current_level, 2);
}

#[test]
fn falling_out_of_the_world_kills_then_respawns() {
    let mut level = flat("ledge");
    level.solids = vec![span(GROUND_ROW, 0, 6)];
    let mut session = session(vec![level]);
    skip_intro(&mut session);

    run_until(&mut session, &right(), 600, |s| s.is_dying());
    assert_eq!(session.phase, SessionPhase::Dying { ticks: 0 });
    assert!(session.body.is_dying);
    assert!(session.body.rect().bottom() > 12.0 * TS + session.tuning.fall_death_margin);
    assert_eq!(
        session.drain_events(),
        vec![GameEvent::PlayerDied {
            cause: DeathCause::FellOut
        }]
    );

    // The corpse keeps falling, ignoring input
    let before = session.body.pos;
    for _ in 0..session.tuning.death_ticks - 1 {
        tick(&mut session, &right());
    }
    assert!(session.is_dying());
    assert!(session.body.pos.y > before.y);

    tick(&mut session, &idle());
    assert_eq!(session.phase, SessionPhase::Playing);
    assert!(!session.body.is_dying);
    assert_eq!(
        session.body.pos,
        session.level.spawn_position(&session.tuning)
    );
    assert_eq!(session.drain_events(), vec![GameEvent::Respawned]);
}

#[test]
fn spike_kills_and_respawn_restores_every_trap() {
    let mut level = flat("spiky");
    level.spikes.push(CellPos {
        col: 8,
        row: GROUND_ROW,
    });
    level.collapsing_tiles.push(CollapsingTilePlacement {
        col: 4,
        row: GROUND_ROW,
        animated: true,
    });
    let config = level.clone();
    let mut session = session(vec![level]);
    skip_intro(&mut session);

    run_until(&mut session, &right(), 300, |s| s.is_dying());
    assert_eq!(
        session.drain_events(),
        vec![GameEvent::PlayerDied {
            cause: DeathCause::Spike
        }]
    );
    let spike = &session.level.spikes()[0];
    assert_ne!(spike.state, SpikeState::Armed);
    assert!(spike.is_lethal(&session.tuning));
    assert_ne!(session.level.collapsing_tiles()[0].phase, TilePhase::Solid);

    for _ in 0..session.tuning.death_ticks {
        tick(&mut session, &idle());
    }
    assert_eq!(session.phase, SessionPhase::Playing);

    // Resetting traps must be indistinguishable from a cold load
    let cold = Level::load(1, &config, &session.tuning).unwrap();
    assert_eq!(session.level.spikes(), cold.spikes());
    assert_eq!(session.level.collapsing_tiles(), cold.collapsing_tiles());
}

#[test]
fn collapsing_floor_drops_the_player() {
    let mut level = flat("false floor");
    level.solids = vec![span(GROUND_ROW, 0, 3)];
    for col in 3..6 {
        level.collapsing_tiles.push(CollapsingTilePlacement {
            col,
            row: GROUND_ROW,
            animated: false,
        });
    }
    let mut session = session(vec![level]);
    skip_intro(&mut session);

    run_until(&mut session, &right(), 600, |s| s.is_dying());
    assert_eq!(
        session.drain_events(),
        vec![GameEvent::PlayerDied {
            cause: DeathCause::FellOut
        }]
    );
    assert!(matches!(
        session.level.collapsing_tiles()[0].phase,
        TilePhase::Broken { .. }
    ));

    for _ in 0..session.tuning.death_ticks {
        tick(&mut session, &idle());
    }
    assert!(
        session
            .level
            .collapsing_tiles()
            .iter()
            .all(|t| t.phase == TilePhase::Solid && t.alpha == 1.0)
    );
}

#[test]
fn touching_an_oscillating_block_crushes() {
    let mut level = flat("crusher");
    level.oscillating_blocks.push(OscillatingBlockPlacement {
        col: 8,
        row: GROUND_ROW - 1,
        amplitude_tiles: 0.0,
        speed: 0.0,
        axis: Axis::Horizontal,
    });
    let mut session = session(vec![level]);
    skip_intro(&mut session);

    run_until(&mut session, &right(), 300, |s| s.is_dying());
    assert_eq!(
        session.drain_events(),
        vec![GameEvent::PlayerDied {
            cause: DeathCause::Crushed
        }]
    );
    assert!(session.body.rect().right() > 8.0 * TS);
}

#[test]
fn manual_reset_returns_to_spawn_without_a_fade() {
    let mut session = session(vec![flat("flat")]);
    skip_intro(&mut session);
    for _ in 0..30 {
        tick(&mut session, &right());
    }
    assert!(session.body.pos.x > 100.0);

    let reset = TickInput {
        reset: true,
        ..Default::default()
    };
    tick(&mut session, &reset);
    assert_eq!(session.fade, Fade::Clear);
    assert_eq!(session.phase, SessionPhase::Playing);
    assert!(session.drain_events().contains(&GameEvent::ManualReset));
    assert!((session.body.pos.x - 64.0).abs() < 1e-4);
    assert_eq!(session.body.vel.x, 0.0);
}

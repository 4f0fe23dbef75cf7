//! Unfair Platform entry point
//!
//! Headless native runner: loads tuning and level data, then drives the
//! session with a scripted player and logs what happens.
//!
//! ```text
//! unfair-platform [--tuning FILE] [--levels FILE] [--ticks N]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;

    use unfair_platform::consts::TICKS_PER_SECOND;
    use unfair_platform::render::RenderSnapshot;
    use unfair_platform::sim::{GameEvent, InputLatch, Session, tick};
    use unfair_platform::{LevelError, LevelSet, Tuning};

    /// One minute of play
    const DEFAULT_TICKS: u64 = 60 * TICKS_PER_SECOND as u64;

    /// Ticks between scripted jump presses
    const JUMP_INTERVAL: u64 = 45;

    /// Headless runner for the Unfair Platform simulation
    #[derive(Debug, Parser)]
    #[command(name = "unfair-platform", version)]
    pub struct Args {
        /// JSON file overriding physics and hazard tuning
        #[arg(long, value_name = "FILE")]
        tuning: Option<PathBuf>,
        /// JSON level set to play instead of the built-in levels
        #[arg(long, value_name = "FILE")]
        levels: Option<PathBuf>,
        /// Number of 60 Hz ticks to simulate
        #[arg(long, value_name = "N", default_value_t = DEFAULT_TICKS)]
        ticks: u64,
    }

    #[derive(Debug, thiserror::Error)]
    pub enum RunError {
        #[error("cannot read {}: {source}", path.display())]
        Io {
            path: PathBuf,
            source: std::io::Error,
        },
        #[error("bad tuning file: {0}")]
        Tuning(#[from] serde_json::Error),
        #[error(transparent)]
        Levels(#[from] LevelError),
    }

    fn read(path: &PathBuf) -> Result<String, RunError> {
        std::fs::read_to_string(path).map_err(|source| RunError::Io {
            path: path.clone(),
            source,
        })
    }

    fn build_session(args: &Args) -> Result<Session, RunError> {
        let tuning = match &args.tuning {
            Some(path) => Tuning::from_json(&read(path)?)?,
            None => Tuning::default(),
        };
        let levels = match &args.levels {
            Some(path) => LevelSet::from_json(&read(path)?)?,
            None => LevelSet::builtin()?,
        };
        Ok(Session::new(levels, tuning))
    }

    /// Hold right and tap jump on a fixed rhythm
    fn script(latch: &mut InputLatch, t: u64) {
        latch.set_right(true);
        latch.set_jump(t % JUMP_INTERVAL < 12);
    }

    fn log_event(event: &GameEvent, t: u64) {
        match event {
            GameEvent::PlayerDied { cause } => log::info!("[{t}] died: {cause:?}"),
            GameEvent::AllLevelsComplete => log::info!("[{t}] all levels complete"),
            other => log::debug!("[{t}] {other:?}"),
        }
    }

    pub fn run(args: Args) -> Result<(), RunError> {
        let mut session = build_session(&args)?;
        let ticks = args.ticks;
        log::info!(
            "Running {} ticks over {} levels",
            ticks,
            session.levels().len()
        );

        let mut latch = InputLatch::new();
        let mut deaths = 0u32;
        let mut cleared = 0u32;
        for t in 0..ticks {
            script(&mut latch, t);
            tick(&mut session, &latch.take());
            for event in session.drain_events() {
                match event {
                    GameEvent::PlayerDied { .. } => deaths += 1,
                    GameEvent::LevelCompleted { .. } => cleared += 1,
                    _ => {}
                }
                log_event(&event, t);
            }
        }

        let snapshot = RenderSnapshot::capture(&session);
        log::info!(
            "Finished on level {} at ({:.1}, {:.1}): {} deaths, {} levels cleared",
            snapshot.level_number,
            snapshot.player.rect.x,
            snapshot.player.rect.y,
            deaths,
            cleared
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    let args = native::Args::parse();
    env_logger::init();
    log::info!("Unfair Platform (headless) starting...");
    if let Err(e) = native::run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser frontends drive `sim::tick` themselves
}

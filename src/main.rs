//! Drop Dodge headless runner
//!
//! Plays one round with a simple autopilot and logs the event stream.
//! Usage: `drop-dodge [tuning.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = native::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is embedded by a host on the web; nothing to run here
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use drop_dodge::sim::{GameEvent, GamePhase, GameState, safe_zone};
    use drop_dodge::{FrameClock, Tuning, TuningError};

    /// Host frame period (60 Hz display)
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after five minutes of simulated time
    const MAX_FRAMES: u32 = 5 * 60 * 60;

    pub fn run() -> Result<(), TuningError> {
        let mut args = std::env::args().skip(1);
        let tuning = match args.next() {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let seed = match args.next() {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("Invalid seed {raw:?}, using 0");
                0
            }),
            None => 0,
        };

        log::info!("Drop Dodge (headless) starting with seed {seed}");
        let mut state = GameState::with_tuning(seed, tuning);
        let mut clock = FrameClock::new();
        state.start();

        let mut now_ms = 0.0;
        for _ in 0..MAX_FRAMES {
            now_ms += FRAME_MS;
            let dt = clock.frame(now_ms);
            if state.phase() == GamePhase::Playing {
                autopilot(&mut state);
            }
            state.advance(dt);

            for event in state.drain_events() {
                report(&event);
            }
            if state.phase() == GamePhase::GameOver {
                break;
            }
        }

        println!(
            "Final score: {} (level {}, {:.1}s)",
            state.score(),
            state.level(),
            state.elapsed_ms() / 1000.0
        );
        Ok(())
    }

    /// Step away from the lowest obstacle falling toward the player's column
    fn autopilot(state: &mut GameState) {
        let player = *state.player();
        let tuning = state.tuning();
        let (zone_left, zone_right) = safe_zone(&player, 1, tuning);

        let threat = state
            .obstacles()
            .iter()
            .filter(|o| o.x < zone_right && o.x + o.width > zone_left && o.y < player.y)
            .max_by(|a, b| a.y.total_cmp(&b.y));

        if let Some(threat) = threat {
            let room_left = threat.x;
            let room_right = tuning.screen_width - (threat.x + threat.width);
            if room_left > room_right {
                state.move_left();
            } else {
                state.move_right();
            }
        }
    }

    fn report(event: &GameEvent) {
        match event {
            GameEvent::StateChanged(phase) => log::info!("State -> {phase:?}"),
            GameEvent::CountdownTick(secs) => log::info!("{secs}..."),
            GameEvent::LevelUp(level) => log::info!("Level up! Now level {level}"),
            GameEvent::GameOver { final_score, point } => {
                log::info!("Crash at ({:.0}, {:.0}), final score {final_score}", point.x, point.y)
            }
            GameEvent::ObstacleSpawned(o) => log::debug!("Spawned {} at x={:.0}", o.id, o.x),
            GameEvent::ObstacleRemoved(id) => log::trace!("Removed {id}"),
            GameEvent::ScoreChanged(_) | GameEvent::ObstaclesTicked(_) => {}
        }
    }
}

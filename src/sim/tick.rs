//! Game state machine and fixed timestep loop
//!
//! Commands and timer firings that arrive in the wrong phase are ignored.
//! Each consumed physics step runs, in order: timers (score, difficulty,
//! spawn), obstacle motion, collision. The first collision ends the run and
//! the remaining steps of that frame are discarded.

use super::collision::{self, Collision};
use super::difficulty::{DifficultyController, DifficultyState};
use super::geometry::Rect;
use super::motion::MotionIntegrator;
use super::state::{GameEvent, GamePhase, GameState, Obstacle, Player};
use super::timer::{TimerKind, Timers};

impl GameState {
    /// Idle → Countdown
    pub fn start(&mut self) {
        if self.phase != GamePhase::Idle {
            log::debug!("Ignoring start in {:?}", self.phase);
            return;
        }
        self.begin_countdown();
    }

    /// GameOver → Countdown (same reset as `start`)
    pub fn restart(&mut self) {
        if self.phase != GamePhase::GameOver {
            log::debug!("Ignoring restart in {:?}", self.phase);
            return;
        }
        self.begin_countdown();
    }

    /// Countdown → Playing. Starts the timers and spawns the first obstacle.
    pub fn countdown_finished(&mut self) {
        if self.phase != GamePhase::Countdown {
            log::debug!("Ignoring countdown_finished in {:?}", self.phase);
            return;
        }
        self.countdown_remaining_ms = 0.0;
        self.integrator.reset();
        self.spawner.reset();
        self.timers.spawn.set_period(self.difficulty.spawn_interval_ms);
        self.timers.start_all();
        self.set_phase(GamePhase::Playing);
        log::info!("Run started (seed {})", self.seed);
        self.spawn_obstacle();
    }

    pub fn move_left(&mut self) {
        self.move_player(-self.tuning.move_step);
    }

    pub fn move_right(&mut self) {
        self.move_player(self.tuning.move_step);
    }

    fn move_player(&mut self, dx: f32) {
        if self.phase != GamePhase::Playing {
            log::debug!("Ignoring move in {:?}", self.phase);
            return;
        }
        let max_x = self.tuning.player_max_x();
        self.player.shift(dx, max_x);
    }

    /// Advance the simulation by a frame delta (seconds).
    ///
    /// Returns the number of physics steps consumed.
    pub fn advance(&mut self, dt: f32) -> u32 {
        match self.phase {
            GamePhase::Countdown => {
                self.advance_countdown(dt);
                0
            }
            GamePhase::Playing => self.advance_playing(dt),
            GamePhase::Idle | GamePhase::GameOver => 0,
        }
    }

    /// Deliver a timer firing. No-op outside `Playing`.
    ///
    /// The built-in step timers call this themselves. A host that schedules
    /// firings on its own sets `Tuning::external_timers` so each activity is
    /// driven from one place only.
    pub fn fire_timer(&mut self, kind: TimerKind) {
        if self.phase != GamePhase::Playing {
            log::debug!("Ignoring {:?} timer in {:?}", kind, self.phase);
            return;
        }
        match kind {
            TimerKind::Score => {
                self.score += 1;
                self.emit(GameEvent::ScoreChanged(self.score));
            }
            TimerKind::Difficulty => {
                let next = DifficultyController::new(&self.tuning).tick(&self.difficulty);
                self.difficulty = next;
                self.timers.spawn.set_period(next.spawn_interval_ms);
                log::info!(
                    "Level {}: speed {:.0}px/s, spawn every {:.0}ms",
                    next.level,
                    next.obstacle_speed,
                    next.spawn_interval_ms
                );
                self.emit(GameEvent::LevelUp(next.level));
            }
            TimerKind::Spawn => {
                self.spawn_obstacle();
            }
        }
    }

    /// Run the collision detector against the current positions.
    ///
    /// Ends the run on a hit. Does nothing once the run is over, so repeated
    /// calls never fire a second game over.
    pub fn check_collision(&mut self) -> Option<Collision> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        let hit = collision::check(&self.player, self.obstacles.iter(), &self.tuning)?;
        self.game_over(hit);
        Some(hit)
    }

    /// Insert an obstacle at a fixed position (scripted levels, tests).
    ///
    /// Returns its ID, or `None` outside `Countdown`/`Playing`, at the cap, or
    /// when the geometry is not finite with a positive size.
    pub fn place_obstacle(&mut self, x: f32, y: f32, width: f32, height: f32) -> Option<u32> {
        if !matches!(self.phase, GamePhase::Countdown | GamePhase::Playing) {
            log::debug!("Ignoring place_obstacle in {:?}", self.phase);
            return None;
        }
        if !Rect::from_xywh(x, y, width, height).is_well_formed() {
            log::warn!("Rejecting malformed obstacle ({x}, {y}, {width}x{height})");
            return None;
        }
        if self.obstacles.is_full() {
            return None;
        }
        let max_x = (self.tuning.screen_width - width).max(0.0);
        let obstacle = Obstacle {
            id: self.spawner.allocate_id(),
            x: x.clamp(0.0, max_x),
            y,
            width,
            height,
        };
        self.insert_obstacle(obstacle)
    }

    fn begin_countdown(&mut self) {
        for id in self.obstacles.clear() {
            self.emit(GameEvent::ObstacleRemoved(id));
        }
        self.difficulty = DifficultyState::initial(&self.tuning);
        self.player = Player::centered(&self.tuning);
        self.score = 0;
        self.clock_ms = 0.0;
        self.time_steps = 0;
        self.countdown_remaining_ms = self.tuning.countdown_ms;
        self.integrator.reset();
        self.spawner.reset();
        self.timers = Timers::new(&self.tuning, &self.difficulty);

        self.emit(GameEvent::ScoreChanged(0));
        self.set_phase(GamePhase::Countdown);
        if self.tuning.countdown_ms > 0.0 {
            self.emit(GameEvent::CountdownTick(whole_seconds(self.countdown_remaining_ms)));
        }
    }

    /// Built-in countdown. With `countdown_ms == 0` the host drives it instead.
    fn advance_countdown(&mut self, dt: f32) {
        if self.tuning.countdown_ms <= 0.0 || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let before = whole_seconds(self.countdown_remaining_ms);
        self.countdown_remaining_ms = (self.countdown_remaining_ms - dt as f64 * 1000.0).max(0.0);
        if self.countdown_remaining_ms <= 0.0 {
            self.countdown_finished();
            return;
        }
        let after = whole_seconds(self.countdown_remaining_ms);
        if after != before {
            self.emit(GameEvent::CountdownTick(after));
        }
    }

    fn advance_playing(&mut self, dt: f32) -> u32 {
        let due = self.integrator.consume(dt, &self.tuning);
        let mut consumed = 0;
        for _ in 0..due {
            consumed += 1;
            self.physics_step();
            if self.phase != GamePhase::Playing {
                break;
            }
        }
        if consumed > 0 {
            self.emit(GameEvent::ObstaclesTicked(self.obstacles.snapshot()));
        }
        consumed
    }

    fn physics_step(&mut self) {
        let step_ms = self.tuning.fixed_step_secs as f64 * 1000.0;
        self.clock_ms += step_ms;
        self.time_steps += 1;

        if !self.tuning.external_timers {
            for _ in 0..self.timers.score.advance(step_ms) {
                self.fire_timer(TimerKind::Score);
            }
            for _ in 0..self.timers.difficulty.advance(step_ms) {
                self.fire_timer(TimerKind::Difficulty);
            }
            for _ in 0..self.timers.spawn.advance(step_ms) {
                self.fire_timer(TimerKind::Spawn);
            }
        }

        let expired =
            MotionIntegrator::step(&mut self.obstacles, self.difficulty.obstacle_speed, &self.tuning);
        for id in expired {
            self.emit(GameEvent::ObstacleRemoved(id));
        }

        self.check_collision();
    }

    fn spawn_obstacle(&mut self) {
        let spawned = self.spawner.try_spawn(
            self.clock_ms,
            &self.player,
            &self.difficulty,
            self.obstacles.len(),
            &self.tuning,
        );
        if let Some(obstacle) = spawned {
            self.insert_obstacle(obstacle);
        }
    }

    fn insert_obstacle(&mut self, obstacle: Obstacle) -> Option<u32> {
        let id = obstacle.id;
        match self.obstacles.insert(obstacle.clone()) {
            Ok(()) => {
                self.emit(GameEvent::ObstacleSpawned(obstacle));
                Some(id)
            }
            Err(_) => {
                log::debug!("Obstacle {} rejected, arena full", id);
                None
            }
        }
    }

    fn game_over(&mut self, hit: Collision) {
        self.timers.stop_all();
        self.set_phase(GamePhase::GameOver);
        log::info!(
            "Game over: score {} at level {} (hit obstacle {})",
            self.score,
            self.difficulty.level,
            hit.obstacle_id
        );
        self.emit(GameEvent::GameOver {
            final_score: self.score,
            point: hit.point,
        });
    }

    fn set_phase(&mut self, phase: GamePhase) {
        self.phase = phase;
        self.emit(GameEvent::StateChanged(phase));
    }
}

/// Seconds shown on a countdown display (rounded up)
fn whole_seconds(ms: f64) -> u32 {
    (ms / 1000.0).ceil().max(0.0) as u32
}

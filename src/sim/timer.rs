//! Periodic gameplay timers
//!
//! Timers advance in simulated milliseconds, one physics step at a time, so a
//! run replays identically regardless of host frame rate. They are started on
//! entering `Playing` and stopped (not just ignored) on game over.

use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyState;
use crate::tuning::Tuning;

/// Which periodic activity a timer drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// One point per score interval
    Score,
    /// Obstacle spawn attempt
    Spawn,
    /// Difficulty escalation
    Difficulty,
}

/// A repeating timer measured in simulated milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodicTimer {
    period_ms: f64,
    elapsed_ms: f64,
    running: bool,
}

impl PeriodicTimer {
    /// A stopped timer
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            elapsed_ms: 0.0,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
        self.elapsed_ms = 0.0;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed_ms = 0.0;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    /// Change the period; time already elapsed carries over
    pub fn set_period(&mut self, period_ms: f64) {
        self.period_ms = period_ms;
    }

    /// Advance by `dt_ms` and return how many times the timer fired
    pub fn advance(&mut self, dt_ms: f64) -> u32 {
        if !self.running || self.period_ms <= 0.0 {
            return 0;
        }
        self.elapsed_ms += dt_ms.max(0.0);
        let mut fired = 0;
        while self.elapsed_ms >= self.period_ms {
            self.elapsed_ms -= self.period_ms;
            fired += 1;
        }
        fired
    }
}

/// The three timers owned by a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timers {
    pub score: PeriodicTimer,
    pub spawn: PeriodicTimer,
    pub difficulty: PeriodicTimer,
}

impl Timers {
    /// Stopped timers with periods for the given difficulty
    pub fn new(tuning: &Tuning, difficulty: &DifficultyState) -> Self {
        Self {
            score: PeriodicTimer::new(tuning.score_interval_ms),
            spawn: PeriodicTimer::new(difficulty.spawn_interval_ms),
            difficulty: PeriodicTimer::new(tuning.difficulty_interval_ms),
        }
    }

    pub fn start_all(&mut self) {
        self.score.start();
        self.spawn.start();
        self.difficulty.start();
    }

    pub fn stop_all(&mut self) {
        self.score.stop();
        self.spawn.stop();
        self.difficulty.stop();
    }

    pub fn any_running(&self) -> bool {
        self.score.is_running() || self.spawn.is_running() || self.difficulty.is_running()
    }
}

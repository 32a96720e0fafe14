//! Difficulty progression
//!
//! Every difficulty interval the level rises, obstacles fall faster and spawn
//! more often. The spawn interval approaches its floor without overshooting.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Difficulty of the current run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyState {
    /// Starts at 1
    pub level: u32,
    /// Fall speed in pixels per second
    pub obstacle_speed: f32,
    /// Minimum time between spawns
    pub spawn_interval_ms: f64,
}

impl DifficultyState {
    /// Difficulty at the start of a run
    pub fn initial(tuning: &Tuning) -> Self {
        Self {
            level: 1,
            obstacle_speed: tuning.initial_speed,
            spawn_interval_ms: tuning.initial_spawn_interval_ms.max(tuning.min_spawn_interval_ms),
        }
    }
}

/// Computes the next difficulty step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyController {
    speed_increment: f32,
    interval_step_ms: f64,
    min_interval_ms: f64,
}

impl DifficultyController {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            speed_increment: tuning.speed_increment.max(0.0),
            interval_step_ms: tuning.spawn_interval_step_ms.max(0.0),
            min_interval_ms: tuning.min_spawn_interval_ms,
        }
    }

    /// Next difficulty level
    pub fn tick(&self, current: &DifficultyState) -> DifficultyState {
        let headroom = (current.spawn_interval_ms - self.min_interval_ms).max(0.0);
        let decrement = self.interval_step_ms.min(headroom);
        DifficultyState {
            level: current.level.saturating_add(1),
            obstacle_speed: current.obstacle_speed + self.speed_increment,
            spawn_interval_ms: (current.spawn_interval_ms - decrement).max(self.min_interval_ms),
        }
    }
}

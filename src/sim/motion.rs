//! Fixed-timestep motion integration
//!
//! Frame time is accumulated and consumed in whole fixed steps so obstacle
//! positions only depend on the sequence of frame deltas, never on how the
//! host happened to slice them into frames.

use serde::{Deserialize, Serialize};

use super::state::ObstacleArena;
use crate::tuning::Tuning;

/// Outcome of [`MotionIntegrator::advance`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionReport {
    /// Fixed steps consumed
    pub steps: u32,
    /// Obstacles removed after leaving the screen, in spawn order
    pub expired: Vec<u32>,
}

/// Accumulates frame time into fixed physics steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionIntegrator {
    accumulator: f32,
}

impl MotionIntegrator {
    /// Time banked toward the next step (seconds)
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Bank a frame delta and return how many fixed steps are due.
    ///
    /// Deltas are capped at `max_frame_secs` so a stall does not teleport
    /// obstacles. Time left after `max_substeps` is dropped.
    pub fn consume(&mut self, dt: f32, tuning: &Tuning) -> u32 {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, tuning.max_frame_secs)
        } else {
            0.0
        };
        self.accumulator += dt;

        let step = tuning.fixed_step_secs;
        let mut steps = 0;
        while self.accumulator >= step && steps < tuning.max_substeps {
            self.accumulator -= step;
            steps += 1;
        }
        if self.accumulator >= step {
            self.accumulator %= step;
        }
        steps
    }

    /// Move every obstacle down by one fixed step and remove those that left
    /// the screen. Returns the removed IDs.
    pub fn step(obstacles: &mut ObstacleArena, speed: f32, tuning: &Tuning) -> Vec<u32> {
        let dy = speed * tuning.fixed_step_secs;
        obstacles.for_each_mut(|o| o.y += dy);
        obstacles
            .remove_where(|o| o.has_exited(tuning.screen_height, tuning.exit_buffer))
            .into_iter()
            .map(|o| o.id)
            .collect()
    }

    /// Consume `dt` and run every due step
    pub fn advance(
        &mut self,
        obstacles: &mut ObstacleArena,
        speed: f32,
        dt: f32,
        tuning: &Tuning,
    ) -> MotionReport {
        let steps = self.consume(dt, tuning);
        let mut expired = Vec::new();
        for _ in 0..steps {
            expired.extend(Self::step(obstacles, speed, tuning));
        }
        MotionReport { steps, expired }
    }
}

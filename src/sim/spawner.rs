//! Obstacle spawning policy
//!
//! New obstacles avoid a safe zone centered on the player so a run stays
//! winnable. The zone narrows as the level rises. When neither side of the
//! zone has room, placement falls back to random positions that try not to
//! land directly over the player.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyState;
use super::state::{Obstacle, Player};
use crate::tuning::{SideBias, Tuning};

/// Slack for comparing accumulated step times against the spawn interval
const SPAWN_TIME_EPSILON_MS: f64 = 1e-6;

/// Horizontal band `[left, right]` new obstacles should avoid
pub fn safe_zone(player: &Player, level: u32, tuning: &Tuning) -> (f32, f32) {
    let half = player.size * tuning.safe_zone_factor(level) / 2.0;
    let center = player.center_x();
    (
        (center - half).max(0.0),
        (center + half).min(tuning.screen_width),
    )
}

/// Decides when and where new obstacles appear
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    rng: Pcg32,
    /// Clock time of the last successful spawn in this run
    last_spawn_ms: Option<f64>,
    /// Next obstacle ID (monotonic across runs)
    next_id: u32,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            last_spawn_ms: None,
            next_id: 1,
        }
    }

    /// Forget the last spawn time so the next attempt succeeds immediately
    pub fn reset(&mut self) {
        self.last_spawn_ms = None;
    }

    /// Allocate a new obstacle ID
    pub fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Spawn an obstacle if the cap and the spawn interval allow it
    pub fn try_spawn(
        &mut self,
        now_ms: f64,
        player: &Player,
        difficulty: &DifficultyState,
        live_count: usize,
        tuning: &Tuning,
    ) -> Option<Obstacle> {
        if live_count >= tuning.max_obstacles {
            return None;
        }
        if let Some(last) = self.last_spawn_ms {
            if now_ms - last + SPAWN_TIME_EPSILON_MS < difficulty.spawn_interval_ms {
                return None;
            }
        }

        let width = self
            .rng
            .random_range(tuning.obstacle_min_width..=tuning.obstacle_max_width);
        let height = self
            .rng
            .random_range(tuning.obstacle_min_height..=tuning.obstacle_max_height);
        let x = self.choose_x(width, player, difficulty.level, tuning);
        let offset = self.rng.random_range(0.0..=tuning.spawn_offset_max);

        let obstacle = Obstacle {
            id: self.allocate_id(),
            x,
            y: -height - offset,
            width,
            height,
        };
        self.last_spawn_ms = Some(now_ms);
        log::debug!(
            "Spawned obstacle {} at x={:.1} ({}x{})",
            obstacle.id,
            obstacle.x,
            obstacle.width,
            obstacle.height
        );
        Some(obstacle)
    }

    /// Pick a left edge for an obstacle of `width`
    fn choose_x(&mut self, width: f32, player: &Player, level: u32, tuning: &Tuning) -> f32 {
        let max_x = (tuning.screen_width - width).max(0.0);
        let (zone_left, zone_right) = safe_zone(player, level, tuning);

        // Left side accepts x in [0, zone_left - width], right side [zone_right, max_x]
        let left_fits = zone_left - width >= 0.0;
        let right_fits = max_x - zone_right >= 0.0;

        let x = match (left_fits, right_fits) {
            (true, true) => {
                let go_left = match tuning.side_bias {
                    SideBias::Uniform => self.rng.random_bool(0.5),
                    SideBias::ProportionalToSpace => {
                        let left_space = zone_left;
                        let right_space = tuning.screen_width - zone_right;
                        self.rng.random::<f32>() * (left_space + right_space) < left_space
                    }
                };
                if go_left {
                    self.rng.random_range(0.0..=zone_left - width)
                } else {
                    self.rng.random_range(zone_right..=max_x)
                }
            }
            (true, false) => self.rng.random_range(0.0..=zone_left - width),
            (false, true) => self.rng.random_range(zone_right..=max_x),
            (false, false) => self.fallback_x(width, max_x, player.center_x(), tuning),
        };
        x.clamp(0.0, max_x)
    }

    /// Uniform placement that retries while covering the player center.
    /// The final attempt is kept even if it still does.
    fn fallback_x(&mut self, width: f32, max_x: f32, player_center: f32, tuning: &Tuning) -> f32 {
        let mut x = 0.0;
        for _ in 0..tuning.max_placement_retries {
            x = self.rng.random_range(0.0..=max_x);
            if !(x <= player_center && player_center <= x + width) {
                return x;
            }
        }
        log::warn!("No clear spawn lane, placing obstacle over player at x={:.1}", x);
        x
    }
}

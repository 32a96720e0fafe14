//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`] so hosts can rebalance without
//! touching the simulation. Partial JSON files are accepted; missing fields
//! fall back to the defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// How the spawner picks a side when both sides of the safe zone have room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SideBias {
    /// 50/50 regardless of free space
    Uniform,
    /// Probability proportional to the free width on each side
    #[default]
    ProportionalToSpace,
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,
    pub platform_height: f32,

    // === Player ===
    pub player_size: f32,
    pub move_step: f32,

    // === Obstacles ===
    pub obstacle_min_width: f32,
    pub obstacle_max_width: f32,
    pub obstacle_min_height: f32,
    pub obstacle_max_height: f32,
    pub spawn_offset_max: f32,
    pub exit_buffer: f32,
    pub max_obstacles: usize,
    pub max_placement_retries: u32,

    // === Safe zone ===
    pub safe_zone_base_factor: f32,
    pub safe_zone_min_factor: f32,
    pub safe_zone_shrink_per_level: f32,
    pub side_bias: SideBias,

    // === Collision ===
    pub player_hitbox_buffer: f32,
    pub obstacle_hitbox_buffer: f32,

    // === Difficulty ===
    pub initial_speed: f32,
    pub speed_increment: f32,
    pub initial_spawn_interval_ms: f64,
    pub min_spawn_interval_ms: f64,
    pub spawn_interval_step_ms: f64,
    pub difficulty_interval_ms: f64,

    // === Timing ===
    pub score_interval_ms: f64,
    pub countdown_ms: f64,
    pub fixed_step_secs: f32,
    pub max_frame_secs: f32,
    pub max_substeps: u32,
    /// Score, spawn and difficulty firings come from the host through
    /// `GameState::fire_timer` instead of the built-in step timers
    pub external_timers: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            platform_height: PLATFORM_HEIGHT,

            player_size: PLAYER_SIZE,
            move_step: PLAYER_MOVE_STEP,

            obstacle_min_width: OBSTACLE_MIN_WIDTH,
            obstacle_max_width: OBSTACLE_MAX_WIDTH,
            obstacle_min_height: OBSTACLE_MIN_HEIGHT,
            obstacle_max_height: OBSTACLE_MAX_HEIGHT,
            spawn_offset_max: SPAWN_OFFSET_MAX,
            exit_buffer: EXIT_BUFFER,
            max_obstacles: MAX_OBSTACLES,
            max_placement_retries: MAX_PLACEMENT_RETRIES,

            safe_zone_base_factor: SAFE_ZONE_BASE_FACTOR,
            safe_zone_min_factor: SAFE_ZONE_MIN_FACTOR,
            safe_zone_shrink_per_level: SAFE_ZONE_SHRINK_PER_LEVEL,
            side_bias: SideBias::default(),

            player_hitbox_buffer: PLAYER_HITBOX_BUFFER,
            obstacle_hitbox_buffer: OBSTACLE_HITBOX_BUFFER,

            initial_speed: INITIAL_OBSTACLE_SPEED,
            speed_increment: SPEED_INCREMENT,
            initial_spawn_interval_ms: INITIAL_SPAWN_INTERVAL_MS,
            min_spawn_interval_ms: MIN_SPAWN_INTERVAL_MS,
            spawn_interval_step_ms: SPAWN_INTERVAL_STEP_MS,
            difficulty_interval_ms: DIFFICULTY_INTERVAL_MS,

            score_interval_ms: SCORE_INTERVAL_MS,
            countdown_ms: COUNTDOWN_MS,
            fixed_step_secs: SIM_DT,
            max_frame_secs: MAX_FRAME_DT,
            max_substeps: MAX_SUBSTEPS,
            external_timers: false,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Vertical position of the player's top edge
    #[inline]
    pub fn player_y(&self) -> f32 {
        self.screen_height - self.platform_height - self.player_size
    }

    /// Right-most x the player may occupy
    #[inline]
    pub fn player_max_x(&self) -> f32 {
        (self.screen_width - self.player_size).max(0.0)
    }

    /// Safe zone width multiplier at a difficulty level (shrinks as level rises)
    pub fn safe_zone_factor(&self, level: u32) -> f32 {
        let shrink = self.safe_zone_shrink_per_level * level.saturating_sub(1) as f32;
        (self.safe_zone_base_factor - shrink).max(self.safe_zone_min_factor)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if !(self.screen_width > 0.0) {
            return invalid("screen_width", "must be positive");
        }
        if !(self.screen_height > 0.0) {
            return invalid("screen_height", "must be positive");
        }
        if !(self.player_size > 0.0) || self.player_size > self.screen_width {
            return invalid("player_size", "must be positive and fit the screen");
        }
        if self.player_y() < 0.0 {
            return invalid("platform_height", "player must fit above the platform");
        }
        if !(self.move_step > 0.0) {
            return invalid("move_step", "must be positive");
        }
        if !(self.obstacle_min_width > 0.0) || self.obstacle_min_width > self.obstacle_max_width {
            return invalid("obstacle_min_width", "must be positive and <= max width");
        }
        if !(self.obstacle_min_height > 0.0) || self.obstacle_min_height > self.obstacle_max_height
        {
            return invalid("obstacle_min_height", "must be positive and <= max height");
        }
        if self.spawn_offset_max < 0.0 || self.exit_buffer < 0.0 {
            return invalid("spawn_offset_max", "offsets must not be negative");
        }
        if self.max_obstacles == 0 || self.max_obstacles > MAX_OBSTACLES_LIMIT {
            return invalid("max_obstacles", "must be in [1, 1024]");
        }
        if self.max_placement_retries == 0 {
            return invalid("max_placement_retries", "must be at least 1");
        }
        if !(self.safe_zone_min_factor >= 0.0) || self.safe_zone_min_factor > self.safe_zone_base_factor
        {
            return invalid("safe_zone_min_factor", "must be in [0, base factor]");
        }
        let shrink = self.safe_zone_shrink_per_level;
        if !(shrink.is_finite() && shrink >= 0.0) {
            return invalid("safe_zone_shrink_per_level", "must be finite and not negative");
        }
        if self.player_hitbox_buffer < 0.0 || self.obstacle_hitbox_buffer < 0.0 {
            return invalid("player_hitbox_buffer", "hitbox buffers must not be negative");
        }
        if self.initial_speed < 0.0 || self.speed_increment < 0.0 {
            return invalid("speed_increment", "speeds must not be negative");
        }
        if !(self.min_spawn_interval_ms > 0.0) {
            return invalid("min_spawn_interval_ms", "must be positive");
        }
        if self.initial_spawn_interval_ms < self.min_spawn_interval_ms {
            return invalid("initial_spawn_interval_ms", "must be >= min_spawn_interval_ms");
        }
        if self.spawn_interval_step_ms < 0.0 {
            return invalid("spawn_interval_step_ms", "must not be negative");
        }
        if !(self.difficulty_interval_ms > 0.0) {
            return invalid("difficulty_interval_ms", "must be positive");
        }
        if !(self.score_interval_ms > 0.0) {
            return invalid("score_interval_ms", "must be positive");
        }
        if self.countdown_ms < 0.0 {
            return invalid("countdown_ms", "must not be negative");
        }
        if !(self.fixed_step_secs > 0.0) {
            return invalid("fixed_step_secs", "must be positive");
        }
        if self.max_frame_secs < self.fixed_step_secs {
            return invalid("max_frame_secs", "must be >= fixed_step_secs");
        }
        if self.max_substeps == 0 {
            return invalid("max_substeps", "must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "screen_width": 320.0, "side_bias": "Uniform" }"#)
            .expect("partial tuning should parse");
        assert_eq!(tuning.screen_width, 320.0);
        assert_eq!(tuning.side_bias, SideBias::Uniform);
        assert_eq!(tuning.max_obstacles, MAX_OBSTACLES);
    }

    #[test]
    fn test_rejects_inverted_width_range() {
        let result = Tuning::from_json(r#"{ "obstacle_min_width": 90.0, "obstacle_max_width": 40.0 }"#);
        assert!(matches!(
            result,
            Err(TuningError::Invalid {
                field: "obstacle_min_width",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_growing_safe_zone() {
        let result = Tuning::from_json(r#"{ "safe_zone_shrink_per_level": -0.5 }"#);
        assert!(matches!(
            result,
            Err(TuningError::Invalid {
                field: "safe_zone_shrink_per_level",
                ..
            })
        ));
    }

    #[test]
    fn test_obstacle_cap_is_bounded() {
        let huge = Tuning {
            max_obstacles: MAX_OBSTACLES_LIMIT + 1,
            ..Tuning::default()
        };
        assert!(matches!(
            huge.validate(),
            Err(TuningError::Invalid {
                field: "max_obstacles",
                ..
            })
        ));
        let largest = Tuning {
            max_obstacles: MAX_OBSTACLES_LIMIT,
            ..Tuning::default()
        };
        assert!(largest.validate().is_ok());
    }

    #[test]
    fn test_safe_zone_shrinks_to_floor() {
        let tuning = Tuning::default();
        assert_eq!(tuning.safe_zone_factor(1), SAFE_ZONE_BASE_FACTOR);
        assert!(tuning.safe_zone_factor(3) < tuning.safe_zone_factor(2));
        assert_eq!(tuning.safe_zone_factor(100), SAFE_ZONE_MIN_FACTOR);
    }

    #[test]
    fn test_player_y_sits_on_platform() {
        let tuning = Tuning::default();
        assert_eq!(
            tuning.player_y() + tuning.player_size + tuning.platform_height,
            tuning.screen_height
        );
    }
}

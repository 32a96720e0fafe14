//! Drop Dodge - A falling-obstacle dodge arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, collisions, game state)
//! - `tuning`: Data-driven game balance
//! - `persistence`: Versioned snapshots of a running game
//! - `platform`: Host frame timing

pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use persistence::{SnapshotError, load_snapshot, save_snapshot};
pub use platform::FrameClock;
pub use tuning::{SideBias, Tuning, TuningError};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta accepted per advance (stalls, backgrounding)
    pub const MAX_FRAME_DT: f32 = 0.05;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Logical screen dimensions
    pub const SCREEN_WIDTH: f32 = 400.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;
    /// Height of the platform the player stands on
    pub const PLATFORM_HEIGHT: f32 = 100.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 50.0;
    /// Horizontal distance covered by one tap
    pub const PLAYER_MOVE_STEP: f32 = 40.0;

    /// Obstacle size ranges (pixels)
    pub const OBSTACLE_MIN_WIDTH: f32 = 30.0;
    pub const OBSTACLE_MAX_WIDTH: f32 = 80.0;
    pub const OBSTACLE_MIN_HEIGHT: f32 = 20.0;
    pub const OBSTACLE_MAX_HEIGHT: f32 = 40.0;
    /// Random extra height above the screen for new obstacles
    pub const SPAWN_OFFSET_MAX: f32 = 30.0;
    /// Distance below the screen an obstacle travels before it expires
    pub const EXIT_BUFFER: f32 = 10.0;
    /// Live obstacle cap
    pub const MAX_OBSTACLES: usize = 12;
    /// Largest cap a tuning file may request
    pub const MAX_OBSTACLES_LIMIT: usize = 1024;
    /// Random placement attempts when no side has room
    pub const MAX_PLACEMENT_RETRIES: u32 = 5;

    /// Safe zone width as a multiple of the player size
    pub const SAFE_ZONE_BASE_FACTOR: f32 = 2.5;
    pub const SAFE_ZONE_MIN_FACTOR: f32 = 1.2;
    pub const SAFE_ZONE_SHRINK_PER_LEVEL: f32 = 0.15;

    /// Hitbox shrink (pixels per side)
    pub const PLAYER_HITBOX_BUFFER: f32 = 6.0;
    pub const OBSTACLE_HITBOX_BUFFER: f32 = 2.0;

    /// Difficulty curve
    pub const INITIAL_OBSTACLE_SPEED: f32 = 180.0; // pixels/s
    pub const SPEED_INCREMENT: f32 = 30.0;
    pub const INITIAL_SPAWN_INTERVAL_MS: f64 = 1200.0;
    pub const MIN_SPAWN_INTERVAL_MS: f64 = 400.0;
    pub const SPAWN_INTERVAL_STEP_MS: f64 = 100.0;
    pub const DIFFICULTY_INTERVAL_MS: f64 = 10_000.0;

    /// Score cadence (one point per interval)
    pub const SCORE_INTERVAL_MS: f64 = 100.0;
    /// Built-in countdown before play (0 = driven by host)
    pub const COUNTDOWN_MS: f64 = 3000.0;
}

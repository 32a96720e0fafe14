//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod geometry;
pub mod motion;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{Collision, check as check_collision};
pub use difficulty::{DifficultyController, DifficultyState};
pub use geometry::{Rect, aabb_overlap, point_in_rect};
pub use motion::{MotionIntegrator, MotionReport};
pub use spawner::{Spawner, safe_zone};
pub use state::{GameEvent, GamePhase, GameState, Obstacle, ObstacleArena, Player};
pub use timer::{PeriodicTimer, TimerKind};

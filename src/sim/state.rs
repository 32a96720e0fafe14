//! Game state and core simulation types
//!
//! All state that must be persisted for snapshot/resume lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyState;
use super::geometry::Rect;
use super::motion::MotionIntegrator;
use super::spawner::Spawner;
use super::timer::Timers;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start command
    #[default]
    Idle,
    /// Counting down before play (driven by host or built-in timer)
    Countdown,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for restart
    GameOver,
}

/// The player's avatar (sits on the platform, moves horizontally only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

impl Player {
    /// Player centered horizontally on the platform
    pub fn centered(tuning: &Tuning) -> Self {
        Self {
            x: tuning.player_max_x() / 2.0,
            y: tuning.player_y(),
            size: tuning.player_size,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.size / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::from_xywh(self.x, self.y, self.size, self.size)
    }

    /// Move horizontally, clamped to `[0, max_x]`
    pub fn shift(&mut self, dx: f32, max_x: f32) {
        self.x = (self.x + dx).clamp(0.0, max_x.max(0.0));
    }
}

/// A falling obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge (fixed for the obstacle's lifetime)
    pub x: f32,
    /// Top edge (advanced every physics step)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::from_xywh(self.x, self.y, self.width, self.height)
    }

    /// Fully below the screen, including the exit buffer
    pub fn has_exited(&self, screen_height: f32, exit_buffer: f32) -> bool {
        self.y > screen_height + self.height + exit_buffer
    }
}

/// Fixed-capacity obstacle storage.
///
/// Slots are recycled through a free-list so a long run never reallocates.
/// Iteration follows spawn order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleArena {
    slots: Vec<Option<Obstacle>>,
    free: Vec<usize>,
    /// Occupied slot indices in spawn order
    order: Vec<usize>,
}

impl ObstacleArena {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            free: (0..capacity).rev().collect(),
            order: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.free.is_empty()
    }

    /// Store an obstacle. Returns it back if every slot is taken or the id is
    /// already live.
    pub fn insert(&mut self, obstacle: Obstacle) -> Result<(), Obstacle> {
        if self.get(obstacle.id).is_some() {
            return Err(obstacle);
        }
        let Some(slot) = self.free.pop() else {
            return Err(obstacle);
        };
        self.slots[slot] = Some(obstacle);
        self.order.push(slot);
        Ok(())
    }

    pub fn get(&self, id: u32) -> Option<&Obstacle> {
        self.iter().find(|o| o.id == id)
    }

    /// Remove by id, returning the slot to the free-list
    pub fn remove(&mut self, id: u32) -> Option<Obstacle> {
        let pos = self
            .order
            .iter()
            .position(|&slot| self.slots[slot].as_ref().is_some_and(|o| o.id == id))?;
        let slot = self.order.remove(pos);
        self.free.push(slot);
        self.slots[slot].take()
    }

    /// Remove every obstacle matching `pred`, in spawn order
    pub fn remove_where(&mut self, mut pred: impl FnMut(&Obstacle) -> bool) -> Vec<Obstacle> {
        let mut removed = Vec::new();
        let slots = &mut self.slots;
        let free = &mut self.free;
        self.order.retain(|&slot| {
            let matches = slots[slot].as_ref().is_some_and(&mut pred);
            if matches {
                if let Some(obstacle) = slots[slot].take() {
                    removed.push(obstacle);
                }
                free.push(slot);
            }
            !matches
        });
        removed
    }

    /// Drop everything, returning the removed ids in spawn order
    pub fn clear(&mut self) -> Vec<u32> {
        self.remove_where(|_| true).into_iter().map(|o| o.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> + '_ {
        self.order.iter().filter_map(|&slot| self.slots[slot].as_ref())
    }

    /// Visit every live obstacle mutably, in spawn order
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut Obstacle)) {
        for &slot in &self.order {
            if let Some(obstacle) = self.slots[slot].as_mut() {
                f(obstacle);
            }
        }
    }

    /// Copy of the live obstacles in spawn order
    pub fn snapshot(&self) -> Vec<Obstacle> {
        self.iter().cloned().collect()
    }

    /// Check the slot bookkeeping of an arena that came from outside (a
    /// snapshot). Every slot must be listed exactly once, in `free` when
    /// empty and in `order` when occupied.
    pub fn validate(&self, capacity: usize) -> Result<(), &'static str> {
        if self.slots.len() != capacity {
            return Err("slot count does not match max_obstacles");
        }
        let mut listed = vec![false; self.slots.len()];
        for &slot in self.free.iter().chain(&self.order) {
            let Some(seen) = listed.get_mut(slot) else {
                return Err("slot index out of range");
            };
            if *seen {
                return Err("slot listed twice");
            }
            *seen = true;
        }
        if listed.iter().any(|&seen| !seen) {
            return Err("slot missing from free-list and spawn order");
        }
        if self.free.iter().any(|&slot| self.slots[slot].is_some()) {
            return Err("free slot holds an obstacle");
        }
        if self.order.iter().any(|&slot| self.slots[slot].is_none()) {
            return Err("ordered slot is empty");
        }
        let mut ids: Vec<u32> = self.iter().map(|o| o.id).collect();
        ids.sort_unstable();
        if ids.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err("duplicate obstacle id");
        }
        Ok(())
    }
}

/// Events emitted for presentation, audio and storage collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    StateChanged(GamePhase),
    ScoreChanged(u64),
    LevelUp(u32),
    GameOver { final_score: u64, point: Vec2 },
    ObstacleSpawned(Obstacle),
    ObstacleRemoved(u32),
    /// Positions after an `advance` that consumed at least one step
    ObstaclesTicked(Vec<Obstacle>),
    /// Whole seconds left on the built-in countdown
    CountdownTick(u32),
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub(super) seed: u64,
    pub(super) tuning: Tuning,
    pub(super) phase: GamePhase,
    pub(super) player: Player,
    pub(super) obstacles: ObstacleArena,
    pub(super) difficulty: DifficultyState,
    pub(super) score: u64,
    /// Milliseconds of simulated play in the current run
    pub(super) clock_ms: f64,
    /// Physics steps consumed in the current run
    pub(super) time_steps: u64,
    pub(super) countdown_remaining_ms: f64,
    pub(super) spawner: Spawner,
    pub(super) integrator: MotionIntegrator,
    pub(super) timers: Timers,
    /// Pending events (transient, drained by the host)
    #[serde(skip)]
    pub(super) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game in `Idle` with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game in `Idle`. The tuning is expected to be validated.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let difficulty = DifficultyState::initial(&tuning);
        Self {
            seed,
            phase: GamePhase::Idle,
            player: Player::centered(&tuning),
            obstacles: ObstacleArena::with_capacity(tuning.max_obstacles),
            score: 0,
            clock_ms: 0.0,
            time_steps: 0,
            countdown_remaining_ms: tuning.countdown_ms,
            spawner: Spawner::new(seed),
            integrator: MotionIntegrator::default(),
            timers: Timers::new(&tuning, &difficulty),
            difficulty,
            tuning,
            events: Vec::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &ObstacleArena {
        &self.obstacles
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.difficulty.level
    }

    pub fn difficulty(&self) -> &DifficultyState {
        &self.difficulty
    }

    /// Milliseconds of play elapsed in the current run
    pub fn elapsed_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn time_steps(&self) -> u64 {
        self.time_steps
    }

    /// Events emitted since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Hand pending events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(super) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obstacle(id: u32) -> Obstacle {
        Obstacle {
            id,
            x: id as f32 * 10.0,
            y: 0.0,
            width: 30.0,
            height: 20.0,
        }
    }

    fn ids(arena: &ObstacleArena) -> Vec<u32> {
        arena.iter().map(|o| o.id).collect()
    }

    #[test]
    fn test_arena_respects_capacity() {
        let mut arena = ObstacleArena::with_capacity(2);
        assert!(arena.insert(obstacle(1)).is_ok());
        assert!(arena.insert(obstacle(2)).is_ok());
        assert!(arena.is_full());
        assert_eq!(arena.insert(obstacle(3)), Err(obstacle(3)));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_arena_rejects_duplicate_id() {
        let mut arena = ObstacleArena::with_capacity(4);
        assert!(arena.insert(obstacle(7)).is_ok());
        assert!(arena.insert(obstacle(7)).is_err());
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_arena_recycles_slots_and_keeps_spawn_order() {
        let mut arena = ObstacleArena::with_capacity(3);
        for id in 1..=3 {
            arena.insert(obstacle(id)).expect("slot available");
        }
        assert_eq!(arena.remove(1).map(|o| o.id), Some(1));
        arena.insert(obstacle(4)).expect("freed slot reused");

        // Obstacle 4 reuses slot 0 but still iterates last
        assert_eq!(ids(&arena), vec![2, 3, 4]);
        let mut visited = Vec::new();
        arena.for_each_mut(|o| visited.push(o.id));
        assert_eq!(visited, vec![2, 3, 4]);
    }

    #[test]
    fn test_arena_remove_where_and_clear() {
        let mut arena = ObstacleArena::with_capacity(4);
        for id in 1..=4 {
            arena.insert(obstacle(id)).expect("slot available");
        }
        let removed = arena.remove_where(|o| o.id % 2 == 0);
        assert_eq!(removed.iter().map(|o| o.id).collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(ids(&arena), vec![1, 3]);

        assert_eq!(arena.clear(), vec![1, 3]);
        assert!(arena.is_empty());
        assert!(!arena.is_full());
    }

    #[test]
    fn test_arena_validate_accepts_live_arena() {
        let mut arena = ObstacleArena::with_capacity(3);
        assert_eq!(arena.validate(3), Ok(()));
        arena.insert(obstacle(1)).expect("slot available");
        arena.insert(obstacle(2)).expect("slot available");
        arena.remove(1);
        assert_eq!(arena.validate(3), Ok(()));
        assert!(arena.validate(4).is_err());
    }

    #[test]
    fn test_arena_validate_rejects_broken_bookkeeping() {
        let mut arena = ObstacleArena::with_capacity(3);
        arena.insert(obstacle(1)).expect("slot available");

        let mut out_of_range = arena.clone();
        out_of_range.free = vec![99];
        assert_eq!(out_of_range.validate(3), Err("slot index out of range"));

        let mut overlapping = arena.clone();
        overlapping.free.push(overlapping.order[0]);
        assert_eq!(overlapping.validate(3), Err("slot listed twice"));

        let mut leaked = arena.clone();
        leaked.free.pop();
        assert!(leaked.validate(3).is_err());

        let mut ghost = arena.clone();
        let slot = ghost.order.remove(0);
        ghost.free.push(slot);
        assert_eq!(ghost.validate(3), Err("free slot holds an obstacle"));

        let mut twin = arena;
        let slot = twin.free.pop().expect("free slot");
        twin.slots[slot] = Some(obstacle(1));
        twin.order.push(slot);
        assert_eq!(twin.validate(3), Err("duplicate obstacle id"));
    }

    #[test]
    fn test_player_shift_clamps() {
        let tuning = Tuning::default();
        let mut player = Player::centered(&tuning);
        player.shift(-10_000.0, tuning.player_max_x());
        assert_eq!(player.x, 0.0);
        player.shift(10_000.0, tuning.player_max_x());
        assert_eq!(player.x, tuning.player_max_x());
    }

    #[test]
    fn test_obstacle_exit_includes_height_and_buffer() {
        let o = Obstacle {
            id: 1,
            x: 0.0,
            y: 830.0,
            width: 30.0,
            height: 20.0,
        };
        assert!(!o.has_exited(800.0, 10.0));
        assert!(o.has_exited(800.0, 9.0));
    }

    #[test]
    fn test_new_game_is_idle() {
        let state = GameState::new(1);
        assert_eq!(state.phase(), GamePhase::Idle);
        assert_eq!(state.score(), 0);
        assert_eq!(state.level(), 1);
        assert!(state.obstacles().is_empty());
        assert!(state.events().is_empty());
    }
}

//! Player vs obstacle collision detection
//!
//! Both hitboxes are shrunk before the overlap test. The player's buffer is
//! larger than the obstacles' so near misses read as misses.

use glam::Vec2;

use super::geometry::Rect;
use super::state::{Obstacle, Player};
use crate::tuning::Tuning;

/// A detected hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// Obstacle that was hit
    pub obstacle_id: u32,
    /// Center of the overlapping hitbox region
    pub point: Vec2,
}

/// Player hitbox after the player buffer
pub fn player_hitbox(player: &Player, tuning: &Tuning) -> Rect {
    player.rect().shrink(tuning.player_hitbox_buffer)
}

/// Obstacle hitbox after the obstacle buffer, or `None` for an obstacle with
/// non-finite or empty geometry
pub fn obstacle_hitbox(obstacle: &Obstacle, tuning: &Tuning) -> Option<Rect> {
    let rect = obstacle.rect();
    if !rect.is_well_formed() {
        return None;
    }
    Some(rect.shrink(tuning.obstacle_hitbox_buffer))
}

/// First obstacle overlapping the player, in iteration order.
///
/// Pure: nothing is mutated. Malformed obstacles are skipped.
pub fn check<'a>(
    player: &Player,
    obstacles: impl IntoIterator<Item = &'a Obstacle>,
    tuning: &Tuning,
) -> Option<Collision> {
    let player_box = player_hitbox(player, tuning);
    if !player_box.min.is_finite() || !player_box.max.is_finite() {
        return None;
    }

    obstacles.into_iter().find_map(|obstacle| {
        let Some(obstacle_box) = obstacle_hitbox(obstacle, tuning) else {
            log::debug!("Skipping malformed obstacle {}", obstacle.id);
            return None;
        };
        player_box.intersection(&obstacle_box).map(|overlap| Collision {
            obstacle_id: obstacle.id,
            point: overlap.center(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(tuning: &Tuning) -> Player {
        Player {
            x: 100.0,
            ..Player::centered(tuning)
        }
    }

    fn obstacle(id: u32, x: f32, y: f32) -> Obstacle {
        Obstacle {
            id,
            x,
            y,
            width: 40.0,
            height: 30.0,
        }
    }

    #[test]
    fn test_direct_hit() {
        let tuning = Tuning::default();
        let p = player(&tuning);
        let o = obstacle(1, p.x, p.y);
        let hit = check(&p, [&o], &tuning).expect("overlapping boxes collide");
        assert_eq!(hit.obstacle_id, 1);
        assert!(player_hitbox(&p, &tuning).contains_point(hit.point));
    }

    #[test]
    fn test_clear_miss() {
        let tuning = Tuning::default();
        let p = player(&tuning);
        let o = obstacle(1, p.x + 200.0, p.y);
        assert!(check(&p, [&o], &tuning).is_none());
    }

    #[test]
    fn test_buffers_forgive_grazes() {
        let tuning = Tuning::default();
        let p = player(&tuning);
        // Raw boxes overlap by 5px horizontally; combined buffers are 8px
        let o = obstacle(1, p.x + p.size - 5.0, p.y);
        assert!(p.rect().overlaps(&o.rect()));
        assert!(check(&p, [&o], &tuning).is_none());
    }

    #[test]
    fn test_malformed_obstacle_is_skipped() {
        let tuning = Tuning::default();
        let p = player(&tuning);
        let broken = obstacle(1, f32::NAN, p.y);
        let real = obstacle(2, p.x, p.y);
        let hit = check(&p, [&broken, &real], &tuning).expect("real obstacle still hits");
        assert_eq!(hit.obstacle_id, 2);
        assert!(check(&p, [&broken], &tuning).is_none());
    }

    #[test]
    fn test_order_only_changes_reported_obstacle() {
        let tuning = Tuning::default();
        let p = player(&tuning);
        let a = obstacle(1, p.x, p.y);
        let b = obstacle(2, p.x + 10.0, p.y);
        let miss = obstacle(3, 0.0, 0.0);

        let forward = check(&p, [&miss, &a, &b], &tuning).map(|c| c.obstacle_id);
        let reversed = check(&p, [&b, &a, &miss], &tuning).map(|c| c.obstacle_id);
        assert_eq!(forward, Some(1));
        assert_eq!(reversed, Some(2));
    }
}

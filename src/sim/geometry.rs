//! Axis-aligned rectangle geometry for hitboxes
//!
//! Screen space: x grows right, y grows down. A rectangle is stored as its
//! min (top-left) and max (bottom-right) corners.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Rectangle from its top-left corner and size
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Shrink inward by `buffer` on every side.
    ///
    /// A buffer larger than half the extent collapses that axis onto the
    /// center line instead of inverting the rectangle.
    pub fn shrink(&self, buffer: f32) -> Self {
        let center = self.center();
        let half = ((self.max - self.min) * 0.5 - Vec2::splat(buffer)).max(Vec2::ZERO);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap test (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Inclusive point containment
    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Overlapping region, if any
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Rect {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        })
    }

    /// All corners and extents are finite and the size is positive
    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.width() > 0.0 && self.height() > 0.0
    }
}

/// Overlap test between two rectangles after shrinking each by its own buffer
pub fn aabb_overlap(a: &Rect, buffer_a: f32, b: &Rect, buffer_b: f32) -> bool {
    a.shrink(buffer_a).overlaps(&b.shrink(buffer_b))
}

/// Whether a point lies inside an `x, y, width, height` rectangle
#[inline]
pub fn point_in_rect(point: Vec2, x: f32, y: f32, width: f32, height: f32) -> bool {
    Rect::from_xywh(x, y, width, height).contains_point(point)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_and_touching() {
        let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_xywh(5.0, 5.0, 10.0, 10.0);
        let touching = Rect::from_xywh(10.0, 0.0, 10.0, 10.0);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&touching));
    }

    #[test]
    fn test_shrink_removes_marginal_overlap() {
        let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_xywh(8.0, 0.0, 10.0, 10.0);

        assert!(aabb_overlap(&a, 0.0, &b, 0.0));
        // 2px of overlap disappears once each side gives up 1px
        assert!(!aabb_overlap(&a, 1.0, &b, 1.0));
    }

    #[test]
    fn test_shrink_never_inverts() {
        let r = Rect::from_xywh(0.0, 0.0, 4.0, 20.0).shrink(5.0);
        assert_eq!(r.width(), 0.0);
        assert_eq!(r.height(), 10.0);
        assert_eq!(r.center(), Vec2::new(2.0, 10.0));
    }

    #[test]
    fn test_intersection_center() {
        let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_xywh(6.0, 4.0, 10.0, 10.0);
        let hit = a.intersection(&b).expect("rects overlap");
        assert_eq!(hit.center(), Vec2::new(8.0, 7.0));
        assert!(a.intersection(&Rect::from_xywh(20.0, 20.0, 1.0, 1.0)).is_none());
    }

    #[test]
    fn test_point_in_rect() {
        assert!(point_in_rect(Vec2::new(5.0, 5.0), 0.0, 0.0, 10.0, 10.0));
        assert!(point_in_rect(Vec2::new(10.0, 10.0), 0.0, 0.0, 10.0, 10.0));
        assert!(!point_in_rect(Vec2::new(-0.1, 5.0), 0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_well_formed() {
        assert!(Rect::from_xywh(0.0, 0.0, 1.0, 1.0).is_well_formed());
        assert!(!Rect::from_xywh(f32::NAN, 0.0, 1.0, 1.0).is_well_formed());
        assert!(!Rect::from_xywh(0.0, 0.0, 0.0, 1.0).is_well_formed());
    }
}

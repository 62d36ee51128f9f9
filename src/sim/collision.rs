//! Axis-aligned rectangle collision primitives
//!
//! Every interactive entity is an axis-aligned rectangle; all combat rules
//! are resolved with the overlap test below. Callers must check `active`
//! before querying collision (the tick loop removes inactive entities each
//! pass, so a stale hit cannot be double-counted).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Standard AABB overlap test (shared edges do not count as overlap)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// Fully below the playfield, or fully off either horizontal edge
    pub fn off_playfield(&self, width: f32, height: f32) -> bool {
        self.y > height || self.y + self.h < 0.0 || self.x + self.w < 0.0 || self.x > width
    }
}

/// Center-to-center range test for radial effects (bomb blast, gravity well)
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_hit() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_overlap_miss() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_off_playfield() {
        let below = Rect::new(100.0, 721.0, 10.0, 10.0);
        assert!(below.off_playfield(1280.0, 720.0));

        let above = Rect::new(100.0, -20.0, 10.0, 10.0);
        assert!(above.off_playfield(1280.0, 720.0));

        let inside = Rect::new(100.0, 100.0, 10.0, 10.0);
        assert!(!inside.off_playfield(1280.0, 720.0));

        // Partially above the top edge is still in play (enemies enter there)
        let entering = Rect::new(100.0, -5.0, 10.0, 10.0);
        assert!(!entering.off_playfield(1280.0, 720.0));
    }

    #[test]
    fn test_within_radius() {
        let a = Vec2::new(0.0, 0.0);
        assert!(within_radius(a, Vec2::new(3.0, 4.0), 5.0));
        assert!(!within_radius(a, Vec2::new(3.0, 4.0), 4.9));
    }
}

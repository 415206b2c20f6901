//! Planar geometry shared by decks, tiles and persistence.
//!
//! The tabletop is laid out on the XY plane. `z` on a card is not
//! geometry: it carries the card's stacking index so the rendering layer
//! can recover draw order.

use serde::{Deserialize, Serialize};

/// A point or offset on the table plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Rotate counter-clockwise about the origin.
    #[must_use]
    pub fn rotated(self, degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Offset by `step` repeated `times` times.
    #[must_use]
    pub fn stepped(self, step: Vec2, times: usize) -> Self {
        let n = times as f32;
        Self {
            x: self.x + step.x * n,
            y: self.y + step.y * n,
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// World position of a card or tile group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Position on the plane at `point` with depth `z`.
    #[must_use]
    pub const fn on_plane(point: Vec2, z: f32) -> Self {
        Self { x: point.x, y: point.y, z }
    }

    /// Planar part of this position.
    #[must_use]
    pub const fn planar(self) -> Vec2 {
        Vec2 { x: self.x, y: self.y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5
    }

    #[test]
    fn test_rotation_quarter_turns() {
        let v = Vec2::new(1.0, 0.0);
        assert!(close(v.rotated(90.0), Vec2::new(0.0, 1.0)));
        assert!(close(v.rotated(180.0), Vec2::new(-1.0, 0.0)));
        assert!(close(v.rotated(0.0), v));
    }

    #[test]
    fn test_stepped() {
        let origin = Vec2::new(1.0, 2.0);
        assert_eq!(origin.stepped(Vec2::new(1.75, 0.0), 2), Vec2::new(4.5, 2.0));
        assert_eq!(origin.stepped(Vec2::new(1.75, 0.0), 0), origin);
    }

    #[test]
    fn test_position_planar() {
        let p = Position::on_plane(Vec2::new(3.0, -1.0), 4.0);
        assert_eq!(p.z, 4.0);
        assert_eq!(p.planar(), Vec2::new(3.0, -1.0));
    }
}

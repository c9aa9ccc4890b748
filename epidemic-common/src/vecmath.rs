use serde::{Deserialize, Serialize};

/// A simple 2D vector, trimmed to the operations the engine needs.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// Creates a new Vec2.
    pub fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    pub fn add(self, other: Self) -> Self {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    pub fn sub(self, other: Self) -> Self {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    pub fn scale(self, scalar: f32) -> Self {
        Vec2 {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }

    /// Calculates the squared distance to another vector (point).
    pub fn distance_squared(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Calculates the distance to another vector (point).
    pub fn distance(self, other: Self) -> f32 {
        self.distance_squared(other).sqrt()
    }
}

/// Unit vector pointing along the given heading.
pub fn angle_to_vec(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Heading of the given vector.
pub fn vec_to_angle(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

//! 3D positions and the fixed warehouse bounds box.

use serde::{Deserialize, Serialize};

/// Tolerance used when comparing positions after a command.
pub const POSITION_TOLERANCE: f64 = 0.01;

/// 3D position vector. `y` is height above the floor.
///
/// Serialized as a plain `[x, y, z]` array to match the wire shape the
/// HTTP layer exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 3]", from = "[f64; 3]")]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance_squared(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn distance(&self, other: &Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Positional equality within [`POSITION_TOLERANCE`] on every axis.
    pub fn approx_eq(&self, other: &Self) -> bool {
        (self.x - other.x).abs() <= POSITION_TOLERANCE
            && (self.y - other.y).abs() <= POSITION_TOLERANCE
            && (self.z - other.z).abs() <= POSITION_TOLERANCE
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Self { x: v[0], y: v[1], z: v[2] }
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

/// The fixed warehouse bounds box, anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, depth: f64, height: f64) -> Self {
        Self { width, depth, height }
    }

    /// A point is in bounds when `0 <= x <= width`, `0 <= z <= depth`,
    /// and `0 <= y <= height`.
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= 0.0
            && p.x <= self.width
            && p.z >= 0.0
            && p.z <= self.depth
            && p.y >= 0.0
            && p.y <= self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 4.0, 0.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn approx_eq_uses_per_axis_tolerance() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        assert!(a.approx_eq(&Vec3::new(1.009, 2.0, 3.0)));
        assert!(!a.approx_eq(&Vec3::new(1.02, 2.0, 3.0)));
    }

    #[test]
    fn bounds_include_the_faces() {
        let bounds = Bounds::new(50.0, 30.0, 10.0);
        assert!(bounds.contains(Vec3::new(0.0, 0.0, 0.0)));
        assert!(bounds.contains(Vec3::new(50.0, 10.0, 30.0)));
        assert!(!bounds.contains(Vec3::new(50.1, 0.0, 0.0)));
        assert!(!bounds.contains(Vec3::new(5.0, -0.1, 5.0)));
        assert!(!bounds.contains(Vec3::new(5.0, 0.0, 30.5)));
    }

    #[test]
    fn vec3_serializes_as_array() {
        let v = Vec3::new(5.0, 0.0, 5.0);
        let arr: [f64; 3] = v.into();
        assert_eq!(arr, [5.0, 0.0, 5.0]);
        assert_eq!(Vec3::from(arr), v);
    }
}

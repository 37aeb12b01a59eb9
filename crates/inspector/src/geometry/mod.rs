pub mod clip;
pub mod mesh;
pub mod picking;
pub mod section;

use glam::DVec3;

pub use mesh::MeshData;
pub use picking::{Aabb, Ray};

/// Oriented plane. As a half-space boundary the normal points outward:
/// points with a non-positive signed distance are inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub origin: DVec3,
    pub normal: DVec3,
}

impl Plane {
    /// Plane through `origin`; `normal` is normalized
    pub fn new(origin: DVec3, normal: DVec3) -> Self {
        Self {
            origin,
            normal: normal.normalize_or_zero(),
        }
    }

    pub fn signed_distance(&self, p: DVec3) -> f64 {
        (p - self.origin).dot(self.normal)
    }

    /// Same plane with the normal reversed
    pub fn flipped(&self) -> Self {
        Self {
            origin: self.origin,
            normal: -self.normal,
        }
    }
}

/// The six outward-facing half-space planes bounding an axis-aligned box
pub fn aabb_halfspaces(aabb: &Aabb) -> [Plane; 6] {
    [
        Plane::new(aabb.min, DVec3::NEG_X),
        Plane::new(aabb.max, DVec3::X),
        Plane::new(aabb.min, DVec3::NEG_Y),
        Plane::new(aabb.max, DVec3::Y),
        Plane::new(aabb.min, DVec3::NEG_Z),
        Plane::new(aabb.max, DVec3::Z),
    ]
}

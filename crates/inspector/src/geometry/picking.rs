use glam::DVec3;

use super::mesh::MeshData;

/// A ray in world space
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: DVec3,
    /// Unit direction
    pub direction: DVec3,
}

impl Ray {
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Bounds of a point set, `None` when empty
    pub fn from_points(points: &[DVec3]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        Some(Self { min, max })
    }

    /// Parse `[minX, maxX, minY, maxY, minZ, maxZ]`
    pub fn from_array(b: [f64; 6]) -> Self {
        Self::new(DVec3::new(b[0], b[2], b[4]), DVec3::new(b[1], b[3], b[5]))
    }

    /// `[minX, maxX, minY, maxY, minZ, maxZ]`
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.min.x, self.max.x, self.min.y, self.max.y, self.min.z, self.max.z,
        ]
    }

    /// Center of the bounding box
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    pub fn diagonal(&self) -> f64 {
        self.size().length()
    }

    pub fn contains(&self, p: DVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Corner `i` takes max x if bit 0 is set, max y for bit 1, max z for bit 2
    pub fn corners(&self) -> [DVec3; 8] {
        std::array::from_fn(|i| {
            DVec3::new(
                if i & 1 != 0 { self.max.x } else { self.min.x },
                if i & 2 != 0 { self.max.y } else { self.min.y },
                if i & 4 != 0 { self.max.z } else { self.min.z },
            )
        })
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f64> {
    let inv_dir = ray.direction.recip();

    let t1 = (aabb.min - ray.origin) * inv_dir;
    let t2 = (aabb.max - ray.origin) * inv_dir;

    let tmin = t1.min(t2).max_element();
    let tmax = t1.max(t2).min_element();

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Möller-Trumbore ray-triangle intersection algorithm.
/// Returns the distance along the ray if hit, or None if no intersection.
pub fn ray_triangle_intersect(ray: &Ray, v0: DVec3, v1: DVec3, v2: DVec3) -> Option<f64> {
    const EPSILON: f64 = 1e-12;
    // Hits on a shared edge must land in at least one of its triangles
    const EDGE_TOLERANCE: f64 = 1e-9;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    if !(-EDGE_TOLERANCE..=1.0 + EDGE_TOLERANCE).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    if v < -EDGE_TOLERANCE || u + v > 1.0 + EDGE_TOLERANCE {
        return None;
    }

    let t = f * edge2.dot(q);

    // Intersection is behind ray origin
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Nearest triangle hit of the ray against a surface mesh, as distance along the ray
pub fn pick_triangle(ray: &Ray, mesh: &MeshData) -> Option<f64> {
    if let Some(aabb) = mesh.bounds() {
        ray_aabb(ray, &aabb)?;
    }

    (0..mesh.triangle_count())
        .filter_map(|idx| {
            let [v0, v1, v2] = mesh.triangle(idx);
            ray_triangle_intersect(ray, v0, v1, v2)
        })
        .min_by(|a, b| a.total_cmp(b))
}

/// Vertex closest to the ray, accepted when its perpendicular distance is
/// within `tolerance(t)` where `t` is its depth along the ray.
/// Returns `(t, vertex)` for the accepted vertex nearest the ray axis.
pub fn pick_vertex(
    ray: &Ray,
    mesh: &MeshData,
    tolerance: impl Fn(f64) -> f64,
) -> Option<(f64, DVec3)> {
    let mut best: Option<(f64, f64, DVec3)> = None;

    for p in &mesh.positions {
        let t = (*p - ray.origin).dot(ray.direction);
        if t <= 0.0 {
            continue;
        }
        let off_axis = (*p - ray.at(t)).length();
        if off_axis > tolerance(t) {
            continue;
        }
        // Prefer the vertex closest to the ray axis, then the nearest one
        let better = best.map_or(true, |(bd, bt, _)| off_axis < bd || (off_axis == bd && t < bt));
        if better {
            best = Some((off_axis, t, *p));
        }
    }

    best.map(|(_, t, p)| (t, p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::mesh;

    fn down_z(x: f64, y: f64) -> Ray {
        Ray {
            origin: DVec3::new(x, y, 10.0),
            direction: DVec3::NEG_Z,
        }
    }

    #[test]
    fn test_aabb_from_points() {
        let b = Aabb::from_points(&[
            DVec3::new(1.0, -2.0, 3.0),
            DVec3::new(-1.0, 4.0, 0.0),
        ])
        .unwrap();
        assert_eq!(b.min, DVec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max, DVec3::new(1.0, 4.0, 3.0));
        assert_eq!(b.center(), DVec3::new(0.0, 1.0, 1.5));
        assert!(Aabb::from_points(&[]).is_none());
    }

    #[test]
    fn test_aabb_array_roundtrip_order() {
        let b = Aabb::from_array([-5.0, 5.0, -4.0, 4.0, -3.0, 3.0]);
        assert_eq!(b.min, DVec3::new(-5.0, -4.0, -3.0));
        assert_eq!(b.to_array(), [-5.0, 5.0, -4.0, 4.0, -3.0, 3.0]);
    }

    #[test]
    fn test_ray_aabb_hit_and_miss() {
        let b = Aabb::new(DVec3::splat(-1.0), DVec3::splat(1.0));
        assert_eq!(ray_aabb(&down_z(0.0, 0.0), &b), Some(9.0));
        assert!(ray_aabb(&down_z(3.0, 0.0), &b).is_none());
    }

    #[test]
    fn test_ray_triangle_hit() {
        let t = ray_triangle_intersect(
            &down_z(0.2, 0.2),
            DVec3::ZERO,
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(t, Some(10.0));
    }

    #[test]
    fn test_ray_triangle_miss_outside() {
        let t = ray_triangle_intersect(
            &down_z(0.8, 0.8),
            DVec3::ZERO,
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        );
        assert!(t.is_none());
    }

    #[test]
    fn test_pick_triangle_nearest_face() {
        let cube = mesh::cube(2.0, 2.0, 2.0);
        let t = pick_triangle(&down_z(0.1, 0.3), &cube).unwrap();
        // Top face of the cube sits at z = 1
        assert!((down_z(0.1, 0.3).at(t).z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pick_vertex_within_tolerance() {
        let cloud = mesh::point_lattice(3, 1.0);
        let (_, p) = pick_vertex(&down_z(0.02, -0.01), &cloud, |_| 0.05).unwrap();
        // Nearest along the ray among the column at x=0, y=0 is the top one
        assert_eq!(p, DVec3::new(0.0, 0.0, 1.0));
        assert!(pick_vertex(&down_z(0.5, 0.5), &cloud, |_| 0.05).is_none());
    }
}

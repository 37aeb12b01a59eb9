//! Measurement geometry computed from picked points.
//!
//! Every function here is total: degenerate input (coincident points,
//! collinear triangles) yields `0.0` or `None`, never NaN or infinity.

use glam::DVec3;

/// Cross products shorter than this are treated as a degenerate triangle
pub const DEGENERATE_NORMAL_EPSILON: f64 = 1e-6;

/// Componentwise differences between two points plus the planar and full distances
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deltas {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    pub dxy: f64,
    pub dxz: f64,
    pub dyz: f64,
    pub distance: f64,
}

/// Everything displayed for a three-point measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleMetrics {
    pub area: f64,
    pub ab: f64,
    pub bc: f64,
    pub ca: f64,
    /// Interior angle at A, opposite edge BC (degrees)
    pub angle_a: f64,
    /// Interior angle at B, opposite edge CA (degrees)
    pub angle_b: f64,
    /// Interior angle at C, opposite edge AB (degrees)
    pub angle_c: f64,
    /// `None` when the triangle is degenerate
    pub normal: Option<DVec3>,
}

/// Clamp to the finite range; NaN from non-finite input reads as `0.0`
fn bounded(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(-f64::MAX, f64::MAX)
    }
}

/// Euclidean length scaled by the largest component so squaring cannot overflow
fn scaled_length(v: DVec3) -> f64 {
    let s = v.abs().max_element();
    if s == 0.0 || !s.is_finite() {
        return bounded(s);
    }
    bounded((v / s).length() * s)
}

/// Edge vectors AB and AC divided by their largest component, with that scale
fn scaled_legs(a: DVec3, b: DVec3, c: DVec3) -> Option<(DVec3, DVec3, f64)> {
    let u = b - a;
    let v = c - a;
    let s = u.abs().max_element().max(v.abs().max_element());
    if s == 0.0 || !s.is_finite() {
        return None;
    }
    Some((u / s, v / s, s))
}

pub fn distance(p1: DVec3, p2: DVec3) -> f64 {
    scaled_length(p2 - p1)
}

pub fn deltas(p1: DVec3, p2: DVec3) -> Deltas {
    let d = p2 - p1;
    Deltas {
        dx: bounded(d.x),
        dy: bounded(d.y),
        dz: bounded(d.z),
        dxy: bounded(d.x.hypot(d.y)),
        dxz: bounded(d.x.hypot(d.z)),
        dyz: bounded(d.y.hypot(d.z)),
        distance: scaled_length(d),
    }
}

/// Triangle area: half the length of `(B-A) × (C-A)`, saturating at `f64::MAX`
pub fn area(a: DVec3, b: DVec3, c: DVec3) -> f64 {
    match scaled_legs(a, b, c) {
        Some((u, v, s)) => bounded(0.5 * u.cross(v).length() * s * s),
        None => 0.0,
    }
}

/// Angle between `a - vertex` and `b - vertex`, in degrees within `[0, 180]`.
///
/// A zero-length leg has no direction; the angle is reported as `0.0`.
pub fn angle_at(vertex: DVec3, a: DVec3, b: DVec3) -> f64 {
    let u = a - vertex;
    let v = b - vertex;
    let len_u = scaled_length(u);
    let len_v = scaled_length(v);
    if len_u <= f64::EPSILON || len_v <= f64::EPSILON {
        return 0.0;
    }
    // Rounding can push the cosine a hair outside [-1, 1].
    let cos = (u / len_u).dot(v / len_v).clamp(-1.0, 1.0);
    let angle = cos.acos().to_degrees();
    if angle.is_finite() {
        angle
    } else {
        0.0
    }
}

/// Unit normal of triangle ABC following the right-hand rule, `None` if degenerate
pub fn unit_normal(a: DVec3, b: DVec3, c: DVec3) -> Option<DVec3> {
    let (u, v, s) = scaled_legs(a, b, c)?;
    let n = u.cross(v);
    let len = n.length();
    // Compare the unscaled cross product length against the threshold
    if len * s * s < DEGENERATE_NORMAL_EPSILON || !len.is_finite() || len == 0.0 {
        return None;
    }
    Some(n / len)
}

pub fn triangle(a: DVec3, b: DVec3, c: DVec3) -> TriangleMetrics {
    TriangleMetrics {
        area: area(a, b, c),
        ab: distance(a, b),
        bc: distance(b, c),
        ca: distance(c, a),
        angle_a: angle_at(a, b, c),
        angle_b: angle_at(b, c, a),
        angle_c: angle_at(c, a, b),
        normal: unit_normal(a, b, c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_three_four_five() {
        let a = DVec3::ZERO;
        let b = DVec3::new(3.0, 4.0, 0.0);
        assert_relative_eq!(distance(a, b), 5.0);
    }

    #[test]
    fn test_distance_symmetric() {
        let pts = [
            DVec3::new(1.5, -2.0, 7.25),
            DVec3::new(-3.0, 0.1, 2.0),
            DVec3::new(1e6, 1e-6, -4.0),
            DVec3::ZERO,
        ];
        for a in pts {
            for b in pts {
                assert_eq!(distance(a, b), distance(b, a));
            }
        }
    }

    #[test]
    fn test_deltas() {
        let d = deltas(DVec3::ZERO, DVec3::new(3.0, 4.0, 0.0));
        assert_relative_eq!(d.dx, 3.0);
        assert_relative_eq!(d.dy, 4.0);
        assert_relative_eq!(d.dz, 0.0);
        assert_relative_eq!(d.dxy, 5.0);
        assert_relative_eq!(d.dxz, 3.0);
        assert_relative_eq!(d.dyz, 4.0);
        assert_relative_eq!(d.distance, 5.0);
    }

    #[test]
    fn test_right_triangle() {
        let m = triangle(
            DVec3::ZERO,
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        );
        assert_relative_eq!(m.area, 0.5);
        assert_relative_eq!(m.ab, 1.0);
        assert_relative_eq!(m.bc, 2f64.sqrt());
        assert_relative_eq!(m.ca, 1.0);
        assert_relative_eq!(m.angle_a, 90.0, epsilon = 1e-9);
        assert_relative_eq!(m.angle_b, 45.0, epsilon = 1e-9);
        assert_relative_eq!(m.angle_c, 45.0, epsilon = 1e-9);
        let n = m.normal.unwrap();
        assert_relative_eq!(n.x, 0.0);
        assert_relative_eq!(n.y, 0.0);
        assert_relative_eq!(n.z, 1.0);
    }

    #[test]
    fn test_angles_sum_to_180() {
        let m = triangle(
            DVec3::new(0.3, -1.2, 4.0),
            DVec3::new(2.0, 5.5, -1.0),
            DVec3::new(-7.0, 0.25, 0.5),
        );
        assert_relative_eq!(m.angle_a + m.angle_b + m.angle_c, 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_angle_range() {
        let v = DVec3::new(1.0, 1.0, 1.0);
        let samples = [
            DVec3::new(2.0, 1.0, 1.0),
            DVec3::new(0.0, 1.0, 1.0),
            DVec3::new(1.0, 3.0, -2.0),
            DVec3::new(-5.0, 0.5, 9.0),
        ];
        for a in samples {
            for b in samples {
                let angle = angle_at(v, a, b);
                assert!((0.0..=180.0).contains(&angle), "angle {angle} out of range");
            }
        }
    }

    #[test]
    fn test_angle_clamped_for_collinear() {
        // Opposite legs: cosine lands on -1 (or a rounding step past it)
        let angle = angle_at(
            DVec3::new(0.1, 0.1, 0.1),
            DVec3::new(0.3, 0.3, 0.3),
            DVec3::new(-0.7, -0.7, -0.7),
        );
        assert!(angle.is_finite());
        assert_relative_eq!(angle, 180.0, epsilon = 1e-4);

        let angle = angle_at(
            DVec3::ZERO,
            DVec3::new(1e-3, 1e-3, 1e-3),
            DVec3::new(7.0, 7.0, 7.0),
        );
        assert!(angle.is_finite());
        assert!(angle.abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_triangle() {
        let p = DVec3::new(1.0, 2.0, 3.0);
        let m = triangle(p, p, p);
        assert_eq!(m.area, 0.0);
        assert_eq!(m.angle_a, 0.0);
        assert_eq!(m.angle_b, 0.0);
        assert_eq!(m.angle_c, 0.0);
        assert!(m.normal.is_none());
    }

    #[test]
    fn test_collinear_triangle_has_no_normal() {
        let n = unit_normal(
            DVec3::ZERO,
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
        );
        assert!(n.is_none());
    }

    #[test]
    fn test_coincident_points_zero_distance() {
        let p = DVec3::new(-4.0, 2.0, 0.5);
        let d = deltas(p, p);
        assert_eq!(d.distance, 0.0);
        assert_eq!(d.dxy, 0.0);
    }

    #[test]
    fn test_huge_legs_stay_finite() {
        // Squared components of 1e155 overflow f64
        let a = DVec3::ZERO;
        let b = DVec3::new(1e155, 0.0, 0.0);
        let c = DVec3::new(0.0, 1e155, 0.0);

        assert_relative_eq!(distance(a, b), 1e155, max_relative = 1e-12);
        let d = deltas(b, c);
        assert_relative_eq!(d.distance, 2f64.sqrt() * 1e155, max_relative = 1e-12);
        assert_relative_eq!(d.dxy, d.distance, max_relative = 1e-12);

        let m = triangle(a, b, c);
        assert!(m.area.is_finite() && m.area > 0.0);
        assert_relative_eq!(m.bc, 2f64.sqrt() * 1e155, max_relative = 1e-12);
        assert_relative_eq!(m.angle_a, 90.0, epsilon = 1e-9);
        assert_relative_eq!(m.angle_b, 45.0, epsilon = 1e-9);
        assert_relative_eq!(m.angle_c, 45.0, epsilon = 1e-9);
        let n = m.normal.unwrap();
        assert_relative_eq!(n.z, 1.0);
    }

    #[test]
    fn test_huge_collinear_triangle() {
        let m = triangle(
            DVec3::ZERO,
            DVec3::new(1e155, 0.0, 0.0),
            DVec3::new(2e155, 0.0, 0.0),
        );
        assert_eq!(m.area, 0.0);
        assert!(m.normal.is_none());
        for angle in [m.angle_a, m.angle_b, m.angle_c] {
            assert!((0.0..=180.0).contains(&angle), "angle {angle} out of range");
        }
        assert_relative_eq!(m.angle_b, 180.0, epsilon = 1e-9);
        assert_relative_eq!(m.ca, 2e155, max_relative = 1e-12);
    }

    #[test]
    fn test_distance_past_f64_range_saturates() {
        let d = deltas(DVec3::splat(-f64::MAX), DVec3::splat(f64::MAX));
        assert_eq!(d.dx, f64::MAX);
        assert_eq!(d.distance, f64::MAX);
        assert_eq!(area(DVec3::ZERO, DVec3::X * f64::MAX, DVec3::Y * f64::MAX), f64::MAX);
    }
}

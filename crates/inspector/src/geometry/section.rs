//! Plane sections: the cut curve of a surface mesh, or the slab of a point cloud.

use std::collections::{HashMap, HashSet};

use glam::DVec3;

use super::mesh::MeshData;
use super::Plane;

/// Tolerance for treating a vertex as lying on the cutting plane
const ON_PLANE_TOLERANCE: f64 = 1e-9;

/// Intersect one triangle with the plane: 0 or 2 points forming a segment
fn intersect_triangle(v: [DVec3; 3], plane: &Plane) -> Option<(DVec3, DVec3)> {
    let d = v.map(|p| plane.signed_distance(p));

    // Triangles lying in the plane contribute no well-defined segment
    if d.iter().all(|x| x.abs() < ON_PLANE_TOLERANCE) {
        return None;
    }

    let mut points: Vec<DVec3> = Vec::with_capacity(3);
    let mut push = |p: DVec3| {
        if !points.iter().any(|q| (*q - p).length() < ON_PLANE_TOLERANCE) {
            points.push(p);
        }
    };

    for i in 0..3 {
        let j = (i + 1) % 3;
        if d[i].abs() < ON_PLANE_TOLERANCE {
            push(v[i]);
        }
        let crosses = (d[i] > ON_PLANE_TOLERANCE && d[j] < -ON_PLANE_TOLERANCE)
            || (d[i] < -ON_PLANE_TOLERANCE && d[j] > ON_PLANE_TOLERANCE);
        if crosses {
            let t = d[i] / (d[i] - d[j]);
            push(v[i] + (v[j] - v[i]) * t);
        }
    }

    match points.as_slice() {
        [a, b] => Some((*a, *b)),
        _ => None,
    }
}

/// Quantized position used to weld segment endpoints shared by neighbouring triangles
fn point_key(p: DVec3) -> (i64, i64, i64) {
    let scale = 1.0 / ON_PLANE_TOLERANCE;
    (
        (p.x * scale).round() as i64,
        (p.y * scale).round() as i64,
        (p.z * scale).round() as i64,
    )
}

/// Cut curve of a triangulated mesh as a line mesh with welded endpoints
pub fn section_surface(mesh: &MeshData, plane: &Plane) -> MeshData {
    let mut positions = Vec::new();
    let mut lines = Vec::new();
    let mut welded: HashMap<(i64, i64, i64), u32> = HashMap::new();
    let mut emitted: HashSet<(u32, u32)> = HashSet::new();

    let mut index_of = |p: DVec3, positions: &mut Vec<DVec3>| -> u32 {
        *welded.entry(point_key(p)).or_insert_with(|| {
            positions.push(p);
            (positions.len() - 1) as u32
        })
    };

    for idx in 0..mesh.triangle_count() {
        if let Some((a, b)) = intersect_triangle(mesh.triangle(idx), plane) {
            let ia = index_of(a, &mut positions);
            let ib = index_of(b, &mut positions);
            // An edge lying in the plane is reported by both adjacent triangles
            if ia != ib && emitted.insert((ia.min(ib), ia.max(ib))) {
                lines.push([ia, ib]);
            }
        }
    }

    MeshData {
        positions,
        triangles: Vec::new(),
        lines,
    }
}

/// Points of a cloud within `half_thickness` of the plane
pub fn section_points(mesh: &MeshData, plane: &Plane, half_thickness: f64) -> MeshData {
    MeshData {
        positions: mesh
            .positions
            .iter()
            .copied()
            .filter(|p| plane.signed_distance(*p).abs() <= half_thickness)
            .collect(),
        triangles: Vec::new(),
        lines: Vec::new(),
    }
}

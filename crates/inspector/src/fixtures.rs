//! Factory functions for mesh descriptions used by tests and the demo binary.

use shared::MeshDescription;

use crate::geometry::{mesh, MeshData};

fn vertices(data: &MeshData) -> Vec<[f64; 3]> {
    data.positions.iter().map(|p| p.to_array()).collect()
}

// ── Surface meshes ──────────────────────────────────────────────

/// Axis-aligned box surface centred at the origin
pub fn cube_surface(w: f64, h: f64, d: f64) -> MeshDescription {
    let data = mesh::cube(w, h, d);
    MeshDescription::surface(vertices(&data), data.triangles.clone())
}

/// The `[-5, 5]³` box used throughout the tests
pub fn cube_surface_10() -> MeshDescription {
    cube_surface(10.0, 10.0, 10.0)
}

/// Box surface offset from the origin, as a scan in site coordinates would be
pub fn cube_surface_at(w: f64, h: f64, d: f64, offset: [f64; 3]) -> MeshDescription {
    let mut desc = cube_surface(w, h, d);
    for v in &mut desc.vertices {
        for (c, o) in v.iter_mut().zip(offset) {
            *c += o;
        }
    }
    desc
}

pub fn sphere_surface(radius: f64) -> MeshDescription {
    let data = mesh::sphere(radius, 16, 24);
    MeshDescription::surface(vertices(&data), data.triangles.clone())
}

/// Flat square terrain patch in the XY plane
pub fn terrain_patch(size: f64, divisions: u32) -> MeshDescription {
    let data = mesh::plane_xy(size, divisions);
    MeshDescription::surface(vertices(&data), data.triangles.clone())
}

// ── Point clouds ────────────────────────────────────────────────

/// `n³` lattice spanning `[-extent, extent]` on every axis
pub fn lattice_cloud(n: u32, extent: f64) -> MeshDescription {
    MeshDescription::point_cloud(vertices(&mesh::point_lattice(n, extent)))
}

/// A cloud with a single point
pub fn single_point_cloud(p: [f64; 3]) -> MeshDescription {
    MeshDescription::point_cloud(vec![p])
}

//! Mesh validation utilities.
//!
//! `MeshValidator` checks derived meshes (clipped copies, section curves):
//! in-range indices, finite positions, containment in a clip region.

use crate::geometry::{Aabb, MeshData, Plane};

/// Validator for `MeshData` integrity checks.
pub struct MeshValidator<'a> {
    mesh: &'a MeshData,
}

impl<'a> MeshValidator<'a> {
    pub fn new(mesh: &'a MeshData) -> Self {
        Self { mesh }
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.point_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    pub fn line_count(&self) -> usize {
        self.mesh.line_count()
    }

    /// Check that every triangle and line index addresses an existing vertex.
    pub fn are_indices_in_range(&self) -> bool {
        let max_idx = self.vertex_count() as u32;
        self.mesh.triangles.iter().flatten().all(|&i| i < max_idx)
            && self.mesh.lines.iter().flatten().all(|&i| i < max_idx)
    }

    pub fn are_positions_finite(&self) -> bool {
        self.mesh.positions.iter().all(|p| p.is_finite())
    }

    pub fn aabb(&self) -> Option<Aabb> {
        self.mesh.bounds()
    }

    /// Check that every vertex lies inside all half-spaces, within `tolerance`.
    pub fn is_inside(&self, planes: &[Plane], tolerance: f64) -> bool {
        self.mesh
            .positions
            .iter()
            .all(|p| planes.iter().all(|pl| pl.signed_distance(*p) <= tolerance))
    }

    /// Check that every vertex lies on the plane, within `tolerance`.
    pub fn is_on_plane(&self, plane: &Plane, tolerance: f64) -> bool {
        self.mesh
            .positions
            .iter()
            .all(|p| plane.signed_distance(*p).abs() <= tolerance)
    }

    /// Run all validation checks and return a list of error messages.
    /// An empty list means the mesh is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.are_indices_in_range() {
            let max_idx = self.vertex_count() as u32;
            let out_of_range: Vec<_> = self
                .mesh
                .triangles
                .iter()
                .flatten()
                .chain(self.mesh.lines.iter().flatten())
                .filter(|&&i| i >= max_idx)
                .take(5)
                .collect();
            errors.push(format!(
                "Indices out of range (vertex_count={}): {:?}",
                max_idx, out_of_range
            ));
        }

        if !self.are_positions_finite() {
            errors.push("Some positions are NaN or infinite".to_string());
        }

        errors
    }
}
